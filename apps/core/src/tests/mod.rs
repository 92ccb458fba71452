//! Test Module
//!
//! Cross-component test suite for the response engine.
//!
//! ## Test Categories
//! - `catalog_tests`: CSV loading, header normalization, reload behavior
//! - `engine_tests`: end-to-end classify-and-respond scenarios and laws

pub mod engine_tests;
