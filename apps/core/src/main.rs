// AI Call Center - Response Engine Host
// Text in, structured reply out; HTTP/speech transports live elsewhere.

mod catalog;
mod engine;
mod error;
mod models;
#[cfg(test)]
mod tests;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::{Catalog, CatalogHandle};
use engine::{RenderedResponse, ResponseEngine};
use error::AppError;

// --- Configuration (environment, .env honored) ---
const CATALOG_PATH_VAR: &str = "CALLCENTER_CATALOG";
const RELATED_LIMIT_VAR: &str = "CALLCENTER_RELATED_LIMIT";
const FORMAT_VAR: &str = "CALLCENTER_FORMAT";

/// How the REPL prints a response.
#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    /// Short spoken-style summary (default).
    Summary,
    /// Chat markup, as the web front end would receive it.
    Html,
    /// The structured payload itself.
    Json,
}

fn output_format() -> Result<OutputFormat, AppError> {
    match std::env::var(FORMAT_VAR) {
        Err(_) => Ok(OutputFormat::Summary),
        Ok(v) => match v.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::Config(format!(
                "{} must be summary, html or json (got '{}')",
                FORMAT_VAR, other
            ))),
        },
    }
}

fn related_limit() -> Result<usize, AppError> {
    match std::env::var(RELATED_LIMIT_VAR) {
        Err(_) => Ok(engine::responder::DEFAULT_RELATED_LIMIT),
        Ok(v) => v.parse::<usize>().map_err(|_| {
            AppError::Config(format!("{} must be a non-negative integer (got '{}')", RELATED_LIMIT_VAR, v))
        }),
    }
}

fn catalog_path() -> String {
    std::env::var(CATALOG_PATH_VAR)
        .unwrap_or_else(|_| catalog::default_catalog_path().to_string_lossy().into_owned())
}

fn print_response(response: &RenderedResponse, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Summary => response.tts_summary(),
        OutputFormat::Html => response.to_html(),
        OutputFormat::Json => serde_json::to_string_pretty(response)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let format = output_format()?;
    let path = catalog_path();

    // A missing or broken catalog must not kill the host; the engine then
    // serves its "no product data" fallbacks until a successful :reload.
    let handle = CatalogHandle::new(Catalog::load_or_empty(&path));
    info!("catalog ready with {} products", handle.snapshot().len());
    let engine = ResponseEngine::new(handle.clone()).with_related_limit(related_limit()?);

    info!("AI call center ready; type a message, ':reload' to reload the catalog, Ctrl-D to exit");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ").context("failed to write prompt")?;
        stdout.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            break; // EOF
        }
        let message = line.trim_end_matches(['\r', '\n']);

        if message == ":reload" {
            match handle.reload(&path) {
                Ok(()) => info!("catalog reloaded from {}", path),
                Err(e) => tracing::error!("reload failed, keeping previous catalog: {}", e),
            }
            continue;
        }

        let response = engine.classify_and_respond(message);
        print_response(&response, format)?;
    }

    Ok(())
}
