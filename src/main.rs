//! CLI entry point for treegrab.

use std::process::ExitCode;

mod app;
mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run_treegrab().await {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
