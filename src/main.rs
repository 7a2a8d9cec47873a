use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use group_calendar::{
    config::SheetConfig,
    fetch::{load_sheet, SheetLoader},
    logging,
    present::text,
    process::Board,
};
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Show the event calendar for one group.
#[derive(Parser, Debug)]
#[command(name = "group_calendar", version)]
struct Args {
    /// Group to show events for. Without it, the list of groups is printed.
    #[arg(short, long)]
    group: Option<String>,

    /// Read a saved .xlsx export instead of downloading the sheet.
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("warn");
    let args = Args::parse();

    // ─── 2) configure loader ─────────────────────────────────────────
    let config = SheetConfig::from_env()?;
    let loader = SheetLoader::from_config(&config)?;
    info!(url = %loader.url(), "loading sheet");

    // ─── 3) run the pipeline ─────────────────────────────────────────
    let board = match load_sheet(&loader, args.file.as_deref())
        .await
        .and_then(|sheet| Board::prepare(&sheet, &config.marker))
    {
        Ok(board) => board,
        Err(e) => {
            error!(error = %e, "pipeline failed");
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    // ─── 4) render ───────────────────────────────────────────────────
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match (args.group.as_deref(), args.format) {
        (None, Format::Text) => text::render_catalog(&mut out, board.catalog())?,
        (None, Format::Json) => {
            serde_json::to_writer_pretty(&mut out, board.catalog())?;
            writeln!(out)?;
        }
        (Some(group), Format::Text) => text::render_view(&mut out, &board.select(group))?,
        (Some(group), Format::Json) => {
            serde_json::to_writer_pretty(&mut out, &board.select(group))?;
            writeln!(out)?;
        }
    }
    out.flush().context("writing output")?;

    Ok(ExitCode::SUCCESS)
}
