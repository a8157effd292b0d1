mod app;
mod contact;
mod error;
mod form;
mod model;
mod print;
mod rtl;
mod settings;

use clap::{Parser, Subcommand};
use eframe::egui;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::InvoiceApp;
use crate::error::Result;
use crate::print::Printer;
use crate::settings::{default_settings_path, load_settings, setup_config_wizard};

#[derive(Parser)]
#[command(name = "pastry-invoice", about = "Invoice form for a home bakery")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose where printed invoices are written
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings_path = cli.settings.unwrap_or_else(default_settings_path);

    if let Some(Commands::Config) = cli.command {
        setup_config_wizard(&settings_path)?;
        return Ok(());
    }

    let settings = load_settings(&settings_path)
        .inspect_err(|e| error!("Failed to load settings from {}: {}", settings_path.display(), e))?;
    info!(output_dir = %settings.output_dir().display(), "starting invoice form");

    let printer = Printer::from_settings(&settings)?;
    let font_path = settings.font_path();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("מחולל חשבוניות")
            .with_inner_size([960.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "pastry-invoice",
        options,
        Box::new(move |cc| Ok(Box::new(InvoiceApp::new(cc, printer, font_path)))),
    )?;
    Ok(())
}
