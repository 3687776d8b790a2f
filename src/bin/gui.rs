use clap::Parser;
use eframe::egui;
use flowchart_editor::{init_tracing, EditorConfig, FlowchartApp};
use std::path::PathBuf;
use tracing::error;

/// Interactive flowchart editor
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file overriding editor defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project file to open
    project: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match EditorConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{e:#}"), "falling back to default config");
            EditorConfig::default()
        }
    };

    let app = match &args.project {
        Some(path) => FlowchartApp::from_project(path, config.clone()).unwrap_or_else(|e| {
            error!(error = %format!("{e:#}"), "starting with an empty canvas");
            FlowchartApp::new(config)
        }),
        None => FlowchartApp::new(config),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Flowchart Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Flowchart Editor",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
