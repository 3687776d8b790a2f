use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flowchart_editor::export::{self, MARKDOWN_FILE, PNG_FILE, SVG_FILE};
use flowchart_editor::{
    init_tracing, EditorConfig, ProjectFile, Session, Size, ValidationSeverity, Validator,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Flowchart editor command line tools
#[derive(Parser, Debug)]
#[command(name = "flowchart-editor")]
#[command(version)]
#[command(about = "Inspect and export flowchart projects without opening the editor")]
struct Cli {
    /// JSON file overriding editor defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print element counts and validation issues
    Info {
        /// Project file
        project: PathBuf,
    },

    /// Write the markdown outline of a project
    ExportMarkdown {
        /// Project file
        project: PathBuf,

        /// Output path
        #[arg(short, long, default_value = MARKDOWN_FILE)]
        output: PathBuf,
    },

    /// Render a project to SVG
    ExportSvg {
        /// Project file
        project: PathBuf,

        /// Output path
        #[arg(short, long, default_value = SVG_FILE)]
        output: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Render a project to PNG
    ExportPng {
        /// Project file
        project: PathBuf,

        /// Output path
        #[arg(short, long, default_value = PNG_FILE)]
        output: PathBuf,

        /// Pixel density multiplier
        #[arg(long, default_value_t = 1.0)]
        scale: f32,

        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Zoom and pan so the whole scene is visible
    #[arg(long, default_value_t = false)]
    fit: bool,
}

fn open_session(config: &EditorConfig, project: &Path, viewport: Size) -> Result<Session> {
    let document = ProjectFile::new(project).load()?;
    let mut session = Session::new(config.clone(), viewport);
    session
        .load_scene(document)
        .with_context(|| format!("Invalid project: {}", project.display()))?;
    debug!(
        states = session.scene().state_count(),
        connections = session.scene().connection_count(),
        "project opened"
    );
    Ok(session)
}

fn open_view(config: &EditorConfig, project: &Path, view: &ViewArgs) -> Result<Session> {
    let mut session = open_session(config, project, Size::new(view.width, view.height))?;
    if view.fit && session.fit_to_view().is_err() {
        warn!("project is empty, nothing to fit");
    }
    Ok(session)
}

fn print_info(session: &Session) {
    let scene = session.scene();
    println!("States: {}", scene.state_count());
    println!("Connections: {}", scene.connection_count());
    if let Ok(bounds) = scene.bounding_box() {
        println!(
            "Bounds: ({:.0}, {:.0}) to ({:.0}, {:.0})",
            bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
        );
    }

    let result = Validator::validate(scene);
    if result.issues.is_empty() {
        println!("\n✓ No issues");
        return;
    }

    println!("\nIssues:");
    for issue in &result.issues {
        let icon = match issue.severity {
            ValidationSeverity::Error => "❌",
            ValidationSeverity::Warning => "⚠",
            ValidationSeverity::Info => "ℹ",
        };
        println!("  {} [{}] {}", icon, issue.severity, issue.message);
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = EditorConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { project } => {
            let session = open_session(&config, &project, Size::new(1280.0, 800.0))?;
            print_info(&session);
        }
        Commands::ExportMarkdown { project, output } => {
            let session = open_session(&config, &project, Size::new(1280.0, 800.0))?;
            export::export_markdown(session.scene(), &output)?;
            println!("✓ Wrote {}", output.display());
        }
        Commands::ExportSvg {
            project,
            output,
            view,
        } => {
            let session = open_view(&config, &project, &view)?;
            export::export_svg(&session.render(), &output)?;
            println!("✓ Wrote {}", output.display());
        }
        Commands::ExportPng {
            project,
            output,
            scale,
            view,
        } => {
            let session = open_view(&config, &project, &view)?;
            export::export_png(&session.render(), scale, &output)?;
            println!("✓ Wrote {}", output.display());
        }
    }

    Ok(())
}
