mod assets;
mod commands;
mod error;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::commands::ViewOptions;
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "spriteboard", about = "Inspect, normalize, and rasterize sprite board layouts")]
struct Cli {
    /// Directory of sprite images; each file stem is an asset id.
    #[arg(long, env = "SPRITEBOARD_ASSETS", global = true)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print version and record counts as JSON.
    Inspect { layout: PathBuf },
    /// Flatten sprites into a PNG at 1:1 scale, without grid or selection.
    Export(ExportArgs),
    /// Draw the interactive view (grid and sprites) into a PNG.
    Render(RenderArgs),
    /// Drop unresolved records and rewrite the layout with defaults filled in.
    Normalize {
        layout: PathBuf,
        #[arg(long, help = "Output path, or - for stdout", default_value = "-")]
        out: String,
    },
}

#[derive(Args, Debug)]
struct ExportArgs {
    layout: PathBuf,
    #[arg(long, default_value_t = 1024)]
    width: u32,
    #[arg(long, default_value_t = 768)]
    height: u32,
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    export: ExportArgs,
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_x: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_y: f64,
    #[arg(long, default_value_t = false)]
    no_grid: bool,
}

fn main() -> Result<(), CliError> {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let catalog = assets::load_dir(cli.assets.as_deref().ok_or(CliError::MissingAssets)?)?;

    match cli.command {
        Command::Inspect { layout } => {
            let summary = commands::inspect(&read_layout(&layout)?, &catalog)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Export(args) => {
            let png = commands::export(&read_layout(&args.layout)?, &catalog, args.width, args.height)?;
            write_out(&args.out, &png)?;
        }
        Command::Render(args) => {
            let view = ViewOptions {
                width: args.export.width,
                height: args.export.height,
                zoom: args.zoom,
                pan_x: args.pan_x,
                pan_y: args.pan_y,
                grid: !args.no_grid,
            };
            let png = commands::render(&read_layout(&args.export.layout)?, &catalog, view)?;
            write_out(&args.export.out, &png)?;
        }
        Command::Normalize { layout, out } => {
            let text = commands::normalize(&read_layout(&layout)?, &catalog)?;
            if out == "-" {
                println!("{text}");
            } else {
                write_out(Path::new(&out), text.as_bytes())?;
            }
        }
    }
    Ok(())
}

fn read_layout(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadLayout { path: path.to_path_buf(), source })
}

fn write_out(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Write { path: path.to_path_buf(), source })?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}
