// ============================================================================
// tileseted CLI: headless palette edits via command-line arguments
// ============================================================================
//
// Usage examples:
//   tileseted list
//   tileseted -d assets/.tiles mv 12 3       (move tile 12 in front of tile 3, then save)
//   tileseted swap 4 9                       (trade tiles 4 and 9, then save)
//   tileseted export sheet.png
//
// Positions are 1-based, matching the GUI title bar. Without a subcommand
// the GUI opens.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tileseted::sheet::export_sheet;
use tileseted::{EditorSettings, OrderEngine, Result, TileError};

/// Tile palette editor.
#[derive(Parser, Debug)]
#[command(
    name = "tileseted",
    about = "Reorder a tile palette stored as one file per tile",
    long_about = "Without a subcommand the editor window opens. Subcommands edit the\n\
                  palette headlessly and save immediately.\n\n\
                  Example:\n  \
                  tileseted -d .tiles mv 12 3\n  \
                  tileseted export sheet.png"
)]
pub struct CliArgs {
    /// Tile directory. Defaults to `tile_dir` from the settings file.
    #[arg(short, long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print every tile in palette order.
    List,
    /// Move tile SRC in front of tile DST and save.
    Mv { src: usize, dst: usize },
    /// Swap tiles A and B and save.
    Swap { a: usize, b: usize },
    /// Write the palette as a single sheet image (format from extension).
    Export {
        out: PathBuf,
        /// Tiles per sheet row. Defaults to `tiles_across`.
        #[arg(long)]
        across: Option<usize>,
    },
}

/// Run one headless command and return an OS exit code.
pub fn run(args: CliArgs, settings: &EditorSettings) -> ExitCode {
    let Some(command) = args.command else {
        return ExitCode::SUCCESS;
    };
    let dir = args.dir.unwrap_or_else(|| settings.tile_dir.clone());

    match run_command(command, dir, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tileseted::log_err!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_command(command: CliCommand, dir: PathBuf, settings: &EditorSettings) -> Result<()> {
    let mut engine = OrderEngine::load(&dir)?;

    match command {
        CliCommand::List => {
            let view = engine.view();
            for (position, tile) in view.tiles().enumerate() {
                println!("{:>5}  {:<8} {}", position + 1, tile.filename(), tile.kind());
            }
        }
        CliCommand::Mv { src, dst } => {
            let (src, dst) = (to_position(src, &engine)?, to_position(dst, &engine)?);
            engine.insert(src, dst)?;
            save(&mut engine)?;
        }
        CliCommand::Swap { a, b } => {
            let (a, b) = (to_position(a, &engine)?, to_position(b, &engine)?);
            engine.swap(a, b)?;
            save(&mut engine)?;
        }
        CliCommand::Export { out, across } => {
            export_sheet(
                &engine.view(),
                across.unwrap_or(settings.tiles_across),
                settings.tile_dimension,
                settings.bytes_per_pixel,
                &out,
            )?;
            println!("wrote {}", out.display());
        }
    }
    Ok(())
}

fn save(engine: &mut OrderEngine) -> Result<()> {
    let report = engine.save()?;
    println!(
        "{} exchange(s), {} rename(s)",
        report.exchanges,
        report.renames()
    );
    Ok(())
}

/// 1-based CLI position → 0-based display position.
fn to_position(one_based: usize, engine: &OrderEngine) -> Result<usize> {
    match one_based.checked_sub(1) {
        Some(p) if p < engine.len() => Ok(p),
        _ => Err(TileError::PositionOutOfRange {
            position: one_based,
            len: engine.len(),
        }),
    }
}
