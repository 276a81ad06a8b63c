mod app;
mod cli;

use app::TileSetApp;
use clap::Parser;
use eframe::egui;
use tileseted::{EditorSettings, logger};

fn main() -> Result<(), eframe::Error> {
    logger::init();
    let args = cli::CliArgs::parse();
    let mut settings = EditorSettings::load();

    // -- CLI / headless mode ---------------------------------------------
    if args.command.is_some() {
        let code = cli::run(args, &settings);
        std::process::exit(if code == std::process::ExitCode::SUCCESS {
            0
        } else {
            1
        });
    }

    // -- GUI mode -----------------------------------------------------
    if let Some(dir) = args.dir {
        settings.tile_dir = dir;
    }

    // Fixed window: grid + scrollbar + toolbar + border
    let (grid_w, grid_h) = settings.layout().viewport_size();
    let border = settings.window_padding as f32 * 2.0;
    let size = [
        grid_w + app::SCROLLBAR_WIDTH + border + settings.tile_padding as f32 * 2.0,
        grid_h + app::TOOLBAR_HEIGHT + border + settings.tile_padding as f32 * 2.0,
    ];

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_resizable(false)
            .with_title("TileSet Editor - tileseted"),
        ..Default::default()
    };

    eframe::run_native(
        "tileseted",
        options,
        Box::new(move |cc| Box::new(TileSetApp::new(cc, settings))),
    )
}
