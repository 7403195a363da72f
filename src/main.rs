//=========================================================================
// strata
//
// Opens a window and runs a scene directory.
//
// Usage:
//   strata --scenes assets/scenes --entry menu
//   RUST_LOG=scene=debug,loader=debug strata --entry map1
//
//=========================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use strata_engine::{EngineBuilder, FileFetcher, SceneSource};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Run a directory of JSON scenes")]
struct Cli {
    /// Directory scene locations are resolved against
    #[arg(long, default_value = EngineBuilder::DEFAULT_SCENE_ROOT)]
    scenes: PathBuf,

    /// Location of the first scene (file stem, without `.json`)
    #[arg(long, default_value = "menu")]
    entry: String,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Window title
    #[arg(long, default_value = "Strata")]
    title: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.width == 0 || cli.height == 0 {
        error!("Window size must be positive, got {}x{}", cli.width, cli.height);
        return ExitCode::FAILURE;
    }

    info!("Serving scenes from {}", cli.scenes.display());

    let engine = EngineBuilder::new()
        .with_title(cli.title)
        .with_window_size(cli.width, cli.height)
        .with_fetcher(FileFetcher::new(cli.scenes))
        .with_entry(SceneSource::location(cli.entry))
        .build();

    match engine.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
