//! Binary entry point: resolve settings, start file logging, and drive the
//! Ratatui event loop against the configured library file.
use book_catalog::config::{Cli, Settings};
use book_catalog::{logging, run_app, App, LibraryFile};
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_cli(Cli::parse())?;
    logging::init(&settings.log_path)?;
    info!(library = %settings.library_path.display(), "starting book catalog");

    let mut app = App::new(LibraryFile::new(settings.library_path));
    run_app(&mut app)
}
