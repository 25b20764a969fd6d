use clap::Parser;
use color_eyre::Result;
use std::path::Path;
use std::rc::Rc;
use planboard::{Config, Profile, SqliteStore, Workspace, cli::Cli};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    // An explicit --config file wins over the profile's default location
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(Path::new(path))?,
        None => Config::load_with_profile(profile)?,
    };

    // Logging is best effort; a read-only data dir must not block the command
    if let Err(e) = planboard::logging::init_logging(&config.log_level, &config.get_log_dir()) {
        eprintln!("WARNING: file logging disabled: {}", e);
    }

    // Open the store and load every repository
    let store = SqliteStore::open(&config.get_database_path(), &config.namespace)?;
    let mut workspace = Workspace::open(Rc::new(store));

    planboard::cli::run(cli.command, &mut workspace, &config)?;

    Ok(())
}
