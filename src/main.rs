mod config;
mod db;
mod models;
mod notify;
mod report;
mod run;
mod sheet;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    init_logging(args.len() == 1, &data_dir)?;

    let settings_path = config::default_path()?;
    let settings = config::Settings::load(&settings_path)?;
    if !settings_path.exists() {
        // First run: write the defaults so there is a file to edit
        settings.save(&settings_path)?;
        log::info!("wrote default settings to {}", settings_path.display());
    }
    let mut db = db::Database::open(&data_dir.join("piggybank.db"))?;

    if args.len() == 1 {
        run::as_tui(&mut db, settings)
    } else {
        run::as_cli(&args, &mut db, &settings)
    }
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "piggybank", "piggybank")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

/// CLI runs log to stderr; the TUI owns the terminal, so its log lines go
/// to a file in the data dir instead.
fn init_logging(tui: bool, data_dir: &Path) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if tui {
        let file = std::fs::File::create(data_dir.join("piggybank.log"))
            .context("Failed to create log file")?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
