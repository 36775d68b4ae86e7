//! chenu - build cheat menus from browser hacks and hot-push them into a live page.

mod actor;
mod artifact;
mod build;
mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod reload;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, init::InitOptions};
use config::ProjectConfig;

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        // `init` creates the config, everything else needs one
        Commands::Init {
            dir,
            title,
            package_manager,
            skip_install,
        } => cli::init::new_menu(InitOptions {
            dir: dir.clone(),
            title: title.clone(),
            package_manager: *package_manager,
            skip_install: *skip_install,
            config_name: cli.config.clone(),
        }),
        Commands::Build {
            generate_bookmarklet,
        } => cli::build::build_menu(load_config(&cli)?, *generate_bookmarklet),
        Commands::Dev { .. } => cli::dev::dev_menu(load_config(&cli)?),
    }
}

fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    let config = ProjectConfig::load(cli)?;
    debug!("config"; "project root: {}", config.get_root().display());
    Ok(config)
}
