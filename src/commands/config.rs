use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", sub_matches)) => show(sub_matches),
        Some(("path", _)) => print_path(),
        Some(("init", sub_matches)) => init(sub_matches),
        _ => {
            println!("Use 'lpq config --help' for more information.");
            Ok(())
        }
    }
}

fn target_path(matches: &clap::ArgMatches) -> Result<PathBuf> {
    match matches.get_one::<String>("config") {
        Some(path) => Ok(PathBuf::from(path)),
        None => Config::get_config_path().context("Could not determine config path"),
    }
}

fn show(matches: &clap::ArgMatches) -> Result<()> {
    let path = target_path(matches)?;
    let config = Config::load_from(&path)
        .with_context(|| format!("Failed to load configuration from {:?}", path))?;

    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, defaults)", path.display())
    };
    println!("{} {}", "Configuration:".white().bold(), source.dimmed());
    println!();
    println!("{}", serde_json::to_string_pretty(&masked(&config))?);

    if let Err(e) = config.validate() {
        println!();
        println!("{} {}", "Warning:".yellow().bold(), e.to_string().yellow());
    }

    Ok(())
}

/// Copy of `config` safe to print
fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    if !shown.remote.password.is_empty() {
        shown.remote.password = "********".to_string();
    }
    shown
}

fn print_path() -> Result<()> {
    let path = Config::get_config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn init(matches: &clap::ArgMatches) -> Result<()> {
    let path = target_path(matches)?;
    let force = matches.get_flag("force");

    if path.exists() && !force {
        println!(
            "{}",
            format!("Configuration already exists at {}", path.display()).yellow()
        );
        println!("{}", "Use --force to overwrite it.".dimmed());
        return Ok(());
    }

    write_defaults(&path)?;
    println!(
        "{} {}",
        "Configuration written to".green().bold(),
        path.display().to_string().cyan()
    );
    Ok(())
}

fn write_defaults(path: &Path) -> Result<()> {
    Config::default()
        .save_to(path)
        .with_context(|| format!("Failed to write configuration to {:?}", path))
}
