use anyhow::Result;

use lpq::commands;

fn main() -> Result<()> {
    lpq::init_logging();

    let matches = commands::cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run(sub_matches)?,
        Some(("config", sub_matches)) => commands::config::execute(sub_matches)?,
        Some(("completions", sub_matches)) => {
            let mut cli = commands::cli();
            commands::completions::execute(sub_matches, &mut cli)?;
        }
        Some(("version", _)) => commands::version()?,
        _ => {
            println!("Welcome to lpq!");
            println!("Use 'lpq --help' for more information.");
        }
    }

    Ok(())
}
