// Command handlers module
pub mod completions;
pub mod config;
pub mod run;
pub mod version;

use clap::{Arg, ArgAction, Command};

// Re-exports for cleaner imports
pub use run::execute as run;
pub use version::execute as version;

/// Build the command-line interface
pub fn cli() -> Command {
    Command::new("lpq")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Quarantine ROMs and thumbnails listed in a RetroArch playlist on an FTP store")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Move the playlist's ROMs and thumbnails into quarantine")
                .long_about(
                    "Move the playlist's ROMs and thumbnails into quarantine\n\n\
                     A backup of the playlist is written to <playlist>.bkp first. Entries whose ROM \
                     was moved are removed from the playlist. Runs are dry by default unless the \
                     configuration says otherwise; pass --apply to move files.",
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("Configuration file (defaults to the user config directory)"),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("FTP server host"),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_name("PORT")
                        .help("FTP server port")
                        .value_parser(clap::value_parser!(u16).range(1..)),
                )
                .arg(
                    Arg::new("user")
                        .short('u')
                        .long("user")
                        .value_name("USER")
                        .help("FTP user name"),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .value_name("PASSWORD")
                        .help("FTP password"),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("Deadline for connecting and for each FTP command")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("playlist")
                        .long("playlist")
                        .value_name("REMOTE_PATH")
                        .help("Playlist to process, e.g. /retroarch/playlists/delete.lpl"),
                )
                .arg(
                    Arg::new("quarantine")
                        .long("quarantine")
                        .value_name("REMOTE_PATH")
                        .help("Quarantine prefix that moved files are placed under"),
                )
                .arg(
                    Arg::new("thumbnails")
                        .long("thumbnails")
                        .value_name("REMOTE_PATH")
                        .help("Root of the thumbnails tree"),
                )
                .arg(
                    Arg::new("log-dir")
                        .long("log-dir")
                        .value_name("DIR")
                        .help("Local directory for general.log, error.log and processed.log"),
                )
                .arg(
                    Arg::new("move-order")
                        .long("move-order")
                        .value_name("ORDER")
                        .help("delete-first (delete source before writing) or write-first")
                        .value_parser(["delete-first", "write-first"]),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Show what would be moved without moving anything")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("apply"),
                )
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .help("Actually move files and rewrite the playlist")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or create the configuration file (use 'lpq config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("show")
                        .about("Print the effective configuration")
                        .arg(
                            Arg::new("config")
                                .short('c')
                                .long("config")
                                .value_name("FILE")
                                .help("Configuration file to read"),
                        ),
                )
                .subcommand(Command::new("path").about("Print the default configuration file path"))
                .subcommand(
                    Command::new("init")
                        .about("Write a configuration file with default values")
                        .arg(
                            Arg::new("config")
                                .short('c')
                                .long("config")
                                .value_name("FILE")
                                .help("Where to write (defaults to the user config directory)"),
                        )
                        .arg(
                            Arg::new("force")
                                .short('f')
                                .long("force")
                                .help("Overwrite an existing file")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}
