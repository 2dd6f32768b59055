//! seqshot command-line entry point.
//!
//! ```text
//! seqshot [--config <FILE>] [COMMAND]
//!
//! Commands:
//!   session   interactive session, Enter captures (default)
//!   capture   capture once into the next file
//!   next      print the next filename
//!   show      print the saved settings
//!   set       change and save settings
//!   open      open the output folder
//! ```
//!
//! `--config` falls back to `SEQSHOT_CONFIG`, then to the platform config
//! directory. Set `RUST_LOG=info` to see what happens under the hood.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use seqshot_lib::config::{self, CONFIG_ENV_VAR};
use seqshot_lib::console;
use seqshot_lib::{shell, Region, ScreenGrabber, Session};

#[derive(Parser, Debug)]
#[command(name = "seqshot", version, about = "Capture a screen region into sequentially numbered files")]
struct Cli {
    /// Settings file to load and save.
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Interactive session; settings are saved when it ends.
    Session,

    /// Capture the configured region once.
    Capture {
        /// Seconds to wait before grabbing the screen.
        #[arg(long, default_value_t = 0)]
        delay: u64,
    },

    /// Print the path the next capture will be written to.
    Next,

    /// Print the saved settings.
    Show,

    /// Change settings and save them.
    Set {
        /// Output folder.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Filename prefix (may be empty).
        #[arg(long)]
        prefix: Option<String>,

        /// Filename suffix (may be empty).
        #[arg(long)]
        suffix: Option<String>,

        /// Capture region as LEFT,TOP,WIDTH,HEIGHT.
        #[arg(long, value_parser = parse_region_arg, allow_hyphen_values = true)]
        region: Option<Region>,
    },

    /// Open the output folder in the file manager.
    Open,
}

fn parse_region_arg(text: &str) -> Result<Region, console::InputError> {
    console::parse_region(text)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let settings = config::load(&config_path);

    match cli.command.unwrap_or(Cmd::Session) {
        Cmd::Session => {
            let mut session = Session::new(settings, ScreenGrabber::new());
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let result = console::run(&mut session, stdin.lock(), &mut stdout);

            // Settings are saved even if the console loop broke off
            if let Err(e) = config::save(session.config(), &config_path) {
                log::error!("[CONFIG] {}", e);
                eprintln!("warning: settings not saved: {}", e);
            }
            result?;
        }
        Cmd::Capture { delay } => {
            let mut session = Session::new(settings, ScreenGrabber::new());
            if delay > 0 {
                log::info!("[SESSION] Waiting {}s before capture", delay);
                std::thread::sleep(Duration::from_secs(delay));
            }
            let path = session.capture()?;
            println!("{}", path.display());
        }
        Cmd::Next => {
            let session = Session::new(settings, ScreenGrabber::new());
            println!("{}", session.next_path().display());
        }
        Cmd::Show => {
            let session = Session::new(settings, ScreenGrabber::new());
            let mut stdout = io::stdout();
            writeln!(stdout, "config: {}", config_path.display())?;
            console::write_settings(&mut stdout, &session)?;
        }
        Cmd::Set {
            path,
            prefix,
            suffix,
            region,
        } => {
            let mut settings = settings;
            if let Some(path) = path {
                settings.output_path = path;
            }
            if let Some(prefix) = prefix {
                settings.prefix = prefix;
            }
            if let Some(suffix) = suffix {
                settings.suffix = suffix;
            }
            if let Some(region) = region {
                settings.region = region;
            }
            config::save(&settings, &config_path)?;
            println!("Saved {}", config_path.display());
        }
        Cmd::Open => {
            shell::open_folder(&settings.output_path)?;
        }
    }

    Ok(())
}
