use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use gcon::config::{SessionConfig, DEFAULT_DISPLAY_SIZE, DEFAULT_MAX_DIMENSION};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GCON_GIT_HASH"),
    ")"
);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "gcon")]
#[command(about = "Graphics Console: draw on a raster canvas by typing commands")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Edge length of the square preview frame, in pixels.
    #[arg(
        long,
        default_value_t = DEFAULT_DISPLAY_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    display_size: u32,

    /// Write the display frame to this PNG after every change.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Largest canvas edge `new` accepts.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DIMENSION,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_dimension: u32,

    /// Skip the welcome lines.
    #[arg(long)]
    no_banner: bool,

    /// Diagnostics go to stderr at this level and above.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            display_size: self.display_size,
            max_dimension: self.max_dimension,
            preview_path: self.preview.clone(),
            banner: !self.no_banner,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new()
        .with_level(cli.log_level.filter())
        .init()?;

    let config = cli.session_config();
    log::debug!("starting session: {config:?}");
    gcon::run_session(&config, io::stdin().lock(), io::stdout().lock())
}
