pub mod canvas;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod interpreter;
pub mod named_colors;
pub mod tokenizer;
pub mod values;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::config::SessionConfig;
use crate::display::{Backdrop, PreviewPresenter};

pub use interpreter::{Flow, Interpreter};

/// First lines printed when an interactive session starts.
pub const BANNER: &str = "Welcome to Graphics Console!\nType \"help\" for a list of possible commands! Be aware that all commands are case-sensitive.";

/// Feeds `input` to a fresh interpreter line by line until `exit` or end of
/// input. The preview presenter, when configured, is shut down before
/// returning.
pub fn run_session<R: BufRead, W: Write>(
    config: &SessionConfig,
    input: R,
    mut output: W,
) -> Result<()> {
    if config.banner {
        writeln!(output, "{BANNER}")?;
        output.flush()?;
    }

    let backdrop = Backdrop::default();
    let mut interpreter = Interpreter::new(output, backdrop.clone(), config.max_dimension);
    if let Some(path) = &config.preview_path {
        let presenter = PreviewPresenter::spawn(path.clone(), backdrop, config.display_size)?;
        interpreter = interpreter.with_presenter(Box::new(presenter));
    }

    for line in input.lines() {
        let line = line.context("failed to read command line")?;
        if interpreter.interpret(&line)? == Flow::Exit {
            log::debug!("exit requested");
            return Ok(());
        }
    }
    log::debug!("input closed");
    Ok(())
}
