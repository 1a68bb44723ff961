use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::canvas::{Canvas, IntRect, Point};
use crate::commands::{self, CommandKind};
use crate::display::{Backdrop, Presenter};
use crate::error::Rejection;
use crate::tokenizer::tokenize;
use crate::values::{parse_color, parse_integer, parse_relative_integer, Color};

pub const INVALID_COMMAND: &str = "Invalid command. See \"help\" for a list of possible commands. Be aware that all commands are case-sensitive.";
pub const NO_CANVAS: &str = "Bitmap cannot be null.";
pub const SAVED: &str = "Saved successfully.";
pub const SAVE_FAILED: &str = "An error occured in saving.";
pub const NO_SUCH_COMMAND: &str = "Command does not exist.";

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

/// Whether the read loop should keep going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What a successfully handled command asks of the console and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The canvas or the backdrop changed.
    Redraw,
    Notice(String),
    ClearConsole,
    Exit,
}

type CanvasHandler = fn(&mut Canvas, &Args<'_>) -> Result<(), Rejection>;

/// Reads command lines, one at a time, and applies them to the canvas.
///
/// Status text goes to `console`. Rejected lines of any sort produce the same
/// invalid-command message; the reason is only logged. A drawing command
/// issued before any canvas exists is not a rejection: it prints
/// [`NO_CANVAS`] and succeeds.
pub struct Interpreter<W: Write> {
    console: W,
    canvas: Option<Canvas>,
    backdrop: Backdrop,
    presenter: Option<Box<dyn Presenter>>,
    max_dimension: u32,
}

impl<W: Write> Interpreter<W> {
    pub fn new(console: W, backdrop: Backdrop, max_dimension: u32) -> Self {
        Self {
            console,
            canvas: None,
            backdrop,
            presenter: None,
            max_dimension,
        }
    }

    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    /// Runs one line. Only console write failures surface as errors.
    pub fn interpret(&mut self, line: &str) -> Result<Flow> {
        let tokens = tokenize(line);
        let outcome = match tokens.split_first() {
            None => Err(Rejection::empty()),
            Some((head, args)) => match commands::resolve(head) {
                Some(descriptor) => {
                    log::debug!(
                        "dispatch {:?} with {} argument(s)",
                        descriptor.kind,
                        args.len()
                    );
                    self.execute(descriptor.kind, args)
                }
                None => Err(Rejection::unknown(head)),
            },
        };

        match outcome {
            Ok(Effect::Exit) => return Ok(Flow::Exit),
            Ok(Effect::Redraw) => self.refresh(),
            Ok(Effect::Notice(text)) => writeln!(self.console, "{}", text.trim_end())?,
            Ok(Effect::ClearConsole) => write!(self.console, "{CLEAR_SCREEN}")?,
            Err(rejection) => {
                log::debug!("rejected {line:?}: {rejection}");
                writeln!(self.console, "{INVALID_COMMAND}")?;
            }
        }
        self.console.flush()?;
        Ok(Flow::Continue)
    }

    fn execute(&mut self, command: CommandKind, tokens: &[String]) -> Result<Effect, Rejection> {
        match command {
            CommandKind::Help => help(tokens),
            CommandKind::Exit => {
                Args::bare(command, tokens).require(tokens.is_empty())?;
                Ok(Effect::Exit)
            }
            CommandKind::Clear => {
                Args::bare(command, tokens).require(tokens.is_empty())?;
                Ok(Effect::ClearConsole)
            }
            CommandKind::New => self.new_canvas(tokens),
            CommandKind::Save => self.save(tokens),
            CommandKind::Backdrop => self.set_backdrop(tokens),
            CommandKind::Wipe => self.on_canvas(command, tokens, wipe),
            CommandKind::Fill => self.on_canvas(command, tokens, fill),
            CommandKind::DrawRect => self.on_canvas(command, tokens, draw_rect),
            CommandKind::DrawEllipse => self.on_canvas(command, tokens, draw_ellipse),
            CommandKind::DrawLine => self.on_canvas(command, tokens, draw_line),
            CommandKind::DrawPolygon => self.on_canvas(command, tokens, draw_polygon),
            CommandKind::FillRect => self.on_canvas(command, tokens, fill_rect),
            CommandKind::FillEllipse => self.on_canvas(command, tokens, fill_ellipse),
            CommandKind::FillPolygon => self.on_canvas(command, tokens, fill_polygon),
        }
    }

    fn on_canvas(
        &mut self,
        command: CommandKind,
        tokens: &[String],
        handler: CanvasHandler,
    ) -> Result<Effect, Rejection> {
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(Effect::Notice(NO_CANVAS.to_owned()));
        };
        let args = Args::sized(command, tokens, canvas.width(), canvas.height());
        handler(canvas, &args)?;
        Ok(Effect::Redraw)
    }

    fn new_canvas(&mut self, tokens: &[String]) -> Result<Effect, Rejection> {
        let args = Args::bare(CommandKind::New, tokens);
        args.require(matches!(tokens.len(), 2 | 3))?;
        let width = args.integer(0)?;
        let height = args.integer(1)?;
        let fill = if tokens.len() == 3 {
            Some(args.color(2)?)
        } else {
            None
        };

        let max = self.max_dimension;
        let in_range = |edge: i32| edge >= 1 && edge as u32 <= max;
        if !in_range(width) || !in_range(height) {
            return Err(Rejection::canvas_size(width, height, max));
        }
        let mut canvas = Canvas::new(width as u32, height as u32).map_err(|error| {
            log::warn!("new: {error:#}");
            Rejection::canvas_size(width, height, max)
        })?;
        if let Some(color) = fill {
            canvas.clear(color);
        }

        // the previous surface is released by this assignment
        self.canvas = Some(canvas);
        log::info!("new canvas {width}x{height}");
        Ok(Effect::Redraw)
    }

    fn save(&self, tokens: &[String]) -> Result<Effect, Rejection> {
        let Some(canvas) = &self.canvas else {
            return Ok(Effect::Notice(NO_CANVAS.to_owned()));
        };
        Args::bare(CommandKind::Save, tokens).require(tokens.len() == 1)?;

        let path = Path::new(&tokens[0]);
        let notice = match canvas.save(path) {
            Ok(()) => {
                log::info!("saved {}", path.display());
                SAVED
            }
            Err(error) => {
                log::warn!("save: {error:#}");
                SAVE_FAILED
            }
        };
        Ok(Effect::Notice(notice.to_owned()))
    }

    fn set_backdrop(&mut self, tokens: &[String]) -> Result<Effect, Rejection> {
        let args = Args::bare(CommandKind::Backdrop, tokens);
        args.require(tokens.len() == 1)?;
        self.backdrop.set(args.color(0)?);
        Ok(Effect::Redraw)
    }

    fn refresh(&mut self) {
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.present(self.canvas.as_ref().map(Canvas::pixmap));
        }
    }
}

fn help(tokens: &[String]) -> Result<Effect, Rejection> {
    match tokens {
        [] => Ok(Effect::Notice(commands::help_index())),
        [alias] => Ok(Effect::Notice(
            commands::help_for(alias).unwrap_or_else(|| NO_SUCH_COMMAND.to_owned()),
        )),
        _ => Err(Rejection::arity(CommandKind::Help, tokens.len())),
    }
}

fn wipe(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    args.require(args.len() == 0)?;
    canvas.wipe();
    Ok(())
}

fn fill(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    args.require(args.len() == 1)?;
    canvas.clear(args.color(0)?);
    Ok(())
}

fn draw_rect(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    let (color, line_width, rect) = stroked_box(args)?;
    canvas.draw_rect(color, line_width, rect);
    Ok(())
}

fn draw_ellipse(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    let (color, line_width, rect) = stroked_box(args)?;
    canvas.draw_ellipse(color, line_width, rect);
    Ok(())
}

fn draw_line(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    args.require(args.len() == 6)?;
    let color = args.color(0)?;
    let line_width = args.coordinate(1)?;
    let from = args.point(2)?;
    let to = args.point(4)?;
    canvas.draw_line(color, line_width, from, to);
    Ok(())
}

fn draw_polygon(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    args.require(args.len() >= 4 && args.len() % 2 == 0)?;
    let color = args.color(0)?;
    let line_width = args.coordinate(1)?;
    let points = args.points(2)?;
    canvas.draw_polygon(color, line_width, &points);
    Ok(())
}

fn fill_rect(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    let (color, rect) = filled_box(args)?;
    canvas.fill_rect(color, rect);
    Ok(())
}

fn fill_ellipse(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    let (color, rect) = filled_box(args)?;
    canvas.fill_ellipse(color, rect);
    Ok(())
}

fn fill_polygon(canvas: &mut Canvas, args: &Args<'_>) -> Result<(), Rejection> {
    args.require(args.len() >= 3 && args.len() % 2 == 1)?;
    let color = args.color(0)?;
    let points = args.points(1)?;
    canvas.fill_polygon(color, &points);
    Ok(())
}

fn stroked_box(args: &Args<'_>) -> Result<(Color, i32, IntRect), Rejection> {
    args.require(args.len() == 6)?;
    Ok((args.color(0)?, args.coordinate(1)?, args.rect(2)?))
}

fn filled_box(args: &Args<'_>) -> Result<(Color, IntRect), Rejection> {
    args.require(args.len() == 5)?;
    Ok((args.color(0)?, args.rect(1)?))
}

/// Argument tokens of one command, parsed on demand against the canvas size.
/// Every accessor reports failures as a rejection naming the argument.
struct Args<'a> {
    command: CommandKind,
    tokens: &'a [String],
    width: i32,
    height: i32,
}

impl<'a> Args<'a> {
    fn bare(command: CommandKind, tokens: &'a [String]) -> Self {
        Self::sized(command, tokens, 0, 0)
    }

    fn sized(command: CommandKind, tokens: &'a [String], width: i32, height: i32) -> Self {
        Self {
            command,
            tokens,
            width,
            height,
        }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn require(&self, arity_ok: bool) -> Result<(), Rejection> {
        if arity_ok {
            Ok(())
        } else {
            Err(Rejection::arity(self.command, self.tokens.len()))
        }
    }

    fn integer(&self, index: usize) -> Result<i32, Rejection> {
        parse_integer(&self.tokens[index])
            .map_err(|error| Rejection::argument(self.command, index, error))
    }

    fn coordinate(&self, index: usize) -> Result<i32, Rejection> {
        parse_relative_integer(&self.tokens[index], self.width, self.height)
            .map_err(|error| Rejection::argument(self.command, index, error))
    }

    fn color(&self, index: usize) -> Result<Color, Rejection> {
        parse_color(&self.tokens[index])
            .map_err(|error| Rejection::argument(self.command, index, error))
    }

    fn point(&self, index: usize) -> Result<Point, Rejection> {
        Ok(Point {
            x: self.coordinate(index)?,
            y: self.coordinate(index + 1)?,
        })
    }

    /// Pairs of coordinates from `start` to the end of the arguments.
    fn points(&self, start: usize) -> Result<Vec<Point>, Rejection> {
        (start..self.len())
            .step_by(2)
            .map(|index| self.point(index))
            .collect()
    }

    fn rect(&self, index: usize) -> Result<IntRect, Rejection> {
        Ok(IntRect {
            x: self.coordinate(index)?,
            y: self.coordinate(index + 1)?,
            width: self.coordinate(index + 2)?,
            height: self.coordinate(index + 3)?,
        })
    }
}
