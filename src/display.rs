use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TrySendError};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::values::Color;

/// Process-wide backdrop color. The backdrop command writes it, the display
/// path reads it; nothing else consults it.
#[derive(Debug, Clone, Default)]
pub struct Backdrop(Arc<RwLock<Color>>);

impl Backdrop {
    pub fn get(&self) -> Color {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, color: Color) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = color;
    }
}

/// Receives a snapshot of the canvas whenever a command changed what the
/// display should show.
pub trait Presenter {
    fn present(&mut self, canvas: Option<&Pixmap>);
}

/// Renders the square display frame: the canvas scaled so its longer side
/// spans the frame, anchored top-left, over the backdrop color.
pub fn compose_frame(
    canvas: Option<&Pixmap>,
    backdrop: Color,
    display_size: u32,
) -> Result<Pixmap> {
    let mut frame = Pixmap::new(display_size, display_size)
        .ok_or_else(|| anyhow!("failed to allocate display frame {0}x{0}", display_size))?;
    frame.fill(backdrop.to_skia());

    if let Some(canvas) = canvas {
        let longest = canvas.width().max(canvas.height());
        let scale = display_size as f32 / longest as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        frame.draw_pixmap(
            0,
            0,
            canvas.as_ref(),
            &paint,
            Transform::from_scale(scale, scale),
            None,
        );
    }

    Ok(frame)
}

type Snapshot = Option<Pixmap>;

/// Headless display: a worker thread composes each snapshot and writes it to
/// a PNG file.
///
/// Only the newest snapshot is kept. `present` swaps it into a shared slot and
/// nudges the worker over a one-slot channel, so at most one frame waits while
/// another is being encoded and the interpreter never blocks.
pub struct PreviewPresenter {
    latest: Arc<Mutex<Option<Snapshot>>>,
    wake: Option<mpsc::SyncSender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PreviewPresenter {
    pub fn spawn(path: PathBuf, backdrop: Backdrop, display_size: u32) -> Result<Self> {
        let latest = Arc::new(Mutex::new(None::<Snapshot>));
        let (wake, woken) = mpsc::sync_channel::<()>(1);
        let pending = Arc::clone(&latest);
        let worker = thread::Builder::new()
            .name(String::from("gcon-preview"))
            .spawn(move || {
                while woken.recv().is_ok() {
                    let Some(snapshot) = pending
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .take()
                    else {
                        continue;
                    };
                    if let Err(error) =
                        write_preview(&path, snapshot.as_ref(), backdrop.get(), display_size)
                    {
                        log::warn!("preview: {error:#}");
                    }
                }
                log::debug!("preview: worker stopped");
            })
            .context("failed to spawn preview worker")?;

        Ok(Self {
            latest,
            wake: Some(wake),
            worker: Some(worker),
        })
    }
}

impl Presenter for PreviewPresenter {
    fn present(&mut self, canvas: Option<&Pixmap>) {
        let Some(wake) = &self.wake else {
            return;
        };
        // replaces any frame the worker has not picked up yet
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(canvas.cloned());
        match wake.try_send(()) {
            // a wake-up is already queued; it will pick up this frame
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                log::warn!("preview: worker is gone, dropping refresh");
            }
        }
    }
}

impl Drop for PreviewPresenter {
    fn drop(&mut self) {
        // closing the channel ends the worker loop once queued wake-ups drain
        self.wake.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("preview: worker panicked");
            }
        }
    }
}

fn write_preview(
    path: &Path,
    canvas: Option<&Pixmap>,
    backdrop: Color,
    display_size: u32,
) -> Result<()> {
    let frame = compose_frame(canvas, backdrop, display_size)?;
    frame
        .save_png(path)
        .with_context(|| format!("failed to write preview {}", path.display()))
}
