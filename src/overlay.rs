// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::channel::ChannelId;
use crate::probe::ControllerProbe;
use crate::render::OverlayCore;
use crate::surface::{Framebuffer, RenderWorker};

/// Window geometry in host screen coordinates, origin at the bottom left.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Left edge, pixels.
    pub left: i32,
    /// Top edge, pixels.
    pub top: i32,
    /// Right edge, pixels.
    pub right: i32,
    /// Bottom edge, pixels.
    pub bottom: i32,
}

impl WindowGeometry {
    /// Width in pixels. Degenerate geometry clamps to zero.
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    /// Height in pixels. Degenerate geometry clamps to zero.
    pub fn height(&self) -> u32 {
        (self.top - self.bottom).max(0) as u32
    }
}

/// Default placement of a freshly created overlay window.
pub const DEFAULT_GEOMETRY: WindowGeometry = WindowGeometry {
    left: 100,
    top: 500,
    right: 500,
    bottom: 100,
};

/// Minimum interactive window size enforced through the host's resize limits.
pub const MIN_WINDOW_SIZE: (u32, u32) = (300, 300);

/// The window services the overlay consumes from the host.
///
/// The host owns window creation, decoration and event dispatch; the overlay
/// only reads geometry and drives visibility through this seam. Methods take
/// `&self` because hosts typically hand out an opaque window handle.
pub trait HostWindow: Send {
    /// Current window geometry in screen pixels.
    fn geometry(&self) -> WindowGeometry;

    /// Sets the window title.
    fn set_title(&self, title: &str);

    /// Constrains interactive resizing.
    fn set_resize_limits(&self, min_w: u32, min_h: u32, max_w: u32, max_h: u32);

    /// Shows or hides the window.
    fn set_visible(&self, visible: bool);

    /// Whether the window is currently visible.
    fn is_visible(&self) -> bool;

    /// Raises the window above its siblings.
    fn bring_to_front(&self);
}

/// Optional host-owned upload path for finished frames.
///
/// Called from the render thread once per finished frame, e.g. to hand the
/// pixels to a GPU texture uploader.
pub trait FrameSink: Send + Sync {
    /// Receives one finished frame.
    fn submit(&self, frame: &Framebuffer);
}

/// Errors surfaced by the overlay's fallible edges.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The render thread could not be spawned.
    #[error("failed to spawn the render thread: {0}")]
    RenderThread(#[from] std::io::Error),
}

/// A floating debug window that samples one PID controller per rendered
/// frame and plots the recent history as scrolling line charts.
///
/// Construction makes the window visible and frontmost; the window may be
/// hidden and reshown any number of times without losing sample history.
/// Dropping the overlay releases, in order, the window, the render worker
/// (joined, so no render is in flight afterwards) and the sample history.
pub struct Overlay<W: HostWindow> {
    window: W,
    core: Arc<Mutex<OverlayCore>>,
    sink: Option<Arc<dyn FrameSink>>,
    worker: Option<RenderWorker>,
}

impl<W: HostWindow> Overlay<W> {
    /// Creates the overlay over a host window and opens it.
    ///
    /// The probe is a shared handle to the externally owned controller state
    /// that each rendered frame snapshots; `sink` optionally receives every
    /// finished frame on the render thread.
    ///
    /// # Panics
    /// Panics if `title` is empty.
    pub fn new(
        window: W,
        title: &str,
        probe: Arc<dyn ControllerProbe>,
        sink: Option<Arc<dyn FrameSink>>,
    ) -> Self {
        assert!(!title.is_empty(), "overlay title must be non-empty");
        window.set_title(title);
        window.set_resize_limits(MIN_WINDOW_SIZE.0, MIN_WINDOW_SIZE.1, 1_000_000, 1_000_000);
        let overlay = Self {
            window,
            core: Arc::new(Mutex::new(OverlayCore::new(probe))),
            sink,
            worker: None,
        };
        log::debug!("overlay {title:?} created");
        overlay.open();
        overlay
    }

    /// Makes the window visible and raises it to the front.
    pub fn open(&self) {
        self.window.set_visible(true);
        self.window.bring_to_front();
    }

    /// Whether the window is currently visible.
    pub fn is_open(&self) -> bool {
        self.window.is_visible()
    }

    /// The host window this overlay draws into.
    pub fn window(&self) -> &W {
        &self.window
    }

    /// Host draw callback.
    ///
    /// Reads the current window geometry; if no render target exists or its
    /// dimensions differ, the old render worker is shut down (joined) and a
    /// new one spawned at the new pixel size. The latest finished frame is
    /// then handed to `present` together with the geometry so the host can
    /// blit it into the window.
    pub fn draw<F>(&mut self, present: F) -> Result<(), OverlayError>
    where
        F: FnOnce(&Framebuffer, WindowGeometry),
    {
        let geometry = self.window.geometry();
        let (w, h) = (geometry.width(), geometry.height());
        let stale = self
            .worker
            .as_ref()
            .map_or(true, |worker| worker.width() != w || worker.height() != h);
        if stale {
            if let Some(mut old) = self.worker.take() {
                log::debug!(
                    "window resized from {}x{} to {w}x{h}; recreating render target",
                    old.width(),
                    old.height()
                );
                old.shutdown();
            }
            self.worker = Some(RenderWorker::spawn(
                w,
                h,
                Arc::clone(&self.core),
                self.sink.clone(),
            )?);
        }
        if let Some(worker) = &self.worker {
            worker.with_latest_frame(|frame| present(frame, geometry));
        }
        Ok(())
    }

    /// Host per-tick callback glue: pauses sampling while the simulator
    /// clock is stopped. Rendering continues while paused.
    pub fn set_paused(&self, paused: bool) {
        self.lock_core().set_paused(paused);
    }

    /// Flips whether a channel is plotted.
    pub fn toggle_channel(&self, id: ChannelId) {
        self.lock_core().channels_mut().toggle(id);
    }

    /// Whether a channel is currently plotted.
    pub fn channel_enabled(&self, id: ChannelId) -> bool {
        self.lock_core().channels().is_enabled(id)
    }

    /// Number of snapshots currently retained.
    pub fn sample_count(&self) -> usize {
        self.lock_core().ring().len()
    }

    /// Pixel size of the current render target, if one exists.
    pub fn render_size(&self) -> Option<(u32, u32)> {
        self.worker
            .as_ref()
            .map(|worker| (worker.width(), worker.height()))
    }

    fn lock_core(&self) -> MutexGuard<'_, OverlayCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: HostWindow> Drop for Overlay<W> {
    fn drop(&mut self) {
        self.window.set_visible(false);
        if let Some(mut worker) = self.worker.take() {
            worker.shutdown();
        }
        log::debug!("overlay destroyed");
    }
}
