use std::convert::Infallible;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use embedded_graphics::{pixelcolor::Rgb888, prelude::*, Pixel};

use crate::overlay::{FrameSink, OverlayError};
use crate::render::{draw_frame, OverlayCore, RENDER_FPS};

/// An owned off-screen RGB surface matched 1:1 to the window's pixel size.
///
/// Out-of-bounds draws are clipped, never an error, so the frame pipeline is
/// infallible when it targets the crate's own surface.
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl Framebuffer {
    /// Allocates a surface of exactly `width` by `height` pixels, cleared to
    /// white.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::WHITE; (width * height) as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Raw pixel data in row-major order, top row first.
    pub fn data(&self) -> &[Rgb888] {
        &self.pixels
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.width
                && (point.y as u32) < self.height
            {
                self.pixels[(point.y as u32 * self.width + point.x as u32) as usize] = color;
            }
        }
        Ok(())
    }
}

/// Owns the dedicated render thread for one target size.
///
/// The thread redraws the shared overlay core at [`RENDER_FPS`] into a back
/// buffer, then publishes each finished frame to the front buffer and the
/// optional sink. The worker is resized by dropping it and spawning a new
/// one; [`RenderWorker::shutdown`] joins the thread, so by the time it
/// returns no render is in flight.
pub struct RenderWorker {
    width: u32,
    height: u32,
    front: Arc<Mutex<Framebuffer>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    /// Spawns the render thread at the given pixel size.
    pub fn spawn(
        width: u32,
        height: u32,
        core: Arc<Mutex<OverlayCore>>,
        sink: Option<Arc<dyn FrameSink>>,
    ) -> Result<Self, OverlayError> {
        let front = Arc::new(Mutex::new(Framebuffer::new(width, height)));
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let front = Arc::clone(&front);
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("pidscope-render".into())
                .spawn(move || render_loop(width, height, core, sink, front, stop))?
        };
        log::debug!("render worker started at {width}x{height}");
        Ok(Self {
            width,
            height,
            front,
            stop,
            handle: Some(handle),
        })
    }

    /// Width of the render target in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the render target in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Runs `f` against the most recently finished frame.
    pub fn with_latest_frame<R>(&self, f: impl FnOnce(&Framebuffer) -> R) -> R {
        let frame = self.front.lock().unwrap_or_else(PoisonError::into_inner);
        f(&frame)
    }

    /// Stops the render thread and blocks until it has exited.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("render thread panicked");
            }
            log::debug!("render worker stopped at {}x{}", self.width, self.height);
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn render_loop(
    width: u32,
    height: u32,
    core: Arc<Mutex<OverlayCore>>,
    sink: Option<Arc<dyn FrameSink>>,
    front: Arc<Mutex<Framebuffer>>,
    stop: Arc<AtomicBool>,
) {
    let period = Duration::from_secs(1) / RENDER_FPS;
    let mut back = Framebuffer::new(width, height);
    while !stop.load(Ordering::Relaxed) {
        let started = Instant::now();
        {
            let mut core = core.lock().unwrap_or_else(PoisonError::into_inner);
            // Cannot fail: Framebuffer draws are infallible
            let _ = draw_frame(&mut core, &mut back);
        }
        if let Some(sink) = &sink {
            sink.submit(&back);
        }
        {
            let mut front = front.lock().unwrap_or_else(PoisonError::into_inner);
            mem::swap(&mut *front, &mut back);
        }
        if let Some(rest) = period.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
}
