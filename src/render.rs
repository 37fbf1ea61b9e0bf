use std::sync::Arc;

use embedded_graphics::{
    mono_font::{ascii::FONT_9X15, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, Polyline, PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};

use crate::channel::{ChannelId, ChannelSet};
use crate::probe::{ControllerProbe, PidState, Sample};
use crate::ring::{RecordOutcome, SampleRing};
use crate::scale::ScaleRange;

/// Target refresh rate of the render thread, frames per second.
pub const RENDER_FPS: u32 = 30;

/// Horizontal pixels between consecutive samples. Older samples scroll off
/// the left edge once they age past the visible width.
pub const PX_PER_STEP: u32 = 2;

/// Margin around the plot area, pixels.
pub const MARGIN: u32 = 25;

/// Height of one legend line, pixels.
pub const LINE_HEIGHT: u32 = 18;

/// Width of the legend background box, pixels.
pub const LEGEND_W: u32 = 125;

/// Legend color for channels that are not currently plotted.
const MUTED: Rgb888 = Rgb888::new(171, 171, 171);

const RESET_TEXT: &str = "PID reset";

/// The sampling and plotting state shared between the host callback thread
/// and the render thread.
///
/// The core itself is single-threaded; callers must serialize access, which
/// [`crate::overlay::Overlay`] does by keeping it behind one mutex. At most
/// one render runs against a core at a time.
pub struct OverlayCore {
    ring: SampleRing,
    channels: ChannelSet,
    paused: bool,
    reset: bool,
    probe: Arc<dyn ControllerProbe>,
}

impl OverlayCore {
    /// Creates a core sampling from `probe` with the default channel set.
    pub fn new(probe: Arc<dyn ControllerProbe>) -> Self {
        Self {
            ring: SampleRing::new(),
            channels: ChannelSet::default(),
            paused: false,
            reset: false,
            probe,
        }
    }

    /// The recorded snapshot history.
    pub fn ring(&self) -> &SampleRing {
        &self.ring
    }

    /// The per-channel inclusion flags.
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Mutable access to the per-channel inclusion flags.
    pub fn channels_mut(&mut self) -> &mut ChannelSet {
        &mut self.channels
    }

    /// Pauses or resumes sampling. Rendering continues while paused; the
    /// plot simply stops scrolling.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Whether sampling is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the most recent sampling tick observed a controller reset.
    pub fn was_reset(&self) -> bool {
        self.reset
    }

    /// Pulls one fresh snapshot from the probe into the ring and latches the
    /// reset flag for the renderer.
    pub fn sample_once(&mut self) -> RecordOutcome {
        let outcome = self.ring.record(Sample::from_state(self.probe.snapshot()));
        self.reset = outcome == RecordOutcome::Reset;
        outcome
    }
}

/// Number of samples that fit across the plot width at the fixed stride.
pub fn visible_window(width: u32) -> usize {
    (width.saturating_sub(2 * MARGIN) as f64 / PX_PER_STEP as f64).ceil() as usize
}

/// Vertical pixel row for `value` under the current range; value increases
/// upward between the bottom and top margins.
fn plot_y(range: &ScaleRange, value: f64, height: u32) -> i32 {
    let span = height.saturating_sub(2 * MARGIN) as f64;
    (MARGIN as f64 + span * (1.0 - range.position(value))).round() as i32
}

/// Renders one complete frame into `target`.
///
/// Runs the whole per-tick pipeline: grabs a fresh sample (unless paused),
/// rescales, then draws background, axes, one polyline per enabled channel
/// and the legend readout. The only state it mutates is the core's sample
/// ring. A frame that observed a controller reset short-circuits into the
/// reset indicator.
///
/// Drawing into the crate's own [`crate::surface::Framebuffer`] cannot fail;
/// the error type only surfaces for foreign draw targets.
pub fn draw_frame<D>(core: &mut OverlayCore, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let size = target.bounding_box().size;
    let (w, h) = (size.width, size.height);

    target.clear(Rgb888::WHITE)?;

    // Grab a fresh sample every draw cycle
    if !core.paused {
        core.sample_once();
    }
    if core.reset {
        Text::with_alignment(
            RESET_TEXT,
            Point::new(w as i32 / 2, h as i32 / 2),
            MonoTextStyle::new(&FONT_9X15, Rgb888::RED),
            Alignment::Center,
        )
        .draw(target)?;
        return Ok(());
    }

    let window = visible_window(w);
    let range = ScaleRange::compute(&core.ring, &core.channels, window);
    if !range.is_degenerate() {
        draw_axes(target, &range, w, h)?;
        for id in core.channels.enabled() {
            draw_polyline(target, &core.ring, id, &range, window, w, h)?;
        }
    }
    if let Some(latest) = core.ring.latest().copied() {
        draw_legend(target, &core.channels, &latest)?;
    }
    Ok(())
}

/// A vertical line at the left margin plus the horizontal zero line, both
/// black.
fn draw_axes<D>(target: &mut D, range: &ScaleRange, w: u32, h: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let style = PrimitiveStyle::with_stroke(Rgb888::BLACK, 1);
    let y_zero = plot_y(range, 0.0, h);
    Line::new(
        Point::new(MARGIN as i32, MARGIN as i32),
        Point::new(MARGIN as i32, h.saturating_sub(MARGIN) as i32),
    )
    .into_styled(style)
    .draw(target)?;
    Line::new(
        Point::new(MARGIN as i32, y_zero),
        Point::new(w.saturating_sub(MARGIN) as i32, y_zero),
    )
    .into_styled(style)
    .draw(target)
}

/// One channel's trace: anchored at the right margin on the newest sample,
/// walking left one stride per sample, stopping at a reset boundary.
fn draw_polyline<D>(
    target: &mut D,
    ring: &SampleRing,
    id: ChannelId,
    range: &ScaleRange,
    window: usize,
    w: u32,
    h: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let mut points = Vec::with_capacity(window.min(ring.len()));
    let mut x = w.saturating_sub(MARGIN) as i32;
    for state in ring.iter_recent(window) {
        let value = id.value(state);
        if value.is_nan() {
            break;
        }
        points.push(Point::new(x, plot_y(range, value, h)));
        x -= PX_PER_STEP as i32;
    }
    if points.len() < 2 {
        return Ok(());
    }
    Polyline::new(&points)
        .into_styled(PrimitiveStyle::with_stroke(id.color(), 1))
        .draw(target)
}

/// The legend doubles as a live readout and a selection-state indicator:
/// every channel is listed with the newest value, enabled ones in their plot
/// color, disabled ones muted gray. Drawn over an opaque background so the
/// text stays readable when traces pass underneath.
fn draw_legend<D>(target: &mut D, channels: &ChannelSet, latest: &PidState) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Rectangle::new(
        Point::new(MARGIN as i32, MARGIN as i32),
        Size::new(LEGEND_W, ChannelId::COUNT as u32 * LINE_HEIGHT),
    )
    .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
    .draw(target)?;

    let x = (3 * MARGIN / 2) as i32;
    for (row, id) in ChannelId::ALL.iter().enumerate() {
        let color = if channels.is_enabled(*id) {
            id.color()
        } else {
            MUTED
        };
        let y = (3 * MARGIN / 2 + row as u32 * LINE_HEIGHT) as i32;
        let readout = format!("{}: {:.6}", id.label(), id.value(latest));
        Text::new(&readout, Point::new(x, y), MonoTextStyle::new(&FONT_9X15, color))
            .draw(target)?;
    }
    Ok(())
}
