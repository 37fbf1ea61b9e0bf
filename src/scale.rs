use crate::channel::ChannelSet;
use crate::ring::SampleRing;

/// The shared vertical value range for one rendered frame.
///
/// Recomputed from scratch every frame; never persisted. All enabled
/// channels share one range so their traces are directly comparable on the
/// same axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleRange {
    min: f64,
    max: f64,
}

impl ScaleRange {
    /// Folds every enabled channel over the `window` newest snapshots.
    ///
    /// The fold starts at zero on both ends, so the zero axis always falls
    /// inside the range even when every observed value has the same sign.
    /// The walk over history stops at a reset boundary, and a NaN channel
    /// value likewise terminates that channel's walk; range estimation must
    /// not cross into a previous controller run.
    ///
    /// An empty ring or an all-disabled channel set yields the degenerate
    /// `(0, 0)` range, signaling that there is nothing to draw.
    pub fn compute(ring: &SampleRing, channels: &ChannelSet, window: usize) -> Self {
        let mut min = 0.0_f64;
        let mut max = 0.0_f64;
        for id in channels.enabled() {
            for state in ring.iter_recent(window) {
                let value = id.value(state);
                if value.is_nan() {
                    break;
                }
                min = min.min(value);
                max = max.max(value);
            }
        }
        ScaleRange { min, max }
    }

    /// Lower bound of the range. At most zero.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the range. At least zero.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// A flat range carries nothing to plot and would divide by zero in
    /// [`ScaleRange::position`], so rendering skips the data series.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Maps `value` into `[0, 1]` within the range, clamped at both ends;
    /// 0 at `min`, 1 at `max`. Degenerate ranges and non-finite fractions
    /// map to 0.
    pub fn position(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let fract = (value - self.min) / (self.max - self.min);
        if fract.is_finite() {
            fract.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
