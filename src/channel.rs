use embedded_graphics::pixelcolor::Rgb888;

use crate::probe::PidState;

/// Identifies one plottable signal derived from a controller snapshot.
///
/// The catalog is fixed at compile time. Each channel carries a display
/// label, a plot color and a pure evaluation function; only the per-overlay
/// inclusion flags in [`ChannelSet`] are mutable state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Proportional contribution, `kp * err`.
    P,
    /// Integral contribution, `ki * integ`.
    I,
    /// Derivative contribution, `kd * deriv`.
    D,
    /// Raw error term.
    Ep,
    /// Raw integrated error.
    Ei,
    /// Raw error derivative.
    Ed,
    /// Proportional gain.
    Kp,
    /// Integral gain.
    Ki,
    /// Integral clamp limit.
    Li,
    /// Derivative gain.
    Kd,
    /// Derivative rate limit.
    Rd,
}

impl ChannelId {
    /// All channels in catalog order, which is also plot and legend order.
    pub const ALL: [ChannelId; 11] = [
        ChannelId::P,
        ChannelId::I,
        ChannelId::D,
        ChannelId::Ep,
        ChannelId::Ei,
        ChannelId::Ed,
        ChannelId::Kp,
        ChannelId::Ki,
        ChannelId::Li,
        ChannelId::Kd,
        ChannelId::Rd,
    ];

    /// Number of channels in the catalog.
    pub const COUNT: usize = Self::ALL.len();

    /// Display label used in the legend readout.
    pub fn label(self) -> &'static str {
        match self {
            ChannelId::P => "P",
            ChannelId::I => "I",
            ChannelId::D => "D",
            ChannelId::Ep => "Ep",
            ChannelId::Ei => "Ei",
            ChannelId::Ed => "Ed",
            ChannelId::Kp => "Kp",
            ChannelId::Ki => "Ki",
            ChannelId::Li => "Li",
            ChannelId::Kd => "Kd",
            ChannelId::Rd => "Rd",
        }
    }

    /// Fixed plot color. Contribution channels and their raw error terms
    /// share hues so related traces read together.
    pub fn color(self) -> Rgb888 {
        match self {
            ChannelId::P | ChannelId::Ep => Rgb888::new(255, 0, 0),
            ChannelId::I | ChannelId::Ei => Rgb888::new(0, 204, 0),
            ChannelId::D | ChannelId::Ed => Rgb888::new(0, 0, 255),
            ChannelId::Kp => Rgb888::new(255, 255, 0),
            ChannelId::Ki => Rgb888::new(255, 0, 255),
            ChannelId::Li => Rgb888::new(0, 255, 255),
            ChannelId::Kd => Rgb888::new(204, 128, 0),
            ChannelId::Rd => Rgb888::new(204, 0, 128),
        }
    }

    /// Evaluates this channel against one snapshot.
    ///
    /// Pure and deterministic: two calls on the same snapshot produce
    /// bit-identical results.
    pub fn value(self, state: &PidState) -> f64 {
        match self {
            ChannelId::P => state.kp * state.err,
            ChannelId::I => state.ki * state.integ,
            ChannelId::D => state.kd * state.deriv,
            ChannelId::Ep => state.err,
            ChannelId::Ei => state.integ,
            ChannelId::Ed => state.deriv,
            ChannelId::Kp => state.kp,
            ChannelId::Ki => state.ki,
            ChannelId::Li => state.lim_i,
            ChannelId::Kd => state.kd,
            ChannelId::Rd => state.r_d,
        }
    }

    /// Position of this channel in catalog order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The channel at a catalog position.
    ///
    /// # Panics
    /// Panics on an out-of-range index; channel identifiers are fixed at
    /// compile time, so a bad index is a programming error in the caller.
    pub fn from_index(index: usize) -> Self {
        match Self::ALL.get(index) {
            Some(id) => *id,
            None => panic!("channel index {index} out of range"),
        }
    }
}

/// Per-channel inclusion flags deciding what gets plotted.
///
/// Defaults to the three controller contributions (P, I and D) enabled,
/// which is the readout that answers "what is the controller doing" at a
/// glance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelSet {
    enabled: [bool; ChannelId::COUNT],
}

impl Default for ChannelSet {
    fn default() -> Self {
        let mut set = Self::none();
        set.enable(ChannelId::P);
        set.enable(ChannelId::I);
        set.enable(ChannelId::D);
        set
    }
}

impl ChannelSet {
    /// A set with every channel disabled.
    pub fn none() -> Self {
        Self {
            enabled: [false; ChannelId::COUNT],
        }
    }

    /// Flips the inclusion flag of one channel.
    pub fn toggle(&mut self, id: ChannelId) {
        self.enabled[id.index()] = !self.enabled[id.index()];
    }

    /// Whether the channel is currently plotted.
    pub fn is_enabled(&self, id: ChannelId) -> bool {
        self.enabled[id.index()]
    }

    /// Marks the channel for plotting.
    pub fn enable(&mut self, id: ChannelId) {
        self.enabled[id.index()] = true;
    }

    /// Removes the channel from plotting.
    pub fn disable(&mut self, id: ChannelId) {
        self.enabled[id.index()] = false;
    }

    /// Iterates the enabled channels in catalog order.
    pub fn enabled(&self) -> impl Iterator<Item = ChannelId> + '_ {
        ChannelId::ALL
            .iter()
            .copied()
            .filter(move |id| self.is_enabled(*id))
    }
}
