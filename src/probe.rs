use std::sync::{Mutex, PoisonError, RwLock};

/// One raw snapshot of a PID controller's internal state.
///
/// The overlay only reads these fields; the controller that produces them is
/// external and owns the live values. The field layout mirrors the working
/// variables of a textbook discrete PID loop.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidState {
    /// Proportional gain.
    pub kp: f64,

    /// Integral gain.
    pub ki: f64,

    /// Derivative gain.
    pub kd: f64,

    /// Current error term.
    pub err: f64,

    /// Integrated error.
    pub integ: f64,

    /// Error derivative. Controllers write NaN here when they reinitialize
    /// their error tracking; see [`Sample::from_state`].
    pub deriv: f64,

    /// Integral clamp limit. May be infinite when the integrator is unclamped.
    pub lim_i: f64,

    /// Derivative rate limit. May be infinite when the derivative is unclamped.
    pub r_d: f64,
}

/// A classified snapshot, ready to be recorded into the sample ring.
///
/// Classification turns the controller's in-band NaN marker into an explicit
/// variant, so downstream code never has to compare against a sentinel value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sample {
    /// An ordinary snapshot carrying plottable history.
    Valid(PidState),

    /// The controller reinitialized its error tracking since the last tick.
    ControllerReset,
}

impl Sample {
    /// Classifies a raw snapshot. A NaN error derivative is the controller's
    /// out-of-band signal that it was just reset.
    pub fn from_state(state: PidState) -> Self {
        if state.deriv.is_nan() {
            Sample::ControllerReset
        } else {
            Sample::Valid(state)
        }
    }

    /// Returns the inner state of a valid snapshot.
    pub fn state(&self) -> Option<&PidState> {
        match self {
            Sample::Valid(state) => Some(state),
            Sample::ControllerReset => None,
        }
    }
}

/// Read-only access to the externally owned controller state.
///
/// The overlay holds a shared handle to the probe and snapshots it once per
/// rendered frame from the render thread, so implementations must be safe to
/// call concurrently with whatever thread runs the controller itself.
pub trait ControllerProbe: Send + Sync {
    /// Copies out the controller's working variables as they are right now.
    fn snapshot(&self) -> PidState;
}

impl ControllerProbe for Mutex<PidState> {
    fn snapshot(&self) -> PidState {
        *self.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ControllerProbe for RwLock<PidState> {
    fn snapshot(&self) -> PidState {
        *self.read().unwrap_or_else(PoisonError::into_inner)
    }
}
