use std::sync::{Mutex, PoisonError};

use nalgebra as na;

use crate::probe::{ControllerProbe, PidState};

/// A deliberately simple PID loop whose working variables are exposed as
/// [`PidState`], standing in for the externally owned controller the overlay
/// would observe inside a host plugin.
pub struct DemoPid {
    state: PidState,
    last_err: f64,
    initialized: bool,
}

impl DemoPid {
    /// Creates a controller with the given gains and unclamped limits.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            state: PidState {
                kp,
                ki,
                kd,
                lim_i: f64::INFINITY,
                r_d: f64::INFINITY,
                ..Default::default()
            },
            last_err: 0.0,
            initialized: false,
        }
    }

    /// Advances one control step of length `dt` seconds and returns the
    /// control output.
    pub fn step(&mut self, measurement: f64, setpoint: f64, dt: f64) -> f64 {
        let err = setpoint - measurement;
        let s = &mut self.state;
        s.err = err;
        s.integ = (s.integ + err * dt).clamp(-s.lim_i, s.lim_i);
        s.deriv = if self.initialized {
            ((err - self.last_err) / dt).clamp(-s.r_d, s.r_d)
        } else {
            0.0
        };
        self.last_err = err;
        self.initialized = true;
        s.kp * err + s.ki * s.integ + s.kd * s.deriv
    }

    /// Reinitializes error tracking, writing the NaN marker that the
    /// overlay's sampling path recognizes as a controller reset.
    pub fn reset(&mut self) {
        self.state.integ = 0.0;
        self.state.deriv = f64::NAN;
        self.last_err = 0.0;
        self.initialized = false;
    }

    /// The controller's current working variables.
    pub fn state(&self) -> PidState {
        self.state
    }
}

impl ControllerProbe for Mutex<DemoPid> {
    fn snapshot(&self) -> PidState {
        self.lock().unwrap_or_else(PoisonError::into_inner).state()
    }
}

pub enum WaveForm {
    Sine,
    Square,
}

pub struct SignalGenerator {
    fcn: fn(f64) -> f64,
    amplitude: f64,
    offset: f64,
}

impl SignalGenerator {
    pub fn new(waveform: WaveForm, amplitude: f64, offset: f64) -> Self {
        Self {
            fcn: match waveform {
                WaveForm::Sine => f64::sin,
                WaveForm::Square => |x| x.sin().signum(),
            },
            amplitude,
            offset,
        }
    }

    pub fn generate(&self, time_s: f64) -> f64 {
        self.amplitude * (self.fcn)(time_s) + self.offset
    }
}

pub struct MassSpringDamper {
    pub natural_frequency: f64,
    pub damping_ratio: f64,
}

impl MassSpringDamper {
    /// Implements the state-space realization of the mass-spring-damper system:
    /// ┌     ┐   ┌              ┐┌    ┐   ┌     ┐
    /// │ p'  │ = │  0     1     ││ p  │ + │ 0   │ u
    /// │ p'' │   │  -ωₙ²  -2ζωₙ ││ p' │   │ ωₙ² │
    /// └     ┘   └              ┘└    ┘   └     ┘
    ///     ┌      ┐┌    ┐
    /// p = │ 1  0 ││ p  │
    ///     └      ┘│ p' │
    ///             └    ┘
    pub fn f(&self, x: na::Vector2<f64>, u: f64) -> na::Vector2<f64> {
        let omega_sq = self.natural_frequency.powi(2);
        let two_zeta_omega = 2.0 * self.natural_frequency * self.damping_ratio;

        let mat_a = na::Matrix2::new(0.0, 1.0, -omega_sq, -two_zeta_omega);
        let mat_b = na::Vector2::new(0.0, omega_sq);

        mat_a * x + mat_b * u
    }

    pub fn h(&self, x: na::Vector2<f64>) -> f64 {
        x[0]
    }
}

/// Classical fourth-order Runge-Kutta step for the demo plant dynamics.
pub fn rk4_step<F>(f: F, x: na::Vector2<f64>, dt: f64) -> na::Vector2<f64>
where
    F: Fn(na::Vector2<f64>) -> na::Vector2<f64>,
{
    let k1 = f(x);
    let k2 = f(x + 0.5 * dt * k1);
    let k3 = f(x + 0.5 * dt * k2);
    let k4 = f(x + dt * k3);
    x + dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}
