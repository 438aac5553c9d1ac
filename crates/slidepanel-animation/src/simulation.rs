//! Time-keyed motion curves.
//!
//! A [`Simulation`] answers "where is the value after `play_time_nanos`"
//! without carrying mutable state, so a frame loop can sample it at any
//! timestamp the host delivers.

use crate::animation::{AnimationSpec, SpringSpec};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Trait for motions sampled by elapsed play time.
pub trait Simulation {
    /// Value at the given play time.
    fn value_from_nanos(&self, play_time_nanos: u64) -> f64;

    /// Velocity in units per second at the given play time.
    fn velocity_from_nanos(&self, play_time_nanos: u64) -> f64;

    /// Whether the motion has come to rest at the given play time.
    fn is_finished(&self, play_time_nanos: u64) -> bool;

    /// Value the motion settles on.
    fn end_value(&self) -> f64;
}

/// Interpolation from `start` to `target` over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct TweenSimulation {
    start: f64,
    target: f64,
    spec: AnimationSpec,
}

impl TweenSimulation {
    pub fn new(start: f64, target: f64, spec: AnimationSpec) -> Self {
        Self {
            start,
            target,
            spec,
        }
    }

    fn fraction(&self, play_time_nanos: u64) -> f64 {
        let duration = self.spec.duration_nanos();
        if duration == 0 {
            return 1.0;
        }
        (play_time_nanos as f64 / duration as f64).clamp(0.0, 1.0)
    }
}

impl Simulation for TweenSimulation {
    fn value_from_nanos(&self, play_time_nanos: u64) -> f64 {
        let progress = self.spec.easing.transform(self.fraction(play_time_nanos));
        self.start + (self.target - self.start) * progress
    }

    fn velocity_from_nanos(&self, play_time_nanos: u64) -> f64 {
        const PROBE_NANOS: u64 = 1_000_000;
        if self.is_finished(play_time_nanos) {
            return 0.0;
        }
        let ahead = self.value_from_nanos(play_time_nanos + PROBE_NANOS);
        let here = self.value_from_nanos(play_time_nanos);
        (ahead - here) * NANOS_PER_SECOND / PROBE_NANOS as f64
    }

    fn is_finished(&self, play_time_nanos: u64) -> bool {
        play_time_nanos >= self.spec.duration_nanos()
    }

    fn end_value(&self) -> f64 {
        self.target
    }
}

#[derive(Debug, Clone, Copy)]
enum SpringSolution {
    Critical {
        omega: f64,
        c1: f64,
        c2: f64,
    },
    Underdamped {
        decay: f64,
        omega_d: f64,
        c1: f64,
        c2: f64,
    },
    Overdamped {
        r1: f64,
        r2: f64,
        c1: f64,
        c2: f64,
    },
}

impl SpringSolution {
    fn new(spec: &SpringSpec, displacement: f64, velocity: f64) -> Self {
        let omega = spec.stiffness.max(f64::EPSILON).sqrt();
        let zeta = spec.damping_ratio.max(0.0);

        if (zeta - 1.0).abs() < 1e-6 {
            SpringSolution::Critical {
                omega,
                c1: displacement,
                c2: velocity + omega * displacement,
            }
        } else if zeta < 1.0 {
            let decay = zeta * omega;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            SpringSolution::Underdamped {
                decay,
                omega_d,
                c1: displacement,
                c2: (velocity + decay * displacement) / omega_d,
            }
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (velocity - r1 * displacement) / (r2 - r1);
            SpringSolution::Overdamped {
                r1,
                r2,
                c1: displacement - c2,
                c2,
            }
        }
    }

    fn displacement(&self, t: f64) -> f64 {
        match *self {
            SpringSolution::Critical { omega, c1, c2 } => (c1 + c2 * t) * (-omega * t).exp(),
            SpringSolution::Underdamped {
                decay,
                omega_d,
                c1,
                c2,
            } => (-decay * t).exp() * (c1 * (omega_d * t).cos() + c2 * (omega_d * t).sin()),
            SpringSolution::Overdamped { r1, r2, c1, c2 } => {
                c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
            }
        }
    }

    fn velocity(&self, t: f64) -> f64 {
        match *self {
            SpringSolution::Critical { omega, c1, c2 } => {
                (c2 - omega * (c1 + c2 * t)) * (-omega * t).exp()
            }
            SpringSolution::Underdamped {
                decay,
                omega_d,
                c1,
                c2,
            } => {
                let envelope = (-decay * t).exp();
                let (sin, cos) = (omega_d * t).sin_cos();
                envelope
                    * ((c2 * omega_d - decay * c1) * cos - (c1 * omega_d + decay * c2) * sin)
            }
            SpringSolution::Overdamped { r1, r2, c1, c2 } => {
                c1 * r1 * (r1 * t).exp() + c2 * r2 * (r2 * t).exp()
            }
        }
    }
}

/// Closed-form damped harmonic oscillator moving from `start` toward `end`.
#[derive(Debug, Clone, Copy)]
pub struct SpringSimulation {
    spec: SpringSpec,
    end: f64,
    solution: SpringSolution,
}

impl SpringSimulation {
    pub fn new(spec: SpringSpec, start: f64, end: f64, velocity: f64) -> Self {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        Self {
            spec,
            end,
            solution: SpringSolution::new(&spec, start - end, velocity),
        }
    }

    fn seconds(play_time_nanos: u64) -> f64 {
        play_time_nanos as f64 / NANOS_PER_SECOND
    }
}

impl Simulation for SpringSimulation {
    fn value_from_nanos(&self, play_time_nanos: u64) -> f64 {
        self.end + self.solution.displacement(Self::seconds(play_time_nanos))
    }

    fn velocity_from_nanos(&self, play_time_nanos: u64) -> f64 {
        self.solution.velocity(Self::seconds(play_time_nanos))
    }

    fn is_finished(&self, play_time_nanos: u64) -> bool {
        let t = Self::seconds(play_time_nanos);
        self.solution.displacement(t).abs() < self.spec.position_threshold
            && self.solution.velocity(t).abs() < self.spec.velocity_threshold
    }

    fn end_value(&self) -> f64 {
        self.end
    }
}
