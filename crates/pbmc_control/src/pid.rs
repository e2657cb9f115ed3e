//! Discrete three-axis PID controller

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gains and output limit for one PID channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain
    pub p: f32,
    /// Integral gain
    pub i: f32,
    /// Derivative gain
    pub d: f32,
    /// Maximum output magnitude
    pub max: f32,
}

impl PidGains {
    pub const fn new(p: f32, i: f32, d: f32, max: f32) -> Self {
        Self { p, i, d, max }
    }

    /// Position channel defaults
    pub const LINEAR: Self = Self::new(300.0, 0.0, 50.0, 9000.0);

    /// Orientation channel defaults
    pub const ANGULAR: Self = Self::new(128.0, 0.0, 0.0, 1500.0);

    pub fn is_valid(&self) -> bool {
        [self.p, self.i, self.d, self.max].iter().all(|v| v.is_finite()) && self.max >= 0.0
    }
}

/// PID over a 3D error vector.
///
/// The integral is not clamped on its own; only the output magnitude is
/// limited.
#[derive(Debug, Clone, PartialEq)]
pub struct PidController3 {
    pub gains: PidGains,
    integral: Vec3,
    prev_error: Vec3,
}

impl PidController3 {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: Vec3::ZERO,
            prev_error: Vec3::ZERO,
        }
    }

    /// Advance one step and return the clamped output.
    ///
    /// A non-positive `dt` returns zero and leaves the state untouched.
    pub fn update(&mut self, error: Vec3, dt: f32) -> Vec3 {
        if dt <= 0.0 {
            return Vec3::ZERO;
        }

        self.integral += error * dt;
        let derivative = (error - self.prev_error) / dt;
        self.prev_error = error;

        let out = error * self.gains.p + self.integral * self.gains.i + derivative * self.gains.d;
        out.clamp_length_max(self.gains.max)
    }

    pub fn reset(&mut self) {
        self.integral = Vec3::ZERO;
        self.prev_error = Vec3::ZERO;
    }

    /// Accumulated error integral
    pub fn integral(&self) -> Vec3 {
        self.integral
    }

    pub fn prev_error(&self) -> Vec3 {
        self.prev_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_proportional_only() {
        let mut pid = PidController3::new(PidGains::new(2.0, 0.0, 0.0, 100.0));
        let out = pid.update(Vec3::new(1.0, -2.0, 3.0), 0.1);
        assert_eq!(out, Vec3::new(2.0, -4.0, 6.0));
    }

    #[test]
    fn test_output_clamped_by_magnitude() {
        let mut pid = PidController3::new(PidGains::new(1000.0, 0.0, 0.0, 10.0));
        let out = pid.update(Vec3::new(3.0, 4.0, 0.0), 1.0 / 60.0);
        assert_relative_eq!(out.length(), 10.0, epsilon = 1e-4);
        // Direction is kept
        assert_relative_eq!(out.x / out.y, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_integral_accumulates_without_clamp() {
        let mut pid = PidController3::new(PidGains::new(0.0, 1.0, 0.0, 1.0));
        for _ in 0..100 {
            pid.update(Vec3::X, 0.5);
        }
        // Output saturates, the integral keeps growing
        assert_relative_eq!(pid.integral().x, 50.0, epsilon = 1e-4);
        assert_relative_eq!(pid.update(Vec3::X, 0.5).length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_derivative() {
        let mut pid = PidController3::new(PidGains::new(0.0, 0.0, 1.0, 1000.0));
        pid.update(Vec3::X, 0.5);
        let out = pid.update(Vec3::X * 2.0, 0.5);
        assert_relative_eq!(out.x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_positive_dt() {
        let mut pid = PidController3::new(PidGains::LINEAR);
        assert_eq!(pid.update(Vec3::X, 0.0), Vec3::ZERO);
        assert_eq!(pid.update(Vec3::X, -1.0), Vec3::ZERO);
        assert_eq!(pid.prev_error(), Vec3::ZERO);
        assert_eq!(pid.integral(), Vec3::ZERO);
    }

    #[test]
    fn test_reset() {
        let mut pid = PidController3::new(PidGains::new(1.0, 1.0, 1.0, 100.0));
        pid.update(Vec3::ONE, 0.1);
        pid.reset();
        assert_eq!(pid.integral(), Vec3::ZERO);
        assert_eq!(pid.prev_error(), Vec3::ZERO);
    }

    #[test]
    fn test_gains_validity() {
        assert!(PidGains::LINEAR.is_valid());
        assert!(!PidGains::new(1.0, 0.0, 0.0, -1.0).is_valid());
        assert!(!PidGains::new(f32::NAN, 0.0, 0.0, 1.0).is_valid());
    }
}
