use std::f32::consts::TAU;

use crate::geometry::Vec2;

/// Damped spring described by frequency and damping ratio.
///
/// With rest length zero the spring acts along the full offset vector;
/// otherwise it acts along the line between the two ends and a coincident
/// pair produces no force.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spring {
    pub frequency: f32,
    pub damping: f32,
    pub length: f32,
}

impl Spring {
    pub const fn new(frequency: f32, damping: f32, length: f32) -> Self {
        Self { frequency, damping, length }
    }

    /// Stiffness `k = m·ω²`.
    #[inline]
    pub fn stiffness(&self, mass: f32) -> f32 {
        let omega = TAU * self.frequency;
        mass * omega * omega
    }

    /// Damping coefficient `c = 2·ζ·m·ω`.
    #[inline]
    pub fn damping_coefficient(&self, mass: f32) -> f32 {
        2.0 * self.damping * mass * TAU * self.frequency
    }

    /// Force on the end at `offset` from the other end, moving with
    /// `relative_velocity` relative to it.
    pub fn force(&self, offset: Vec2, relative_velocity: Vec2, mass: f32) -> Vec2 {
        let k = self.stiffness(mass);
        let c = self.damping_coefficient(mass);

        if self.length <= 0.0 {
            return -(offset * k) - relative_velocity * c;
        }

        let Some(n) = offset.normalized() else {
            return Vec2::zero();
        };
        let stretch = offset.length() - self.length;
        let closing = relative_velocity.dot(n);
        n * (-(k * stretch) - c * closing)
    }
}
