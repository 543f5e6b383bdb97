use crate::geometry::{Rect, Vec2};

/// A point mass integrated by [`super::Simulation`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointMass {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

impl PointMass {
    pub fn at_rest(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::zero(),
            mass: mass.max(f32::EPSILON),
        }
    }

    /// One semi-implicit Euler step under `force`.
    ///
    /// Resistance is applied implicitly (`v / (1 + r·h)`) so it stays stable
    /// for any coefficient. Returns `false` and leaves the body at rest in its
    /// previous position if the step produced a non-finite value.
    pub fn integrate(&mut self, force: Vec2, resistance: f32, h: f32) -> bool {
        let accel = force / self.mass;
        let velocity = (self.velocity + accel * h) / (1.0 + resistance.max(0.0) * h);
        let position = self.position + velocity * h;

        if !(velocity.is_finite() && position.is_finite()) {
            self.velocity = Vec2::zero();
            return false;
        }

        self.velocity = velocity;
        self.position = position;
        true
    }

    /// Keeps the body inside `bounds`, cancelling velocity into the wall.
    ///
    /// Collisions are fully inelastic.
    pub fn collide(&mut self, bounds: Rect) {
        let r = bounds.normalized();
        let (min, max) = (r.min(), r.max());

        if self.position.x < min.x {
            self.position.x = min.x;
            self.velocity.x = self.velocity.x.max(0.0);
        } else if self.position.x > max.x {
            self.position.x = max.x;
            self.velocity.x = self.velocity.x.min(0.0);
        }

        if self.position.y < min.y {
            self.position.y = min.y;
            self.velocity.y = self.velocity.y.max(0.0);
        } else if self.position.y > max.y {
            self.position.y = max.y;
            self.velocity.y = self.velocity.y.min(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_force_accelerates() {
        let mut b = PointMass::at_rest(Vec2::zero(), 2.0);
        assert!(b.integrate(Vec2::new(4.0, 0.0), 0.0, 0.5));
        // a = 2, v = 1, x = 0.5
        assert_eq!(b.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(b.position, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn resistance_slows_without_reversing() {
        let mut b = PointMass::at_rest(Vec2::zero(), 1.0);
        b.velocity = Vec2::new(100.0, 0.0);
        for _ in 0..10 {
            b.integrate(Vec2::zero(), 1000.0, 0.1);
        }
        assert!(b.velocity.x > 0.0);
        assert!(b.velocity.x < 1e-3);
    }

    #[test]
    fn non_finite_step_is_rejected() {
        let mut b = PointMass::at_rest(Vec2::new(1.0, 2.0), 1.0);
        b.velocity = Vec2::new(5.0, 5.0);
        assert!(!b.integrate(Vec2::new(f32::NAN, 0.0), 0.0, 0.1));
        assert_eq!(b.position, Vec2::new(1.0, 2.0));
        assert_eq!(b.velocity, Vec2::zero());
    }

    #[test]
    fn collide_clamps_and_stops_inward_velocity() {
        let mut b = PointMass::at_rest(Vec2::new(-5.0, 50.0), 1.0);
        b.velocity = Vec2::new(-30.0, 7.0);
        b.collide(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(b.position, Vec2::new(0.0, 50.0));
        assert_eq!(b.velocity, Vec2::new(0.0, 7.0));
    }
}
