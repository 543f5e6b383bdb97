/// Fixed-timestep accumulator.
///
/// Converts variable frame deltas into a whole number of integrator steps.
/// Leftover time carries over to the next tick; time beyond
/// `max_steps` per tick is dropped so a stalled frame cannot trigger a
/// long catch-up burst.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_steps: u32) -> Self {
        debug_assert!(step > 0.0);
        Self {
            step: step.max(1e-5),
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Adds `dt` seconds and returns how many steps to run now.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let available = (self.accumulator / self.step).floor();
        if available >= self.max_steps as f32 {
            log::debug!(
                "physics fell behind by {:.1} steps; dropping backlog",
                available - self.max_steps as f32
            );
            self.accumulator = 0.0;
            return self.max_steps;
        }

        let steps = available as u32;
        self.accumulator -= steps as f32 * self.step;
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_remainder_between_ticks() {
        let mut s = FixedStep::new(0.01, 100);
        assert_eq!(s.advance(0.025), 2);
        // 0.005 left over; another 0.006 completes one more step.
        assert_eq!(s.advance(0.006), 1);
    }

    #[test]
    fn caps_steps_and_drops_backlog() {
        let mut s = FixedStep::new(0.01, 4);
        assert_eq!(s.advance(1.0), 4);
        assert_eq!(s.advance(0.0), 0);
    }

    #[test]
    fn ignores_negative_and_nan_deltas() {
        let mut s = FixedStep::new(0.01, 4);
        assert_eq!(s.advance(-1.0), 0);
        assert_eq!(s.advance(f32::NAN), 0);
    }
}
