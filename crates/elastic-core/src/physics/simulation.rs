use crate::config::PhysicsConfig;
use crate::geometry::{Axis, Edge, Rect, Vec2};

use super::body::PointMass;
use super::spring::Spring;
use super::stepper::FixedStep;

/// Positions after a call to [`Simulation::advance`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StepDelta {
    /// Integrator steps taken during this tick.
    pub steps: u32,
    pub drag: Vec2,
    pub shift: Vec2,
    pub shift_moved: bool,
}

/// Two coupled point masses behind an elastic transition.
///
/// Interactive phase: the drag point follows the live touch through a stiff
/// zero-length spring; the shift point trails the drag point through a
/// softer link with a rest length. Both are confined to the boundary.
///
/// Release phase ([`Simulation::release`]): the touch spring and boundary are
/// removed, the link collapses to zero length, resistance drops and a
/// constant gravity field carries both points off screen.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: PhysicsConfig,

    drag: PointMass,
    shift: PointMass,

    boundary: Option<Rect>,
    anchor: Option<Vec2>,
    touch_spring: Spring,
    link: Spring,

    drag_resistance: f32,
    shift_resistance: f32,
    gravity: Option<Vec2>,

    stepper: FixedStep,
}

impl Simulation {
    /// Places both points at rest on `start` and attaches the drag point to `touch`.
    pub fn new(config: PhysicsConfig, start: Vec2, touch: Vec2, bounds: Rect) -> Self {
        let drag = PointMass::at_rest(start, config.mass);
        let shift = PointMass::at_rest(start, config.mass);
        let stepper = FixedStep::new(config.fixed_step, config.max_steps_per_tick);

        Self {
            touch_spring: Spring::new(config.touch_frequency, config.touch_damping, 0.0),
            link: Spring::new(config.link_frequency, config.link_damping, config.link_length),
            drag_resistance: config.drag_resistance,
            shift_resistance: config.shift_resistance,
            boundary: Some(bounds),
            anchor: Some(touch),
            gravity: None,
            drag,
            shift,
            stepper,
            config,
        }
    }

    #[inline]
    pub fn drag(&self) -> Vec2 {
        self.drag.position
    }

    #[inline]
    pub fn shift(&self) -> Vec2 {
        self.shift.position
    }

    #[inline]
    pub fn drag_body(&self) -> &PointMass {
        &self.drag
    }

    #[inline]
    pub fn shift_body(&self) -> &PointMass {
        &self.shift
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.gravity.is_some()
    }

    #[inline]
    pub fn boundary(&self) -> Option<Rect> {
        self.boundary
    }

    #[inline]
    pub fn gravity(&self) -> Option<Vec2> {
        self.gravity
    }

    /// Moves the live-touch spring's anchor. Ignored after release.
    pub fn set_anchor(&mut self, touch: Vec2) {
        if self.anchor.is_some() && touch.is_finite() {
            self.anchor = Some(touch);
        }
    }

    /// Switches to the release phase with gravity along `direction`.
    pub fn release(&mut self, direction: Vec2) {
        self.anchor = None;
        self.boundary = None;
        self.link.length = 0.0;
        self.drag_resistance = self.config.release_resistance;
        self.shift_resistance = self.config.release_resistance;

        let dir = direction.normalized().unwrap_or_else(Vec2::zero);
        self.gravity = Some(dir * self.config.gravity);
    }

    /// Runs as many fixed steps as `dt` covers.
    pub fn advance(&mut self, dt: f32) -> StepDelta {
        let before = self.shift.position;
        let steps = self.stepper.advance(dt);
        let h = self.stepper.step();

        for _ in 0..steps {
            self.step(h);
        }

        StepDelta {
            steps,
            drag: self.drag.position,
            shift: self.shift.position,
            shift_moved: self.shift.position != before,
        }
    }

    /// One integrator step of length `h`.
    pub fn step(&mut self, h: f32) {
        let m = self.config.mass;
        let mut drag_force = Vec2::zero();
        let mut shift_force = Vec2::zero();

        if let Some(anchor) = self.anchor {
            drag_force += self.touch_spring.force(
                self.drag.position - anchor,
                self.drag.velocity,
                m,
            );
        }

        let link = self.link.force(
            self.shift.position - self.drag.position,
            self.shift.velocity - self.drag.velocity,
            m,
        );
        shift_force += link;
        drag_force -= link;

        if let Some(g) = self.gravity {
            drag_force += g * self.drag.mass;
            shift_force += g * self.shift.mass;
        }

        let drag_ok = self.drag.integrate(drag_force, self.drag_resistance, h);
        let shift_ok = self.shift.integrate(shift_force, self.shift_resistance, h);
        if !(drag_ok && shift_ok) {
            log::warn!("non-finite physics step rejected (drag ok: {drag_ok}, shift ok: {shift_ok})");
        }

        if let Some(bounds) = self.boundary {
            self.drag.collide(bounds);
            self.shift.collide(bounds);
        }
    }
}

/// Unit gravity direction for a release from `edge`.
///
/// Follows the sign of the release velocity along the edge's axis. Slow
/// releases (below `threshold` px/s) use the direction from the container
/// center to the touch instead. A zero component resolves to the negative
/// direction.
pub fn release_direction(
    edge: Edge,
    velocity: Vec2,
    touch: Vec2,
    bounds: Rect,
    threshold: f32,
) -> Vec2 {
    let v = if velocity.length() < threshold {
        touch - bounds.center()
    } else {
        velocity
    };

    let sign = |c: f32| if c > 0.0 { 1.0 } else { -1.0 };
    match edge.axis() {
        Axis::Horizontal => Vec2::new(sign(v.x), 0.0),
        Axis::Vertical => Vec2::new(0.0, sign(v.y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 300.0, 600.0);

    fn run(sim: &mut Simulation, seconds: f32) {
        let frames = (seconds * 60.0) as usize;
        for _ in 0..frames {
            sim.advance(1.0 / 60.0);
        }
    }

    #[test]
    fn slow_release_uses_touch_relative_to_center() {
        let dir = release_direction(
            Edge::Left,
            Vec2::new(5.0, 0.0),
            Vec2::new(200.0, 300.0),
            BOUNDS,
            100.0,
        );
        assert_eq!(dir, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn fast_release_follows_velocity() {
        let dir = release_direction(
            Edge::Left,
            Vec2::new(-900.0, 40.0),
            Vec2::new(250.0, 300.0),
            BOUNDS,
            100.0,
        );
        assert_eq!(dir, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn vertical_edges_release_vertically() {
        let dir = release_direction(
            Edge::Bottom,
            Vec2::new(500.0, 400.0),
            Vec2::new(10.0, 10.0),
            BOUNDS,
            100.0,
        );
        assert_eq!(dir, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn points_stay_inside_bounds_while_dragging() {
        let start = Vec2::new(0.0, 300.0);
        let mut sim = Simulation::new(PhysicsConfig::default(), start, start, BOUNDS);
        // Pull far outside; the boundary must hold both points.
        sim.set_anchor(Vec2::new(900.0, -400.0));
        for _ in 0..120 {
            let d = sim.advance(1.0 / 60.0);
            assert!(d.drag.x >= 0.0 && d.drag.x <= 300.0);
            assert!(d.drag.y >= 0.0 && d.drag.y <= 600.0);
            assert!(d.shift.x >= 0.0 && d.shift.x <= 300.0);
            assert!(d.shift.is_finite());
        }
    }

    #[test]
    fn shift_point_trails_by_link_length() {
        let start = Vec2::new(0.0, 300.0);
        let mut sim = Simulation::new(PhysicsConfig::default(), start, start, BOUNDS);
        for i in 1..=30 {
            sim.set_anchor(Vec2::new(5.0 * i as f32, 300.0));
            sim.advance(1.0 / 60.0);
        }
        run(&mut sim, 3.0);

        assert!((sim.drag().x - 150.0).abs() < 2.0, "drag at {:?}", sim.drag());
        assert!((sim.shift().x - 100.0).abs() < 5.0, "shift at {:?}", sim.shift());
        assert!((sim.shift().y - 300.0).abs() < 1.0);
    }

    #[test]
    fn release_carries_both_points_out_of_bounds() {
        let start = Vec2::new(0.0, 300.0);
        let mut sim = Simulation::new(PhysicsConfig::default(), start, Vec2::new(150.0, 300.0), BOUNDS);
        run(&mut sim, 1.0);

        sim.release(Vec2::new(1.0, 0.0));
        assert!(sim.is_released());
        assert!(sim.boundary().is_none());

        run(&mut sim, 2.0);
        assert!(!BOUNDS.contains(sim.drag()));
        assert!(!BOUNDS.contains(sim.shift()));
        assert!(sim.shift().x > 300.0);
    }

    #[test]
    fn anchor_updates_are_ignored_after_release() {
        let start = Vec2::new(0.0, 300.0);
        let mut sim = Simulation::new(PhysicsConfig::default(), start, start, BOUNDS);
        sim.release(Vec2::new(-1.0, 0.0));
        sim.set_anchor(Vec2::new(300.0, 300.0));
        run(&mut sim, 0.5);
        assert!(sim.drag().x < 0.0);
    }

    #[test]
    fn advance_reports_whether_the_shift_point_moved() {
        let start = Vec2::new(0.0, 300.0);
        let mut sim = Simulation::new(PhysicsConfig::default(), start, start, BOUNDS);
        // Everything at rest on the anchor: nothing moves.
        let d = sim.advance(1.0 / 60.0);
        assert!(d.steps > 0);
        assert!(!d.shift_moved);

        sim.release(Vec2::new(1.0, 0.0));
        let d = sim.advance(1.0 / 60.0);
        assert!(d.shift_moved);
    }
}
