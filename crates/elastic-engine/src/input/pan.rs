use std::collections::VecDeque;

use elastic_core::{GesturePhase, GestureSource, Rect, Vec2};

use super::types::{
    InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent, TouchEvent,
    TouchPhase,
};

/// Samples older than this (relative to the newest) do not count towards
/// the release velocity.
const VELOCITY_WINDOW: f64 = 0.1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Contact {
    Mouse,
    Touch(u64),
}

#[derive(Debug, Copy, Clone)]
struct Sample {
    time: f64,
    pos: Vec2,
}

/// Single-contact pan recognizer fed from engine input events.
///
/// A contact (left mouse button or the first touch) that starts inside the
/// optional start region becomes a pan once it has travelled `slop` logical
/// pixels. Phases then follow `Began -> Changed* -> Ended`, or `Cancelled`
/// when the window loses focus or the platform cancels the touch.
#[derive(Debug)]
pub struct PanTracker {
    region: Option<Rect>,
    slop: f32,
    phase: GesturePhase,
    contact: Option<Contact>,
    origin: Vec2,
    location: Vec2,
    samples: VecDeque<Sample>,
    velocity: Vec2,
}

impl PanTracker {
    pub fn new(region: Option<Rect>, slop: f32) -> Self {
        Self {
            region,
            slop: slop.max(0.0),
            phase: GesturePhase::Idle,
            contact: None,
            origin: Vec2::zero(),
            location: Vec2::zero(),
            samples: VecDeque::new(),
            velocity: Vec2::zero(),
        }
    }

    /// Replaces the start region. A contact already down is unaffected.
    pub fn set_region(&mut self, region: Option<Rect>) {
        self.region = region;
    }

    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    pub fn is_tracking(&self) -> bool {
        self.contact.is_some()
    }

    /// Feeds one input event stamped with `time` in seconds.
    pub fn handle(&mut self, ev: &InputEvent, time: f64) {
        match *ev {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                ..
            }) => match state {
                MouseButtonState::Pressed => self.press(Contact::Mouse, Vec2::new(x, y), time),
                MouseButtonState::Released => self.lift(Contact::Mouse, Vec2::new(x, y), time),
            },

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.moved(Contact::Mouse, Vec2::new(x, y), time);
            }

            InputEvent::Touch(TouchEvent { id, phase, x, y }) => {
                let contact = Contact::Touch(id);
                let pos = Vec2::new(x, y);
                match phase {
                    TouchPhase::Started => self.press(contact, pos, time),
                    TouchPhase::Moved => self.moved(contact, pos, time),
                    TouchPhase::Ended => self.lift(contact, pos, time),
                    TouchPhase::Cancelled => {
                        if self.contact == Some(contact) {
                            self.cancel();
                        }
                    }
                }
            }

            InputEvent::Focused(false) => self.cancel(),

            _ => {}
        }
    }

    /// Abandons the current contact.
    pub fn cancel(&mut self) {
        if self.contact.take().is_none() {
            return;
        }
        self.phase = if self.phase.is_active() {
            log::debug!("pan cancelled at {:?}", self.location);
            GesturePhase::Cancelled
        } else {
            GesturePhase::Idle
        };
        self.samples.clear();
        self.velocity = Vec2::zero();
    }

    fn press(&mut self, contact: Contact, pos: Vec2, time: f64) {
        if self.contact.is_some() {
            return;
        }
        if let Some(region) = self.region {
            if !region.contains(pos) {
                return;
            }
        }

        self.contact = Some(contact);
        self.phase = GesturePhase::Idle;
        self.origin = pos;
        self.location = pos;
        self.velocity = Vec2::zero();
        self.samples.clear();
        self.record(pos, time);
    }

    fn moved(&mut self, contact: Contact, pos: Vec2, time: f64) {
        if self.contact != Some(contact) {
            return;
        }

        self.location = pos;
        self.record(pos, time);
        self.velocity = self.estimate_velocity();

        self.phase = match self.phase {
            GesturePhase::Idle if pos.distance(self.origin) >= self.slop => {
                log::debug!("pan began at {:?}", self.origin);
                GesturePhase::Began
            }
            GesturePhase::Began | GesturePhase::Changed => GesturePhase::Changed,
            other => other,
        };
    }

    fn lift(&mut self, contact: Contact, pos: Vec2, time: f64) {
        if self.contact != Some(contact) {
            return;
        }

        self.location = pos;
        self.record(pos, time);
        self.velocity = self.estimate_velocity();
        self.contact = None;

        self.phase = if self.phase.is_active() {
            log::debug!("pan ended, velocity {:?}", self.velocity);
            GesturePhase::Ended
        } else {
            GesturePhase::Idle
        };
    }

    fn record(&mut self, pos: Vec2, time: f64) {
        match self.samples.back_mut() {
            // Events delivered within one frame share a timestamp.
            Some(last) if time <= last.time => last.pos = pos,
            _ => self.samples.push_back(Sample { time, pos }),
        }

        while let Some(front) = self.samples.front() {
            if time - front.time > VELOCITY_WINDOW && self.samples.len() > 2 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn estimate_velocity(&self) -> Vec2 {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return Vec2::zero();
        };
        let span = last.time - first.time;
        if span <= 1e-6 {
            return self.velocity;
        }
        (last.pos - first.pos) * (1.0 / span as f32)
    }
}

impl Default for PanTracker {
    fn default() -> Self {
        Self::new(None, 8.0)
    }
}

impl GestureSource for PanTracker {
    fn phase(&self) -> GesturePhase {
        self.phase
    }

    fn location(&self) -> Vec2 {
        self.location
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    #[test]
    fn becomes_a_pan_after_slop() {
        let mut pan = PanTracker::new(None, 10.0);
        pan.handle(&button(MouseButtonState::Pressed, 0.0, 100.0), 0.0);
        assert_eq!(pan.phase(), GesturePhase::Idle);

        pan.handle(&moved(5.0, 100.0), 0.016);
        assert_eq!(pan.phase(), GesturePhase::Idle);

        pan.handle(&moved(12.0, 100.0), 0.033);
        assert_eq!(pan.phase(), GesturePhase::Began);

        pan.handle(&moved(20.0, 100.0), 0.05);
        assert_eq!(pan.phase(), GesturePhase::Changed);
        assert_eq!(pan.location(), Vec2::new(20.0, 100.0));

        pan.handle(&button(MouseButtonState::Released, 20.0, 100.0), 0.066);
        assert_eq!(pan.phase(), GesturePhase::Ended);
        assert!(!pan.is_tracking());
    }

    #[test]
    fn press_outside_region_is_ignored() {
        let strip = Rect::new(0.0, 0.0, 20.0, 600.0);
        let mut pan = PanTracker::new(Some(strip), 0.0);

        pan.handle(&button(MouseButtonState::Pressed, 100.0, 100.0), 0.0);
        pan.handle(&moved(150.0, 100.0), 0.1);
        assert!(!pan.is_tracking());
        assert_eq!(pan.phase(), GesturePhase::Idle);
    }

    #[test]
    fn release_velocity_uses_recent_samples() {
        let mut pan = PanTracker::new(None, 0.0);
        pan.handle(&button(MouseButtonState::Pressed, 0.0, 0.0), 0.0);

        // Slow start, then a fast flick over the last 100ms.
        for i in 1..=10 {
            pan.handle(&moved(i as f32, 0.0), i as f64 * 0.05);
        }
        for i in 1..=5 {
            pan.handle(&moved(10.0 + 40.0 * i as f32, 0.0), 0.5 + i as f64 * 0.02);
        }
        pan.handle(&button(MouseButtonState::Released, 210.0, 0.0), 0.6);

        let v = pan.velocity();
        assert!(v.x > 1500.0 && v.x < 2100.0, "{v:?}");
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn same_timestamp_events_are_coalesced() {
        let mut pan = PanTracker::new(None, 0.0);
        pan.handle(&button(MouseButtonState::Pressed, 0.0, 0.0), 0.0);
        pan.handle(&moved(10.0, 0.0), 0.1);
        pan.handle(&moved(30.0, 0.0), 0.1);
        assert_eq!(pan.samples.len(), 2);
        assert!((pan.velocity().x - 300.0).abs() < 1e-2);
    }

    #[test]
    fn focus_loss_cancels_an_active_pan() {
        let mut pan = PanTracker::new(None, 0.0);
        pan.handle(&button(MouseButtonState::Pressed, 0.0, 0.0), 0.0);
        pan.handle(&moved(30.0, 0.0), 0.1);
        assert!(pan.phase().is_active());

        pan.handle(&InputEvent::Focused(false), 0.2);
        assert_eq!(pan.phase(), GesturePhase::Cancelled);
        assert_eq!(pan.velocity(), Vec2::zero());
    }

    #[test]
    fn second_touch_does_not_steal_the_pan() {
        let touch = |id, phase, x| {
            InputEvent::Touch(TouchEvent {
                id,
                phase,
                x,
                y: 50.0,
            })
        };
        let mut pan = PanTracker::new(None, 0.0);
        pan.handle(&touch(1, TouchPhase::Started, 0.0), 0.0);
        pan.handle(&touch(2, TouchPhase::Started, 200.0), 0.01);
        pan.handle(&touch(1, TouchPhase::Moved, 40.0), 0.02);
        pan.handle(&touch(2, TouchPhase::Moved, 250.0), 0.03);
        assert_eq!(pan.location(), Vec2::new(40.0, 50.0));

        pan.handle(&touch(2, TouchPhase::Cancelled, 250.0), 0.04);
        assert!(pan.phase().is_active());

        pan.handle(&touch(1, TouchPhase::Cancelled, 40.0), 0.05);
        assert_eq!(pan.phase(), GesturePhase::Cancelled);
    }
}
