//! Transition plugin: binds a gesture to a view, drives the simulation and
//! reports progress and the final outcome to the host.

use std::collections::HashMap;

use crate::config::ElasticConfig;
use crate::error::RenderError;
use crate::geometry::{Edge, Vec2};
use crate::host::{AnimationHost, ElasticModifier, GestureHandle, SnapshotSource, ViewId};
use crate::physics::{release_direction, Outcome, Simulation, TargetFrame};
use crate::renderer::MeshRenderer;
use crate::view::ElasticView;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TransitionState {
    Idle,
    /// Gesture active; the drag point follows the finger.
    Animating,
    /// Gesture released; gravity carries the view off screen.
    Releasing,
    Committed,
    Cancelled,
}

/// Duration reported back to the host from [`ElasticController::animate`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AnimationDuration {
    /// Nothing to animate.
    Immediate,
    /// The transition ends when the controller calls `finish` or `cancel`.
    Indeterminate,
}

/// What happened during one [`ElasticController::tick`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TickReport {
    pub state: TransitionState,
    /// Progress sent to the host this tick, if any.
    pub progress: Option<f32>,
    /// Set on the tick that decided the transition.
    pub outcome: Option<Outcome>,
}

struct Binding {
    view: ViewId,
    edge: Edge,
    appearing: bool,
    gesture: GestureHandle,
}

struct Active<R: MeshRenderer> {
    simulation: Simulation,
    view: ElasticView<R>,
    targets: TargetFrame,
}

pub struct ElasticController<R: MeshRenderer> {
    config: ElasticConfig,
    modifiers: HashMap<ViewId, Vec<ElasticModifier>>,

    binding: Option<Binding>,
    active: Option<Active<R>>,
    // Parked here between transitions so GPU resources survive.
    renderer: Option<R>,

    state: TransitionState,
    render_failures: u32,
    degraded: bool,
}

impl<R: MeshRenderer> ElasticController<R> {
    pub fn new(config: ElasticConfig, renderer: R) -> Self {
        Self {
            config,
            modifiers: HashMap::new(),
            binding: None,
            active: None,
            renderer: Some(renderer),
            state: TransitionState::Idle,
            render_failures: 0,
            degraded: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &ElasticConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// True once repeated render failures disabled the elastic effect.
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The view bound by the last successful `can_animate`.
    pub fn bound_view(&self) -> Option<ViewId> {
        self.binding.as_ref().map(|b| b.view)
    }

    /// Effective edge of the bound transition (already flipped when appearing).
    pub fn edge(&self) -> Option<Edge> {
        self.binding.as_ref().map(|b| b.edge)
    }

    pub fn view(&self) -> Option<&ElasticView<R>> {
        self.active.as_ref().map(|a| &a.view)
    }

    pub fn view_mut(&mut self) -> Option<&mut ElasticView<R>> {
        self.active.as_mut().map(|a| &mut a.view)
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.active.as_ref().map(|a| &a.simulation)
    }

    /// The idle renderer, when no transition holds it.
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    // ── modifiers ─────────────────────────────────────────────────────────

    /// Attaches an edge gesture to `view`. A second attachment for the same
    /// edge replaces the first.
    pub fn attach(&mut self, view: ViewId, modifier: ElasticModifier) {
        let list = self.modifiers.entry(view).or_default();
        match list.iter_mut().find(|m| m.edge == modifier.edge) {
            Some(existing) => *existing = modifier,
            None => list.push(modifier),
        }
    }

    /// Removes every modifier of `view`.
    pub fn detach(&mut self, view: ViewId) -> Vec<ElasticModifier> {
        self.modifiers.remove(&view).unwrap_or_default()
    }

    pub fn modifiers(&self, view: ViewId) -> &[ElasticModifier] {
        self.modifiers.get(&view).map(Vec::as_slice).unwrap_or(&[])
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Claims `view` if one of its gestures is in progress.
    ///
    /// Only one view can be animated at a time; the claim holds until
    /// [`ElasticController::clean`].
    pub fn can_animate(&mut self, view: ViewId, appearing: bool) -> bool {
        if let Some(bound) = self.binding.as_ref() {
            log::debug!("can_animate({view:?}): already bound to {:?}", bound.view);
            return false;
        }
        if self.degraded {
            log::debug!("can_animate({view:?}): degraded, deferring to host transition");
            return false;
        }

        let Some(modifier) = self
            .modifiers(view)
            .iter()
            .find(|m| m.gesture.phase().is_active())
            .cloned()
        else {
            log::debug!("can_animate({view:?}): no active edge gesture");
            return false;
        };

        let edge = if appearing {
            modifier.edge.opposite()
        } else {
            modifier.edge
        };
        log::debug!("elastic transition claimed {view:?} from {edge:?} (appearing: {appearing})");

        self.binding = Some(Binding {
            view,
            edge,
            appearing,
            gesture: modifier.gesture,
        });
        self.set_state(TransitionState::Animating);
        true
    }

    /// Sets up the deforming view and the simulation for the claimed transition.
    pub fn animate<H, S>(
        &mut self,
        host: &mut H,
        snapshots: &mut S,
        from: &[ViewId],
        to: &[ViewId],
    ) -> AnimationDuration
    where
        H: AnimationHost + ?Sized,
        S: SnapshotSource + ?Sized,
    {
        let Some(binding) = self.binding.as_ref() else {
            log::debug!("animate called without a claimed view");
            return AnimationDuration::Immediate;
        };
        if self.active.is_some() {
            log::warn!("animate called while a transition is already running");
            return AnimationDuration::Immediate;
        }
        let Some(&view_id) = from.first().or_else(|| to.first()) else {
            return AnimationDuration::Immediate;
        };

        let bounds = host.container_bounds();
        let frame = host.frame_of(view_id).unwrap_or(bounds);

        host.unhide(view_id);
        let snapshot = snapshots.capture(view_id);
        host.hide(view_id);

        let Some(snapshot) = snapshot else {
            log::warn!("snapshot capture of {view_id:?} failed; skipping elastic transition");
            host.unhide(view_id);
            return AnimationDuration::Immediate;
        };
        let Some(renderer) = self.renderer.take() else {
            log::warn!("elastic renderer unavailable");
            host.unhide(view_id);
            return AnimationDuration::Immediate;
        };

        let targets = TargetFrame::new(bounds, binding.edge, binding.appearing);
        let touch = binding.gesture.location();
        let start = targets.target(touch, false);

        let mut view = ElasticView::new(renderer, frame, &self.config);
        view.set_snapshot(snapshot);
        view.set_edge(binding.edge);
        view.set_shift(start - targets.closed(start));
        view.set_touch_position(touch);

        let simulation = Simulation::new(self.config.physics.clone(), start, touch, bounds);

        self.active = Some(Active { simulation, view, targets });
        if !binding.gesture.phase().is_active() {
            // Lifted before the transition started: release on the first tick.
            log::debug!("gesture already ended at animate");
        }
        AnimationDuration::Indeterminate
    }

    /// Advances the transition by `dt` seconds.
    pub fn tick<H>(&mut self, host: &mut H, dt: f32) -> TickReport
    where
        H: AnimationHost + ?Sized,
    {
        let mut report = TickReport {
            state: self.state,
            progress: None,
            outcome: None,
        };

        let (Some(binding), Some(active)) = (self.binding.as_ref(), self.active.as_mut()) else {
            return report;
        };

        active.view.poll_presented();

        let mut state = self.state;
        match state {
            TransitionState::Animating => {
                let phase = binding.gesture.phase();
                if phase.is_active() {
                    active.simulation.set_anchor(binding.gesture.location());
                } else {
                    let direction = release_direction(
                        binding.edge,
                        binding.gesture.velocity(),
                        binding.gesture.location(),
                        active.targets.bounds,
                        self.config.physics.velocity_threshold,
                    );
                    log::debug!("gesture {phase:?}: releasing towards {direction:?}");
                    active.simulation.release(direction);
                    state = TransitionState::Releasing;
                }
            }
            TransitionState::Releasing => {}
            TransitionState::Idle | TransitionState::Committed | TransitionState::Cancelled => {
                return report;
            }
        }

        let delta = active.simulation.advance(dt);
        if delta.shift_moved {
            match update(active, host, state == TransitionState::Releasing) {
                Update::Progress(p) => report.progress = Some(p),
                Update::Decided(outcome) => {
                    report.outcome = Some(outcome);
                    state = match outcome {
                        Outcome::Commit => TransitionState::Committed,
                        Outcome::Cancel => TransitionState::Cancelled,
                    };
                }
            }
        }

        self.set_state(state);
        report.state = state;
        report
    }

    /// Draws the deforming view, if any.
    ///
    /// Consecutive failures are counted; at `max_render_failures` the
    /// controller stops claiming new transitions.
    pub fn draw(&mut self, target: &mut R::Target<'_>) -> Result<(), RenderError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        match active.view.draw(target) {
            Ok(()) => {
                self.render_failures = 0;
                Ok(())
            }
            Err(err) => {
                self.render_failures += 1;
                log::warn!(
                    "elastic frame skipped ({}/{}): {err}",
                    self.render_failures,
                    self.config.max_render_failures
                );
                if !self.degraded && self.render_failures >= self.config.max_render_failures {
                    log::warn!("elastic renderer keeps failing; falling back to host transitions");
                    self.degraded = true;
                }
                Err(err)
            }
        }
    }

    /// Runs `handler` after the next drawn frame is presented, or right away
    /// if there is no view to draw.
    pub fn on_next_frame(&mut self, handler: impl FnOnce() + 'static) {
        match self.active.as_mut() {
            Some(active) => active.view.on_next_frame(handler),
            None => handler(),
        }
    }

    /// Hit test against the deformed view, in container space.
    pub fn hit_test(&self, point: Vec2) -> Option<Vec2> {
        self.active.as_ref()?.view.hit_test(point)
    }

    /// Tears the transition down and returns to `Idle`. Safe in any state.
    pub fn clean<H>(&mut self, host: &mut H)
    where
        H: AnimationHost + ?Sized,
    {
        if let Some(active) = self.active.take() {
            self.renderer = Some(active.view.into_renderer());
        }
        if let Some(binding) = self.binding.take() {
            host.unhide(binding.view);
        }
        self.set_state(TransitionState::Idle);
    }

    fn set_state(&mut self, state: TransitionState) {
        if self.state != state {
            log::debug!("elastic transition {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

enum Update {
    Progress(f32),
    Decided(Outcome),
}

fn update<R, H>(active: &mut Active<R>, host: &mut H, releasing: bool) -> Update
where
    R: MeshRenderer,
    H: AnimationHost + ?Sized,
{
    let targets = active.targets;
    let bounds = targets.bounds;
    let shift = active.simulation.shift();
    let drag = active.simulation.drag();

    if releasing && !bounds.contains(shift) && !bounds.contains(drag) {
        let outcome = targets.decide(shift);
        log::debug!("elastic transition decided: {outcome:?}");
        match outcome {
            Outcome::Commit => host.finish(),
            Outcome::Cancel => host.cancel(),
        }
        return Update::Decided(outcome);
    }

    let current = bounds.clamp(shift);
    let closed = targets.closed(current);

    active.view.set_touch_position(bounds.clamp(drag));
    active.view.set_shift(current - closed);
    active.view.set_overlay_progress(targets.overlay_progress(current));

    let progress = targets.progress(current);
    host.update_progress(progress);
    Update::Progress(progress)
}
