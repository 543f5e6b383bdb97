use std::cell::{Cell, RefCell};
use std::rc::Rc;

use elastic_core::mesh::MeshGeometry;
use elastic_core::renderer::{MeshRenderer, PresentCallback};
use elastic_core::uniform::UniformState;
use elastic_core::{
    AnimationDuration, AnimationHost, ElasticConfig, ElasticController, ElasticModifier, Edge,
    GestureHandle, GesturePhase, GestureSource, Outcome, Rect, RenderError, Snapshot,
    TransitionState, Vec2, ViewId,
};

const DT: f32 = 1.0 / 60.0;
const PAGE: ViewId = ViewId(7);

// ── collaborators ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Frames {
    uniforms: Vec<UniformState>,
    presented: Vec<PresentCallback>,
}

impl MeshRenderer for Frames {
    type Target<'a>
        = ()
    where
        Self: 'a;

    fn resize(&mut self, _mesh: &MeshGeometry, _frame: Rect) {}

    fn upload_uniform(&mut self, uniform: &UniformState) {
        self.uniforms.push(*uniform);
    }

    fn set_texture(&mut self, _snapshot: &Snapshot) {}

    fn release_texture(&mut self) {}

    fn draw(&mut self, _: &mut (), on_presented: Option<PresentCallback>) -> Result<(), RenderError> {
        self.presented.extend(on_presented);
        Ok(())
    }
}

#[derive(Default)]
struct Navigation {
    progress: Vec<f32>,
    hidden: bool,
    finished: u32,
    cancelled: u32,
}

impl AnimationHost for Navigation {
    fn container_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 300.0, 600.0)
    }

    fn frame_of(&self, _view: ViewId) -> Option<Rect> {
        Some(self.container_bounds())
    }

    fn hide(&mut self, _view: ViewId) {
        self.hidden = true;
    }

    fn unhide(&mut self, _view: ViewId) {
        self.hidden = false;
    }

    fn update_progress(&mut self, progress: f32) {
        self.progress.push(progress);
    }

    fn finish(&mut self) {
        self.finished += 1;
    }

    fn cancel(&mut self) {
        self.cancelled += 1;
    }
}

#[derive(Default)]
struct Pan {
    phase: GesturePhase,
    location: Vec2,
    velocity: Vec2,
}

impl GestureSource for Pan {
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

fn setup() -> (ElasticController<Frames>, Rc<RefCell<Pan>>, Navigation) {
    let pan = Rc::new(RefCell::new(Pan {
        phase: GesturePhase::Began,
        location: Vec2::new(0.0, 300.0),
        ..Pan::default()
    }));
    let handle: GestureHandle = pan.clone();

    let mut controller = ElasticController::new(ElasticConfig::default(), Frames::default());
    controller.attach(PAGE, ElasticModifier::new(Edge::Left, handle));

    (controller, pan, Navigation::default())
}

fn drag_to(
    controller: &mut ElasticController<Frames>,
    pan: &RefCell<Pan>,
    host: &mut Navigation,
    x: f32,
) {
    {
        let mut p = pan.borrow_mut();
        p.phase = GesturePhase::Changed;
        p.location = Vec2::new(x, 300.0);
    }
    controller.tick(host, DT);
    controller.draw(&mut ()).expect("draw");
}

// ── scenarios ─────────────────────────────────────────────────────────────

#[test]
fn drag_release_commit_and_clean() {
    let (mut controller, pan, mut host) = setup();
    let mut snapshots = |_: ViewId| Some(Snapshot::solid(300, 600, [240, 240, 240, 255]));

    assert!(controller.can_animate(PAGE, false));
    assert_eq!(
        controller.animate(&mut host, &mut snapshots, &[PAGE], &[]),
        AnimationDuration::Indeterminate
    );
    assert!(host.hidden);

    // Interactive drag from the left edge to the middle of the page.
    for i in 1..=30 {
        drag_to(&mut controller, &pan, &mut host, 5.0 * i as f32);
    }
    for _ in 0..180 {
        drag_to(&mut controller, &pan, &mut host, 150.0);
    }
    assert_eq!(controller.state(), TransitionState::Animating);

    let last = *host.progress.last().expect("progress reported");
    assert!((0.25..0.42).contains(&last), "settled progress {last}");
    assert!(host.progress.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(last > host.progress[0]);

    // The trailing shift point pulls the page edge along the drag axis.
    let frames = &controller.view().expect("view").renderer().uniforms;
    let uniform = frames.last().expect("uniform uploaded");
    assert!(uniform.shift.x > 80.0 && uniform.shift.x < 120.0, "{:?}", uniform.shift);
    assert_eq!(uniform.shift.y, 0.0);
    assert!(uniform.overlay_alpha > 0.0 && uniform.overlay_alpha < 0.08);

    // Fling towards the far edge.
    {
        let mut p = pan.borrow_mut();
        p.phase = GesturePhase::Ended;
        p.velocity = Vec2::new(800.0, 0.0);
    }
    let mut outcome = None;
    for _ in 0..240 {
        let report = controller.tick(&mut host, DT);
        if report.outcome.is_some() {
            assert!(outcome.is_none(), "outcome reported twice");
            outcome = report.outcome;
        }
        controller.draw(&mut ()).expect("draw");
    }
    assert_eq!(outcome, Some(Outcome::Commit));
    assert_eq!(controller.state(), TransitionState::Committed);
    assert_eq!((host.finished, host.cancelled), (1, 0));

    // Clean up once the final frame has reached the screen.
    let ready = Rc::new(Cell::new(false));
    let flag = ready.clone();
    controller.on_next_frame(move || flag.set(true));
    controller.draw(&mut ()).expect("draw");
    assert!(!ready.get());

    let callbacks: Vec<_> = controller
        .view_mut()
        .expect("view")
        .renderer_mut()
        .presented
        .drain(..)
        .collect();
    for cb in callbacks {
        cb();
    }
    controller.tick(&mut host, DT);
    assert!(ready.get());

    controller.clean(&mut host);
    assert_eq!(controller.state(), TransitionState::Idle);
    assert!(controller.view().is_none());
    assert!(!host.hidden);
}

#[test]
fn slow_release_near_start_cancels() {
    let (mut controller, pan, mut host) = setup();
    let mut snapshots = |_: ViewId| Some(Snapshot::solid(300, 600, [0, 0, 0, 255]));
    assert!(controller.can_animate(PAGE, false));
    controller.animate(&mut host, &mut snapshots, &[PAGE], &[]);

    for i in 1..=10 {
        drag_to(&mut controller, &pan, &mut host, 6.0 * i as f32);
    }
    for _ in 0..60 {
        drag_to(&mut controller, &pan, &mut host, 60.0);
    }

    // Lifted almost still, left of center: gravity pulls back to the left.
    {
        let mut p = pan.borrow_mut();
        p.phase = GesturePhase::Ended;
        p.velocity = Vec2::new(20.0, 0.0);
    }
    for _ in 0..240 {
        controller.tick(&mut host, DT);
    }

    assert_eq!(controller.state(), TransitionState::Cancelled);
    assert_eq!((host.finished, host.cancelled), (0, 1));
}

#[test]
fn only_one_view_at_a_time() {
    let (mut controller, pan, _) = setup();
    let other = ViewId(8);
    let handle: GestureHandle = pan.clone();
    controller.attach(other, ElasticModifier::new(Edge::Right, handle));

    assert!(controller.can_animate(PAGE, false));
    assert!(!controller.can_animate(other, true));
    assert_eq!(controller.bound_view(), Some(PAGE));
}
