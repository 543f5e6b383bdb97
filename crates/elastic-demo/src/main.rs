//! Interactive elastic page transitions.
//!
//! Drag from the active edge to pop the top page (or push a new one in
//! push mode). Keys: `l`/`r`/`t`/`b` pick the edge, space toggles push
//! mode, escape quits.

mod page;
mod stage;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use elastic_core::view::ElasticView;
use elastic_core::{
    AnimationDuration, AnimationHost, ElasticConfig, ElasticController, ElasticModifier, Edge,
    GestureHandle, GesturePhase, GestureSource, Outcome, Rect, TransitionState, ViewId,
};
use elastic_engine::core::{App, AppControl, FrameCtx};
use elastic_engine::device::GpuInit;
use elastic_engine::input::{Key, PanTracker};
use elastic_engine::logging::{init_logging, LoggingConfig};
use elastic_engine::render::{ElasticMeshRenderer, MeshPass};
use elastic_engine::window::{Runtime, RuntimeConfig};

use page::{page_color, PageCache};
use stage::{Navigation, Stage};

/// Width of the strip along the active edge where a drag may start.
const EDGE_STRIP: f32 = 28.0;
const PAN_SLOP: f32 = 6.0;

struct Demo {
    config: ElasticConfig,
    controller: ElasticController<ElasticMeshRenderer>,
    pan: Rc<RefCell<PanTracker>>,
    stage: Stage,
    pages: PageCache,

    /// Undeformed view of whatever lies behind the transition.
    backdrop: Option<ElasticView<ElasticMeshRenderer>>,
    backdrop_page: Option<usize>,

    edge: Edge,
    appearing: bool,
    nav: Option<Navigation>,
    presented: Rc<Cell<bool>>,
    cleaning: bool,
    /// The current pan already started a navigation.
    pan_used: bool,
}

impl Demo {
    fn new() -> Self {
        let config = ElasticConfig::default();
        Self {
            controller: ElasticController::new(config.clone(), ElasticMeshRenderer::new()),
            config,
            pan: Rc::new(RefCell::new(PanTracker::new(None, PAN_SLOP))),
            stage: Stage::new(Rect::default()),
            pages: PageCache::default(),
            backdrop: None,
            backdrop_page: None,
            edge: Edge::Left,
            appearing: false,
            nav: None,
            presented: Rc::new(Cell::new(false)),
            cleaning: false,
            pan_used: false,
        }
    }

    fn layout(&mut self, bounds: Rect) {
        if self.backdrop.is_some() && bounds == self.stage.container_bounds() {
            return;
        }
        log::debug!("layout {bounds:?}");

        self.stage.set_bounds(bounds);
        self.pages
            .resize(bounds.width().max(1.0) as u32, bounds.height().max(1.0) as u32);
        self.pan
            .borrow_mut()
            .set_region(Some(self.stage.edge_strip(self.edge, EDGE_STRIP)));

        match self.backdrop.as_mut() {
            Some(view) => view.set_frame(bounds),
            None => {
                let mut view = ElasticView::new(ElasticMeshRenderer::new(), bounds, &self.config);
                view.set_shadow_opacity(0.0);
                self.backdrop = Some(view);
            }
        }
        self.backdrop_page = None;
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        let frame = ctx.input_frame;
        if frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if self.nav.is_some() {
            return AppControl::Continue;
        }

        let edge = [
            (Key::Char('l'), Edge::Left),
            (Key::Char('r'), Edge::Right),
            (Key::Char('t'), Edge::Top),
            (Key::Char('b'), Edge::Bottom),
        ]
        .into_iter()
        .find_map(|(key, edge)| frame.key_pressed(key).then_some(edge));

        if let Some(edge) = edge {
            log::info!("edge: {edge:?}");
            self.edge = edge;
            self.pan
                .borrow_mut()
                .set_region(Some(self.stage.edge_strip(edge, EDGE_STRIP)));
        }
        if frame.key_pressed(Key::Space) {
            self.appearing = !self.appearing;
            log::info!("mode: {}", if self.appearing { "push" } else { "pop" });
        }
        AppControl::Continue
    }

    /// Starts a transition when a pan has just begun on the active edge.
    fn try_begin(&mut self) {
        let phase = self.pan.borrow().phase();
        if !phase.is_active() {
            self.pan_used = false;
        }
        if self.nav.is_some() || self.pan_used || phase != GesturePhase::Began {
            return;
        }
        self.pan_used = true;
        let Some(nav) = self.stage.navigation(self.appearing) else {
            log::debug!("nothing to pop");
            return;
        };

        let handle: GestureHandle = self.pan.clone();
        self.controller.detach(nav.moving);
        self.controller
            .attach(nav.moving, ElasticModifier::new(self.edge, handle));

        if !self.controller.can_animate(nav.moving, self.appearing) {
            // Degraded: navigate without the effect.
            self.stage.jump(nav);
            return;
        }

        let (from, to) = if self.appearing {
            (Vec::new(), vec![nav.moving])
        } else {
            (vec![nav.moving], Vec::new())
        };
        let pages = &mut self.pages;
        let mut capture = |view: ViewId| Some(pages.get(view.0 as usize));

        match self
            .controller
            .animate(&mut self.stage, &mut capture, &from, &to)
        {
            AnimationDuration::Indeterminate => {
                self.nav = Some(nav);
                self.presented.set(false);
                self.cleaning = false;
            }
            AnimationDuration::Immediate => {
                self.controller.clean(&mut self.stage);
                self.controller.detach(nav.moving);
                self.stage.jump(nav);
            }
        }
    }

    fn step(&mut self, dt: f32) {
        let Some(nav) = self.nav else { return };

        let report = self.controller.tick(&mut self.stage, dt);
        if let Some(outcome) = report.outcome {
            log::debug!("transition decided: {outcome:?}");
            let flag = self.presented.clone();
            self.controller.on_next_frame(move || flag.set(true));
            self.cleaning = true;
            if outcome == Outcome::Commit {
                log::info!("top page -> {}", nav.destination);
            }
        }

        if self.cleaning && self.presented.get() {
            self.controller.clean(&mut self.stage);
            self.controller.detach(nav.moving);
            self.stage.settle(nav);
            self.nav = None;
            self.cleaning = false;
        }
    }

    fn sync_backdrop(&mut self) {
        let page = self.nav.map_or(self.stage.top(), |nav| nav.under);
        if self.backdrop_page == Some(page) {
            return;
        }
        if let Some(view) = self.backdrop.as_mut() {
            view.set_snapshot(self.pages.get(page));
            self.backdrop_page = Some(page);
        }
    }
}

impl App for Demo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.layout(ctx.window.bounds());

        if self.handle_keys(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        {
            let mut pan = self.pan.borrow_mut();
            for ev in &ctx.input_frame.events {
                pan.handle(ev, ctx.time.elapsed);
            }
        }

        self.try_begin();
        self.step(ctx.time.dt);
        self.sync_backdrop();

        let [r, g, b] = page_color(self.backdrop_page.unwrap_or(0));
        let clear = wgpu::Color {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
            a: 1.0,
        };

        let backdrop = &mut self.backdrop;
        let controller = &mut self.controller;
        let transitioning = controller.state() != TransitionState::Idle;

        ctx.render(clear, |rctx, target| {
            let mut pass = MeshPass::new(rctx, target);
            if let Some(view) = backdrop.as_mut() {
                if let Err(e) = view.draw(&mut pass) {
                    log::warn!("backdrop skipped: {e}");
                }
            }
            if transitioning {
                // Failures are counted and logged by the controller.
                let _ = controller.draw(&mut pass);
            }
        })
    }
}

fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "elastic".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), Demo::new())
}
