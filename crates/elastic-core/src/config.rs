/// Physics parameters for the two-point elastic simulation.
///
/// All values are plain data so a simulation can be built and stepped in
/// tests without a display loop. Frequencies are in Hz, damping values are
/// damping ratios (1.0 = critical), lengths in logical px, resistances in 1/s.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Mass of each point. Springs are tuned by frequency, so this mostly
    /// affects how gravity and spring forces combine.
    pub mass: f32,

    /// Live-touch spring pulling the drag point to the finger.
    pub touch_frequency: f32,
    pub touch_damping: f32,

    /// Link from the shift point to the drag point.
    pub link_frequency: f32,
    pub link_damping: f32,
    pub link_length: f32,

    pub drag_resistance: f32,
    pub shift_resistance: f32,

    /// Resistance applied to both points once the gesture is released.
    pub release_resistance: f32,

    /// Gravity acceleration during release, px/s².
    pub gravity: f32,

    /// Release velocities slower than this (px/s) fall back to the
    /// touch-to-center direction.
    pub velocity_threshold: f32,

    /// Integrator step, seconds.
    pub fixed_step: f32,

    /// Upper bound of integrator steps per tick. Time beyond this is dropped.
    pub max_steps_per_tick: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            touch_frequency: 10.0,
            touch_damping: 1.0,
            link_frequency: 1.5,
            link_damping: 0.4,
            link_length: 50.0,
            drag_resistance: 30.0,
            shift_resistance: 6.0,
            release_resistance: 0.0,
            gravity: 1000.0,
            velocity_threshold: 100.0,
            fixed_step: 1.0 / 240.0,
            max_steps_per_tick: 60,
        }
    }
}

/// Top-level configuration of an elastic transition controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticConfig {
    pub physics: PhysicsConfig,

    /// Mesh cell edge length in logical px.
    pub cell_size: f32,

    pub fold_alpha: f32,

    /// Overlay alpha reached when the view is fully covered.
    pub max_overlay_alpha: f32,

    /// Shadow opacity is `shadow_base + shadow_range * overlay_progress`.
    pub shadow_base: f32,
    pub shadow_range: f32,

    /// Shadow opacity before the first physics update.
    pub initial_shadow_opacity: f32,

    /// Shadow blur radius in logical px.
    pub shadow_radius: f32,

    /// Consecutive failed frames after which the controller stops accepting
    /// transitions and lets the host use its default one.
    pub max_render_failures: u32,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            cell_size: 10.0,
            fold_alpha: 0.2,
            max_overlay_alpha: 0.08,
            shadow_base: 0.1,
            shadow_range: 0.2,
            initial_shadow_opacity: 0.3,
            shadow_radius: 5.0,
            max_render_failures: 3,
        }
    }
}
