//! Neon Velocity - A lane-dodging arcade racer
//!
//! Core modules:
//! - `sim`: Simulation (traffic, collisions, scoring, run state)
//! - `hud`: Throttled projection of run state for the DOM overlay
//! - `commentary`: Fire-and-forget pit boss radio chatter
//! - `renderer`: Canvas 2D scene building and painting
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Player preferences

pub mod commentary;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use hud::{HudSnapshot, HudSync, HudSyncPolicy};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Road geometry (centered on the canvas)
    pub const ROAD_WIDTH: f32 = 400.0;
    pub const LANE_COUNT: u32 = 3;
    /// Gap kept between the player and the road edges
    pub const ROAD_MARGIN: f32 = 5.0;

    /// Vehicle dimensions
    pub const PLAYER_WIDTH: f32 = 45.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    /// Distance between the player's rear bumper and the bottom edge
    pub const PLAYER_BOTTOM_GAP: f32 = 40.0;
    pub const NPC_WIDTH: f32 = 45.0;
    pub const NPC_HEIGHT: f32 = 80.0;

    /// Lateral steering speed (pixels/frame)
    pub const PLAYER_MOVE_SPEED: f32 = 8.0;

    /// Scroll speed (pixels/frame)
    pub const INITIAL_SPEED: f32 = 5.0;
    pub const MAX_SPEED: f32 = 15.0;
    pub const SPEED_INCREMENT: f32 = 0.001;

    /// Points awarded per simulated frame
    pub const SCORE_PER_FRAME: u64 = 1;
    /// Score distance between milestone announcements
    pub const MILESTONE_INTERVAL: u64 = 1000;
    pub const STARTING_LIVES: u8 = 3;

    /// Traffic spawning
    pub const TRAFFIC_CAP: usize = 6;
    pub const SPAWN_PROBABILITY: f64 = 0.025;
    /// Spawned vehicles start this far above the top edge (plus their height)
    pub const SPAWN_HEADROOM: f32 = 50.0;
    /// Vertical proximity (in vehicle heights) that blocks a same-lane spawn
    pub const SPAWN_SPACING_FACTOR: f32 = 2.5;
    /// Horizontal tolerance for "same lane" at spawn time
    pub const SPAWN_LANE_TOLERANCE: f32 = 5.0;
    pub const NPC_MIN_SPEED: f32 = 2.0;
    pub const NPC_MAX_SPEED: f32 = 5.0;

    /// Traffic is culled once this far below the bottom edge
    pub const CULL_MARGIN: f32 = 100.0;
    /// Inward shrink applied to collision boxes
    pub const COLLISION_INSET: f32 = 5.0;

    /// Lane marker dash pattern
    pub const DASH_LENGTH: f32 = 30.0;
    pub const DASH_GAP: f32 = 50.0;
    pub const DASH_PERIOD: f32 = DASH_LENGTH + DASH_GAP;

    /// HUD score/speed sync cadence (score increments)
    pub const HUD_SYNC_INTERVAL: u64 = 10;

    /// How long a pit boss message stays on screen
    pub const MESSAGE_VISIBLE_MS: f64 = 5000.0;
    /// Text-generation request timeout
    pub const COMMENTARY_TIMEOUT_MS: i32 = 8000;
}

/// Left edge of the road in canvas pixels
#[inline]
pub fn road_start() -> f32 {
    (consts::CANVAS_WIDTH - consts::ROAD_WIDTH) / 2.0
}

/// Right edge of the road in canvas pixels
#[inline]
pub fn road_end() -> f32 {
    road_start() + consts::ROAD_WIDTH
}

/// Speed as shown on the HUD (km/h)
#[inline]
pub fn display_speed(speed: f32) -> u32 {
    (speed * 10.0).round() as u32
}
