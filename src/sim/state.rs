//! Game state and core simulation types
//!
//! Everything the tick mutates lives here. The presentation layer reads it
//! through `hud::HudSnapshot` and `renderer::scene`, never writes it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::{road_end, road_start};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    NotStarted,
    /// Active driving
    Running,
    /// Out of lives; only a reset leaves this phase
    GameOver,
}

/// Who is driving a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleRole {
    Player,
    Traffic,
}

/// Paint tokens for vehicles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleColor {
    Cyan,
    Magenta,
    Amber,
    Violet,
}

impl VehicleColor {
    /// Palette traffic colors are drawn from
    pub const TRAFFIC: [VehicleColor; 3] =
        [VehicleColor::Magenta, VehicleColor::Amber, VehicleColor::Violet];

    pub fn as_css(&self) -> &'static str {
        match self {
            VehicleColor::Cyan => "#00f2ff",
            VehicleColor::Magenta => "#ff0055",
            VehicleColor::Amber => "#ffcc00",
            VehicleColor::Violet => "#7700ff",
        }
    }
}

/// A vehicle on the road (position is the top-left corner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: VehicleColor,
    /// Own forward speed; traffic closes in at `run speed - speed`
    pub speed: f32,
    pub role: VehicleRole,
}

impl Vehicle {
    /// The player car, centered on the road
    pub fn player() -> Self {
        Self {
            pos: Vec2::new(
                CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                CANVAS_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_GAP,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            color: VehicleColor::Cyan,
            speed: 0.0,
            role: VehicleRole::Player,
        }
    }

    pub fn traffic(pos: Vec2, speed: f32, color: VehicleColor) -> Self {
        Self {
            pos,
            size: Vec2::new(NPC_WIDTH, NPC_HEIGHT),
            color,
            speed,
            role: VehicleRole::Traffic,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Road placement and lane layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadGeometry {
    pub start: f32,
    pub end: f32,
    pub lanes: u32,
}

impl Default for RoadGeometry {
    fn default() -> Self {
        Self {
            start: road_start(),
            end: road_end(),
            lanes: LANE_COUNT,
        }
    }
}

impl RoadGeometry {
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    pub fn lane_width(&self) -> f32 {
        self.width() / self.lanes as f32
    }

    /// x for a vehicle of `width` centered in `lane`
    pub fn lane_x(&self, lane: u32, width: f32) -> f32 {
        let lane_width = self.lane_width();
        self.start + lane as f32 * lane_width + (lane_width - width) / 2.0
    }

    /// Allowed range for the player's x
    pub fn player_x_range(&self, width: f32) -> (f32, f32) {
        (self.start + ROAD_MARGIN, self.end - width - ROAD_MARGIN)
    }
}

/// Discrete happenings recorded by the tick for the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh run began
    Started,
    /// The player hit traffic
    Collision { lives_left: u8 },
    /// Score crossed another milestone
    Milestone { score: u64 },
    /// Last life lost
    GameOver { score: u64 },
}

/// Per-run counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    pub speed: f32,
    pub distance: f32,
    pub lives: u8,
    pub phase: GamePhase,
    /// Score at the last milestone announcement
    pub last_milestone_score: u64,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            score: 0,
            speed: INITIAL_SPEED,
            distance: 0.0,
            lives: STARTING_LIVES,
            phase: GamePhase::NotStarted,
            last_milestone_score: 0,
        }
    }
}

impl RunState {
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn game_started(&self) -> bool {
        self.phase != GamePhase::NotStarted
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub run: RunState,
    pub player: Vehicle,
    /// Traffic in spawn order
    pub traffic: Vec<Vehicle>,
    pub road: RoadGeometry,
    /// Lane marker scroll offset, wraps at `DASH_PERIOD`
    pub road_offset: f32,
    /// Events recorded since the last drain
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Title-screen state; call `reset` to start driving
    pub fn new() -> Self {
        Self {
            run: RunState::default(),
            player: Vehicle::player(),
            traffic: Vec::new(),
            road: RoadGeometry::default(),
            road_offset: 0.0,
            events: Vec::new(),
        }
    }

    /// Start a fresh run from any phase
    pub fn reset(&mut self) {
        self.run = RunState {
            phase: GamePhase::Running,
            ..RunState::default()
        };
        self.player = Vehicle::player();
        self.traffic.clear();
        self.road_offset = 0.0;
        self.events.clear();
        self.events.push(GameEvent::Started);
        log::info!("Run started");
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
