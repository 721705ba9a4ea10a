//! Scene building for the 2D canvas
//!
//! Turns the game state into a flat list of draw commands, back to front.
//! Kept free of browser types so layout can be tested natively.

use crate::consts::*;
use crate::sim::{GameState, Vehicle, VehicleRole};

/// Scene palette
pub mod palette {
    pub const GRASS: &str = "#0a2e0a";
    pub const ROAD: &str = "#1a1a1a";
    pub const NEON: &str = "#00f2ff";
    pub const LANE_MARKER: &str = "#333";
    pub const WINDSHIELD: &str = "rgba(0,0,0,0.4)";
    pub const COCKPIT: &str = "rgba(0,0,0,0.6)";
}

/// Rail thickness either side of the road
const RAIL_WIDTH: f32 = 4.0;
const RAIL_GLOW: f32 = 10.0;
const PLAYER_GLOW: f32 = 15.0;
const LANE_MARKER_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Soft shadow drawn behind a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect {
        rect: Rect,
        color: &'static str,
        glow: Option<Glow>,
    },
    /// Vertical dashed line scrolling with the road
    DashedLine {
        x: f32,
        dash: f32,
        gap: f32,
        /// Dash phase; negative so dashes travel downward
        offset: f32,
        width: f32,
        color: &'static str,
    },
}

fn fill(rect: Rect, color: &'static str) -> DrawCmd {
    DrawCmd::FillRect {
        rect,
        color,
        glow: None,
    }
}

fn glowing(rect: Rect, color: &'static str, blur: f32) -> DrawCmd {
    DrawCmd::FillRect {
        rect,
        color,
        glow: Some(Glow { blur, color }),
    }
}

/// Build the full frame
pub fn build(state: &GameState) -> Vec<DrawCmd> {
    let road = &state.road;
    let mut commands = Vec::with_capacity(8 + state.traffic.len() * 2);

    commands.push(fill(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), palette::GRASS));
    commands.push(fill(
        Rect::new(road.start, 0.0, road.width(), CANVAS_HEIGHT),
        palette::ROAD,
    ));

    for edge in [road.start, road.end] {
        commands.push(glowing(
            Rect::new(edge - RAIL_WIDTH / 2.0, 0.0, RAIL_WIDTH, CANVAS_HEIGHT),
            palette::NEON,
            RAIL_GLOW,
        ));
    }

    for lane in 1..road.lanes {
        commands.push(DrawCmd::DashedLine {
            x: road.start + road.lane_width() * lane as f32,
            dash: DASH_LENGTH,
            gap: DASH_GAP,
            offset: -state.road_offset,
            width: LANE_MARKER_WIDTH,
            color: palette::LANE_MARKER,
        });
    }

    for car in &state.traffic {
        push_vehicle(&mut commands, car);
    }
    push_vehicle(&mut commands, &state.player);

    commands
}

fn push_vehicle(commands: &mut Vec<DrawCmd>, car: &Vehicle) {
    let body = Rect::new(car.pos.x, car.pos.y, car.size.x, car.size.y);
    match car.role {
        VehicleRole::Traffic => {
            commands.push(fill(body, car.color.as_css()));
            commands.push(fill(
                Rect::new(car.pos.x + 5.0, car.pos.y + 10.0, car.size.x - 10.0, 15.0),
                palette::WINDSHIELD,
            ));
        }
        VehicleRole::Player => {
            commands.push(glowing(body, car.color.as_css(), PLAYER_GLOW));
            commands.push(fill(
                Rect::new(car.pos.x + 4.0, car.pos.y + 12.0, car.size.x - 8.0, 20.0),
                palette::COCKPIT,
            ));
        }
    }
}
