//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One tick per display frame
//! - Randomness only through the injected `Spawner`
//! - Side effects leave only as recorded `GameEvent`s

pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use input::{Control, InputState};
pub use spawn::{LaneSpawner, NoSpawner, Spawner, blocks_spawn};
pub use state::{
    GameEvent, GamePhase, GameState, RoadGeometry, RunState, Vehicle, VehicleColor, VehicleRole,
};
pub use tick::tick;
