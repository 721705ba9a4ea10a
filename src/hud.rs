//! HUD projection of the run state
//!
//! The simulation mutates `RunState` every frame; the DOM overlay only needs
//! a handful of fields and doesn't need them at 60 Hz. `HudSync` keeps a
//! separate snapshot and refreshes it on a throttle, except that start,
//! life loss and game over are always reflected in the frame they happen.

use serde::{Deserialize, Serialize};

use crate::consts::HUD_SYNC_INTERVAL;
use crate::display_speed;
use crate::sim::{GameEvent, RunState};

/// When the HUD snapshot refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HudSyncPolicy {
    /// Refresh every frame
    EveryFrame,
    /// Refresh when the score hits a multiple of `every`, or on a key event
    Throttled { every: u64 },
}

impl Default for HudSyncPolicy {
    fn default() -> Self {
        HudSyncPolicy::Throttled {
            every: HUD_SYNC_INTERVAL,
        }
    }
}

/// Read-only view of the fields the overlay shows
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    pub speed: f32,
    pub lives: u8,
    pub is_game_over: bool,
    pub game_started: bool,
}

impl HudSnapshot {
    pub fn from_run(run: &RunState) -> Self {
        Self {
            score: run.score,
            speed: run.speed,
            lives: run.lives,
            is_game_over: run.is_game_over(),
            game_started: run.game_started(),
        }
    }

    /// Velocity readout in km/h
    pub fn display_speed(&self) -> u32 {
        display_speed(self.speed)
    }
}

/// Owner of the HUD snapshot
#[derive(Debug, Clone)]
pub struct HudSync {
    pub policy: HudSyncPolicy,
    snapshot: HudSnapshot,
}

impl HudSync {
    pub fn new(policy: HudSyncPolicy) -> Self {
        Self {
            policy,
            snapshot: HudSnapshot::from_run(&RunState::default()),
        }
    }

    pub fn snapshot(&self) -> &HudSnapshot {
        &self.snapshot
    }

    /// Refresh from this frame's run state and events
    ///
    /// Returns true if the snapshot changed and the overlay should repaint.
    pub fn observe(&mut self, run: &RunState, events: &[GameEvent]) -> bool {
        let urgent = events.iter().any(|e| {
            matches!(
                e,
                GameEvent::Started | GameEvent::Collision { .. } | GameEvent::GameOver { .. }
            )
        });

        let due = match self.policy {
            HudSyncPolicy::EveryFrame => true,
            HudSyncPolicy::Throttled { every } => every <= 1 || run.score % every == 0,
        };

        if !(urgent || due) {
            return false;
        }

        let next = HudSnapshot::from_run(run);
        if next == self.snapshot {
            return false;
        }
        self.snapshot = next;
        true
    }
}

impl Default for HudSync {
    fn default() -> Self {
        Self::new(HudSyncPolicy::default())
    }
}
