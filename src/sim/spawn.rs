//! Traffic spawning
//!
//! Each frame is an independent Bernoulli trial, so arrivals feel organic
//! rather than periodic. A candidate that would stack on top of a recent
//! spawn in the same lane is dropped, and the next frame rolls again.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{RoadGeometry, Vehicle, VehicleColor};
use crate::consts::*;

/// Source of new traffic, invoked once per tick
pub trait Spawner {
    fn maybe_spawn(&mut self, traffic: &mut Vec<Vehicle>, road: &RoadGeometry);
}

/// Never spawns anything (scripted scenarios and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpawner;

impl Spawner for NoSpawner {
    fn maybe_spawn(&mut self, _traffic: &mut Vec<Vehicle>, _road: &RoadGeometry) {}
}

/// Random lane traffic with a population cap and a same-lane spacing guard
#[derive(Debug, Clone)]
pub struct LaneSpawner {
    rng: Pcg32,
    /// Chance of a spawn attempt per frame
    pub probability: f64,
    /// Maximum simultaneous traffic vehicles
    pub cap: usize,
}

impl LaneSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            probability: SPAWN_PROBABILITY,
            cap: TRAFFIC_CAP,
        }
    }

    /// Roll a candidate vehicle in a random lane above the top edge
    fn candidate(&mut self, road: &RoadGeometry) -> Vehicle {
        let lane = self.rng.random_range(0..road.lanes);
        let pos = Vec2::new(road.lane_x(lane, NPC_WIDTH), -NPC_HEIGHT - SPAWN_HEADROOM);
        let speed = self.rng.random_range(NPC_MIN_SPEED..NPC_MAX_SPEED);
        let color = VehicleColor::TRAFFIC[self.rng.random_range(0..VehicleColor::TRAFFIC.len())];
        Vehicle::traffic(pos, speed, color)
    }
}

impl Spawner for LaneSpawner {
    fn maybe_spawn(&mut self, traffic: &mut Vec<Vehicle>, road: &RoadGeometry) {
        if traffic.len() >= self.cap {
            return;
        }
        if !self.rng.random_bool(self.probability) {
            return;
        }

        let candidate = self.candidate(road);
        if blocks_spawn(traffic, &candidate) {
            return;
        }
        traffic.push(candidate);
    }
}

/// True if an existing vehicle sits too close to `candidate` in its lane
pub fn blocks_spawn(traffic: &[Vehicle], candidate: &Vehicle) -> bool {
    let min_gap = NPC_HEIGHT * SPAWN_SPACING_FACTOR;
    traffic.iter().any(|v| {
        (v.pos.y - candidate.pos.y).abs() < min_gap
            && (v.pos.x - candidate.pos.x).abs() < SPAWN_LANE_TOLERANCE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_y() -> f32 {
        -NPC_HEIGHT - SPAWN_HEADROOM
    }

    #[test]
    fn test_spawns_above_top_edge_in_a_lane() {
        let road = RoadGeometry::default();
        let mut spawner = LaneSpawner::new(7);
        spawner.probability = 1.0;

        let mut traffic = Vec::new();
        spawner.maybe_spawn(&mut traffic, &road);
        assert_eq!(traffic.len(), 1);

        let car = &traffic[0];
        assert_eq!(car.pos.y, spawn_y());
        assert!(car.pos.y + car.size.y < 0.0);
        let lane_xs: Vec<f32> = (0..road.lanes).map(|l| road.lane_x(l, NPC_WIDTH)).collect();
        assert!(lane_xs.contains(&car.pos.x));
        assert!(car.speed >= NPC_MIN_SPEED && car.speed < NPC_MAX_SPEED);
        assert!(VehicleColor::TRAFFIC.contains(&car.color));
    }

    #[test]
    fn test_zero_probability_never_spawns() {
        let road = RoadGeometry::default();
        let mut spawner = LaneSpawner::new(1);
        spawner.probability = 0.0;

        let mut traffic = Vec::new();
        for _ in 0..1000 {
            spawner.maybe_spawn(&mut traffic, &road);
        }
        assert!(traffic.is_empty());
    }

    #[test]
    fn test_respects_cap() {
        let road = RoadGeometry::default();
        let mut spawner = LaneSpawner::new(3);
        spawner.probability = 1.0;

        // Spread existing traffic far apart so the spacing guard never triggers
        let mut traffic: Vec<Vehicle> = (0..TRAFFIC_CAP)
            .map(|i| {
                Vehicle::traffic(
                    Vec2::new(road.lane_x(0, NPC_WIDTH), 300.0 + i as f32 * 1000.0),
                    3.0,
                    VehicleColor::Amber,
                )
            })
            .collect();

        spawner.maybe_spawn(&mut traffic, &road);
        assert_eq!(traffic.len(), TRAFFIC_CAP);
    }

    #[test]
    fn test_overlapping_candidate_rejected() {
        let road = RoadGeometry::default();
        let mut spawner = LaneSpawner::new(11);
        spawner.probability = 1.0;

        // Every lane occupied just below the spawn point
        let mut traffic: Vec<Vehicle> = (0..road.lanes)
            .map(|lane| {
                Vehicle::traffic(
                    Vec2::new(road.lane_x(lane, NPC_WIDTH), spawn_y() + NPC_HEIGHT),
                    3.0,
                    VehicleColor::Violet,
                )
            })
            .collect();

        for _ in 0..100 {
            spawner.maybe_spawn(&mut traffic, &road);
            assert_eq!(traffic.len(), road.lanes as usize);
        }
    }

    #[test]
    fn test_blocks_spawn_rule() {
        let road = RoadGeometry::default();
        let x = road.lane_x(1, NPC_WIDTH);
        let candidate = Vehicle::traffic(Vec2::new(x, spawn_y()), 3.0, VehicleColor::Amber);

        // Same lane, within 2.5 car lengths
        let near = Vehicle::traffic(Vec2::new(x, spawn_y() + 199.0), 3.0, VehicleColor::Amber);
        assert!(blocks_spawn(&[near], &candidate));

        // Same lane, far enough behind
        let far = Vehicle::traffic(Vec2::new(x, spawn_y() + 200.0), 3.0, VehicleColor::Amber);
        assert!(!blocks_spawn(&[far], &candidate));

        // Adjacent lane at the same height
        let beside = Vehicle::traffic(
            Vec2::new(road.lane_x(2, NPC_WIDTH), spawn_y()),
            3.0,
            VehicleColor::Amber,
        );
        assert!(!blocks_spawn(&[beside], &candidate));
    }

    #[test]
    fn test_seeded_spawner_is_repeatable() {
        let road = RoadGeometry::default();
        let mut a = LaneSpawner::new(42);
        let mut b = LaneSpawner::new(42);
        let mut ta = Vec::new();
        let mut tb = Vec::new();
        for _ in 0..500 {
            a.maybe_spawn(&mut ta, &road);
            b.maybe_spawn(&mut tb, &road);
        }
        assert_eq!(ta, tb);
    }
}
