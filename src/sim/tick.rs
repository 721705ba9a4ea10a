//! Per-frame simulation tick
//!
//! Core game loop: one call advances the run by exactly one display frame.
//! Stages run in a fixed order and each feeds the next.

use super::input::InputState;
use super::spawn::Spawner;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &InputState, spawner: &mut impl Spawner) {
    // Title screen and game over are frozen
    if state.run.phase != GamePhase::Running {
        return;
    }

    // Difficulty ramp and scoring
    let run = &mut state.run;
    run.speed = (run.speed + SPEED_INCREMENT).min(MAX_SPEED);
    run.score += SCORE_PER_FRAME;
    run.distance += run.speed / 1000.0;

    // Edge-triggered: only fires on the frame that crosses the interval
    if run.score - run.last_milestone_score > MILESTONE_INTERVAL {
        run.last_milestone_score = run.score;
        log::info!("Milestone reached at {}", run.score);
        state.events.push(GameEvent::Milestone { score: run.score });
    }

    steer_player(state, input);

    // Lane marker animation
    state.road_offset = (state.road_offset + state.run.speed) % DASH_PERIOD;

    spawner.maybe_spawn(&mut state.traffic, &state.road);
    advance_traffic(state);
}

/// Lateral movement clamped to the road
fn steer_player(state: &mut GameState, input: &InputState) {
    let direction = input.steer();
    if direction == 0.0 {
        return;
    }
    let (min_x, max_x) = state.road.player_x_range(state.player.size.x);
    let x = state.player.pos.x + direction * PLAYER_MOVE_SPEED;
    state.player.pos.x = x.clamp(min_x, max_x);
}

/// Move traffic relative to the player, resolve hits, cull what scrolled away
fn advance_traffic(state: &mut GameState) {
    let speed = state.run.speed;
    let player_box = state.player.bounds();
    let run = &mut state.run;
    let events = &mut state.events;

    state.traffic.retain_mut(|car| {
        car.pos.y += speed - car.speed;

        // A collision on an earlier car this frame may already have ended the run
        if run.phase == GamePhase::Running
            && player_box.overlaps_inset(&car.bounds(), COLLISION_INSET)
        {
            run.lives = run.lives.saturating_sub(1);
            log::debug!("Collision, {} lives left", run.lives);
            events.push(GameEvent::Collision {
                lives_left: run.lives,
            });

            if run.lives == 0 {
                run.phase = GamePhase::GameOver;
                log::info!("Game over, final score {}", run.score);
                events.push(GameEvent::GameOver { score: run.score });
            }
            return false;
        }

        car.pos.y < CANVAS_HEIGHT + CULL_MARGIN
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Control;
    use crate::sim::spawn::{LaneSpawner, NoSpawner};
    use crate::sim::state::{Vehicle, VehicleColor};
    use glam::Vec2;
    use proptest::prelude::*;

    fn running() -> GameState {
        let mut state = GameState::new();
        state.reset();
        state.drain_events();
        state
    }

    /// Traffic parked right on top of the player, moving at run speed
    fn car_on_player(state: &GameState) -> Vehicle {
        Vehicle::traffic(state.player.pos, state.run.speed + SPEED_INCREMENT, VehicleColor::Magenta)
    }

    #[test]
    fn test_not_started_is_noop() {
        let mut state = GameState::new();
        tick(&mut state, &InputState::default(), &mut NoSpawner);
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run.speed, INITIAL_SPEED);
        assert_eq!(state.road_offset, 0.0);
    }

    #[test]
    fn test_thousand_frames_scenario() {
        let mut state = running();
        let input = InputState::default();
        for _ in 0..1000 {
            tick(&mut state, &input, &mut NoSpawner);
        }
        assert_eq!(state.run.score, 1000);
        assert!((state.run.speed - 6.0).abs() < 1e-3);
        assert_eq!(state.run.lives, 3);
        assert!(!state.run.is_game_over());
        assert!(state.run.distance > 5.0 && state.run.distance < 6.0);
    }

    #[test]
    fn test_speed_caps_at_max() {
        let mut state = running();
        state.run.speed = MAX_SPEED - SPEED_INCREMENT / 2.0;
        tick(&mut state, &InputState::default(), &mut NoSpawner);
        assert_eq!(state.run.speed, MAX_SPEED);
        tick(&mut state, &InputState::default(), &mut NoSpawner);
        assert_eq!(state.run.speed, MAX_SPEED);
    }

    #[test]
    fn test_milestone_is_edge_triggered() {
        let mut state = running();
        state.run.score = 950;
        let input = InputState::default();

        let mut milestones = 0;
        while state.run.score < 1050 {
            tick(&mut state, &input, &mut NoSpawner);
            milestones += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Milestone { .. }))
                .count();
        }
        assert_eq!(milestones, 1);
        // Strictly greater than the interval
        assert_eq!(state.run.last_milestone_score, 1001);
    }

    #[test]
    fn test_steering_clamps_to_road() {
        let mut state = running();
        let mut input = InputState::default();
        let (min_x, max_x) = state.road.player_x_range(PLAYER_WIDTH);

        input.set(Control::Left, true);
        for _ in 0..100 {
            tick(&mut state, &input, &mut NoSpawner);
        }
        assert_eq!(state.player.pos.x, min_x);

        input.set(Control::Left, false);
        input.set(Control::Right, true);
        for _ in 0..100 {
            tick(&mut state, &input, &mut NoSpawner);
        }
        assert_eq!(state.player.pos.x, max_x);
    }

    #[test]
    fn test_both_controls_held_holds_position() {
        let mut state = running();
        let start_x = state.player.pos.x;
        let mut input = InputState::default();
        input.set(Control::Left, true);
        input.set(Control::Right, true);
        tick(&mut state, &input, &mut NoSpawner);
        assert_eq!(state.player.pos.x, start_x);
    }

    #[test]
    fn test_road_offset_wraps() {
        let mut state = running();
        for _ in 0..500 {
            tick(&mut state, &InputState::default(), &mut NoSpawner);
            assert!(state.road_offset >= 0.0 && state.road_offset < DASH_PERIOD);
        }
    }

    #[test]
    fn test_traffic_moves_relative_to_player() {
        let mut state = running();
        state
            .traffic
            .push(Vehicle::traffic(Vec2::new(210.0, 0.0), 2.0, VehicleColor::Amber));
        tick(&mut state, &InputState::default(), &mut NoSpawner);
        let expected = INITIAL_SPEED + SPEED_INCREMENT - 2.0;
        assert!((state.traffic[0].pos.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_offscreen_traffic_culled() {
        let mut state = running();
        let x = state.road.lane_x(0, NPC_WIDTH);
        state
            .traffic
            .push(Vehicle::traffic(Vec2::new(x, CANVAS_HEIGHT + CULL_MARGIN - 1.0), 2.0, VehicleColor::Amber));
        state
            .traffic
            .push(Vehicle::traffic(Vec2::new(x, 100.0), 2.0, VehicleColor::Violet));
        tick(&mut state, &InputState::default(), &mut NoSpawner);
        assert_eq!(state.traffic.len(), 1);
        assert_eq!(state.traffic[0].color, VehicleColor::Violet);
    }

    #[test]
    fn test_collision_costs_a_life() {
        let mut state = running();
        let car = car_on_player(&state);
        state.traffic.push(car);
        let score_before = state.run.score;

        tick(&mut state, &InputState::default(), &mut NoSpawner);

        assert_eq!(state.run.lives, 2);
        assert!(state.traffic.is_empty());
        // Lives-only policy: no score penalty
        assert_eq!(state.run.score, score_before + SCORE_PER_FRAME);
        assert_eq!(state.drain_events(), vec![GameEvent::Collision { lives_left: 2 }]);
        assert!(state.run.is_running());
    }

    #[test]
    fn test_last_life_ends_run_and_freezes() {
        let mut state = running();
        state.run.lives = 1;
        let car = car_on_player(&state);
        state.traffic.push(car.clone());
        state.traffic.push(car);

        tick(&mut state, &InputState::default(), &mut NoSpawner);

        assert!(state.run.is_game_over());
        assert_eq!(state.run.lives, 0);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::Collision { lives_left: 0 },
                GameEvent::GameOver { score: 1 },
            ]
        );

        let frozen = state.run.clone();
        let offset = state.road_offset;
        let mut input = InputState::default();
        input.set(Control::Left, true);
        let x = state.player.pos.x;
        for _ in 0..10 {
            tick(&mut state, &input, &mut NoSpawner);
        }
        assert_eq!(state.run, frozen);
        assert_eq!(state.road_offset, offset);
        assert_eq!(state.player.pos.x, x);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_reset_from_game_over() {
        let mut state = running();
        let mut spawner = LaneSpawner::new(5);
        spawner.probability = 1.0;
        for _ in 0..50 {
            tick(&mut state, &InputState::default(), &mut spawner);
        }
        state.run.lives = 0;
        state.run.phase = GamePhase::GameOver;
        state.player.pos.x = 210.0;

        state.reset();

        let fresh = GameState::new();
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run.speed, INITIAL_SPEED);
        assert_eq!(state.run.distance, 0.0);
        assert_eq!(state.run.lives, STARTING_LIVES);
        assert_eq!(state.run.last_milestone_score, 0);
        assert_eq!(state.run.phase, GamePhase::Running);
        assert!(state.traffic.is_empty());
        assert_eq!(state.road_offset, 0.0);
        assert_eq!(state.player, fresh.player);
        assert_eq!(state.events, vec![GameEvent::Started]);
    }

    fn arb_input() -> impl Strategy<Value = InputState> {
        (any::<bool>(), any::<bool>()).prop_map(|(left, right)| {
            let mut input = InputState::default();
            input.set(Control::Left, left);
            input.set(Control::Right, right);
            input
        })
    }

    proptest! {
        #[test]
        fn prop_player_stays_on_road(inputs in prop::collection::vec(arb_input(), 1..300)) {
            let mut state = running();
            let (min_x, max_x) = state.road.player_x_range(PLAYER_WIDTH);
            for input in &inputs {
                tick(&mut state, input, &mut NoSpawner);
                prop_assert!(state.player.pos.x >= min_x && state.player.pos.x <= max_x);
            }
        }

        #[test]
        fn prop_traffic_never_exceeds_cap(seed in any::<u64>(), frames in 1usize..2000) {
            let mut state = running();
            let mut spawner = LaneSpawner::new(seed);
            spawner.probability = 0.5;
            // Keep the player alive so the run doesn't freeze early
            state.run.lives = u8::MAX;
            for _ in 0..frames {
                tick(&mut state, &InputState::default(), &mut spawner);
                prop_assert!(state.traffic.len() <= TRAFFIC_CAP);
            }
        }

        #[test]
        fn prop_speed_monotonic_and_capped(start in INITIAL_SPEED..MAX_SPEED, frames in 1usize..3000) {
            let mut state = running();
            state.run.speed = start;
            let mut last = state.run.speed;
            for _ in 0..frames {
                tick(&mut state, &InputState::default(), &mut NoSpawner);
                prop_assert!(state.run.speed >= last);
                prop_assert!(state.run.speed <= MAX_SPEED);
                last = state.run.speed;
            }
        }
    }
}
