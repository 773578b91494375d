//! Procedural item spawning
//!
//! One item per elapsed spawn interval. The interval shrinks and the scroll
//! speed grows with score; both are clamped.

use rand::Rng;

use super::state::{BallTier, GameState, ItemKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Outcome of the two-stage spawn roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Rail,
    Obstacle,
    Ball(BallTier),
}

/// Time between spawns at the given score
pub fn spawn_interval_ms(score: f64, tuning: &Tuning) -> f32 {
    let shrink = score.max(0.0) as f32 * tuning.spawn_interval_per_point_ms;
    (tuning.spawn_interval_base_ms - shrink).max(tuning.spawn_interval_min_ms)
}

/// World scroll speed at the given score
pub fn scroll_speed(score: f64, tuning: &Tuning) -> f32 {
    let boost = score.max(0.0) as f32 * tuning.scroll_speed_per_point;
    (tuning.scroll_speed_base + boost).min(tuning.scroll_speed_max)
}

/// Map the two uniform rolls onto a spawn kind.
///
/// `first` decides rail vs. ground tier and, at the top of its range,
/// obstacle. `second` only matters for balls.
pub fn roll_kind(first: f32, second: f32, tuning: &Tuning) -> SpawnKind {
    if first < tuning.rail_chance {
        return SpawnKind::Rail;
    }
    if first > tuning.obstacle_threshold {
        return SpawnKind::Obstacle;
    }
    let tier = if second < tuning.master_band {
        BallTier::Master
    } else if second < tuning.ultra_band {
        BallTier::Ultra
    } else if second < tuning.great_band {
        BallTier::Great
    } else {
        BallTier::Common
    };
    SpawnKind::Ball(tier)
}

/// Limit a rail's slope so both ends stay between the minimum clearance and
/// the maximum usable height above ground. Heights are measured upward.
pub fn clamp_rail_slope(left_height: f32, length: f32, slope: f32, tuning: &Tuning) -> f32 {
    if length <= 0.0 || !slope.is_finite() {
        return 0.0;
    }
    let rise = slope * length / RAIL_SLOPE_RUN;
    let right_height =
        (left_height + rise).clamp(tuning.rail_min_clearance, tuning.rail_max_height);
    (right_height - left_height) * RAIL_SLOPE_RUN / length
}

/// Build one item of the given kind at the right edge of the viewport
pub fn spawn_item(state: &mut GameState, kind: SpawnKind) -> u32 {
    let ground_y = state.viewport.ground_y();
    let spawn_x = state.viewport.width;
    let t = &state.tuning;
    let rng = &mut state.rng;

    let (x, y, size, item_kind) = match kind {
        SpawnKind::Rail => {
            let tier = t.rail_tiers[rng.random_range(0..t.rail_tiers.len())];
            let jitter = rng.random_range(-t.rail_jitter..=t.rail_jitter);
            let height = (tier + jitter).clamp(t.rail_min_clearance, t.rail_max_height);
            let length = rng.random_range(t.rail_length_min..=t.rail_length_max);
            let mut slope = 0.0;
            if rng.random::<f32>() < t.rail_slope_chance {
                let magnitude = rng.random_range(0.3..=1.0) * t.rail_slope_max;
                slope = if rng.random_bool(0.5) { magnitude } else { -magnitude };
            }
            let slope = clamp_rail_slope(height, length, slope, t);
            (
                spawn_x,
                ground_y - height,
                RAIL_THICKNESS,
                ItemKind::Rail { length, slope },
            )
        }
        SpawnKind::Obstacle => {
            let height = rng.random_range(t.obstacle_height_min..=t.obstacle_height_max);
            (spawn_x, ground_y, OBSTACLE_WIDTH, ItemKind::Obstacle { height })
        }
        SpawnKind::Ball(tier) => {
            let radius = tier.radius();
            let lift = rng.random_range(t.ball_height_min..=t.ball_height_max);
            let phase = rng.random_range(0.0..=std::f32::consts::TAU);
            let base_y = ground_y - lift;
            (
                spawn_x + radius,
                base_y,
                radius,
                ItemKind::Ball {
                    tier,
                    base_y,
                    phase,
                },
            )
        }
    };

    let id = state.insert_item(x, y, size, item_kind);
    log::debug!("spawned {:?} #{} at y={:.0}", kind, id, y);
    id
}

/// Advance the spawn clock and emit at most one item
pub fn maybe_spawn(state: &mut GameState, dt_ms: f32) -> Option<u32> {
    state.spawn_clock_ms += dt_ms;
    let interval = spawn_interval_ms(state.score, &state.tuning);
    if state.spawn_clock_ms <= interval {
        return None;
    }
    state.spawn_clock_ms = 0.0;
    let first = state.rng.random::<f32>();
    let second = state.rng.random::<f32>();
    let kind = roll_kind(first, second, &state.tuning);
    Some(spawn_item(state, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    #[test]
    fn test_interval_shrinks_to_floor() {
        let t = Tuning::default();
        assert_eq!(spawn_interval_ms(0.0, &t), t.spawn_interval_base_ms);
        assert!(spawn_interval_ms(50.0, &t) < t.spawn_interval_base_ms);
        assert_eq!(spawn_interval_ms(1e9, &t), t.spawn_interval_min_ms);
    }

    #[test]
    fn test_speed_is_capped() {
        let t = Tuning::default();
        assert_eq!(scroll_speed(0.0, &t), t.scroll_speed_base);
        assert_eq!(scroll_speed(1e9, &t), t.scroll_speed_max);
    }

    #[test]
    fn test_roll_bands() {
        let t = Tuning::default();
        assert_eq!(roll_kind(0.1, 0.0, &t), SpawnKind::Rail);
        assert_eq!(roll_kind(0.95, 0.0, &t), SpawnKind::Obstacle);
        assert_eq!(roll_kind(0.6, 0.001, &t), SpawnKind::Ball(BallTier::Master));
        assert_eq!(roll_kind(0.6, 0.02, &t), SpawnKind::Ball(BallTier::Ultra));
        assert_eq!(roll_kind(0.6, 0.1, &t), SpawnKind::Ball(BallTier::Great));
        assert_eq!(roll_kind(0.6, 0.9, &t), SpawnKind::Ball(BallTier::Common));
    }

    #[test]
    fn test_obstacles_are_about_a_fifth_of_ground_spawns() {
        let t = Tuning::default();
        let share = (1.0 - t.obstacle_threshold) / (1.0 - t.rail_chance);
        assert!((0.15..0.22).contains(&share));
    }

    #[test]
    fn test_slope_never_dips_below_clearance() {
        let t = Tuning::default();
        let slope = clamp_rail_slope(60.0, 400.0, -22.0, &t);
        let right = 60.0 + slope * 400.0 / RAIL_SLOPE_RUN;
        assert!(right >= t.rail_min_clearance - 1e-3);
        let slope = clamp_rail_slope(280.0, 400.0, 22.0, &t);
        let right = 280.0 + slope * 400.0 / RAIL_SLOPE_RUN;
        assert!(right <= t.rail_max_height + 1e-3);
    }

    #[test]
    fn test_spawn_clock_respects_interval() {
        let mut state = GameState::new(7, Viewport::default(), Tuning::default());
        let interval = spawn_interval_ms(0.0, &state.tuning);
        let frame = 10.0;
        let frames_needed = (interval / frame) as usize;
        for _ in 0..frames_needed {
            assert!(maybe_spawn(&mut state, frame).is_none());
        }
        assert!(maybe_spawn(&mut state, frame).is_some());
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.spawn_clock_ms, 0.0);
    }

    #[test]
    fn test_inverted_ranges_still_spawn() {
        let tuning = Tuning::from_json(
            r#"{
                "rail_length_min": 500.0, "rail_length_max": 200.0,
                "rail_jitter": -30.0,
                "rail_min_clearance": 280.0, "rail_max_height": 60.0,
                "obstacle_height_min": 60.0, "obstacle_height_max": 20.0,
                "ball_height_min": 200.0, "ball_height_max": 50.0
            }"#,
        )
        .unwrap();
        assert!(tuning.rail_length_min <= tuning.rail_length_max);
        assert!(tuning.rail_jitter >= 0.0);

        let mut state = GameState::new(21, Viewport::default(), tuning);
        let ground = state.viewport.ground_y();
        let mut kinds = vec![SpawnKind::Rail, SpawnKind::Obstacle];
        kinds.extend(BallTier::ALL.iter().map(|&tier| SpawnKind::Ball(tier)));
        for kind in kinds {
            for _ in 0..20 {
                spawn_item(&mut state, kind);
            }
        }
        for item in &state.items {
            assert!(item.x.is_finite() && item.y.is_finite());
            match item.kind {
                ItemKind::Rail { length, slope } => {
                    assert!((200.0..=500.0).contains(&length));
                    assert!(slope.is_finite());
                    assert!(item.y <= ground - 60.0);
                }
                ItemKind::Obstacle { height } => assert!((20.0..=60.0).contains(&height)),
                ItemKind::Ball { base_y, .. } => {
                    assert!(base_y >= ground - 200.0 && base_y <= ground - 50.0)
                }
            }
        }
    }

    #[test]
    fn test_unchecked_tuning_is_normalized_on_new_state() {
        let tuning = Tuning {
            rail_jitter: f32::NAN,
            obstacle_height_min: 80.0,
            obstacle_height_max: 10.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(4, Viewport::default(), tuning);
        spawn_item(&mut state, SpawnKind::Rail);
        spawn_item(&mut state, SpawnKind::Obstacle);
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn test_spawned_items_respect_geometry() {
        let mut state = GameState::new(99, Viewport::default(), Tuning::default());
        let ground = state.viewport.ground_y();
        for kind in [
            SpawnKind::Rail,
            SpawnKind::Obstacle,
            SpawnKind::Ball(BallTier::Common),
        ] {
            for _ in 0..50 {
                spawn_item(&mut state, kind);
            }
        }
        for item in &state.items {
            assert!(item.x >= state.viewport.width);
            match item.kind {
                ItemKind::Rail { length, .. } => {
                    let left = item.rail_surface_at(item.x).unwrap();
                    let right = item.rail_surface_at(item.x + length).unwrap();
                    assert!(left < ground && right < ground);
                }
                ItemKind::Obstacle { height } => {
                    assert_eq!(item.y, ground);
                    assert!(height > 0.0);
                }
                ItemKind::Ball { base_y, .. } => assert!(base_y < ground),
            }
        }
    }
}
