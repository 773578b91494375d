//! Collision detection and scoring
//!
//! Scrolls every live item, resolves rail mounts/grinds, pickups and obstacle
//! hits against the player, and culls what left the screen. Nothing here
//! touches particles or shake: it only records `GameEvent`s, which the
//! feedback pass turns into juice afterward.

use glam::Vec2;

use super::state::{BallTier, GameEvent, GameState, Item, ItemKind};
use crate::consts::*;

/// Pull pickups toward the player while the magnet is active.
///
/// Pull grows quadratically as the ball closes in, and is never larger than
/// the remaining distance so a ball cannot overshoot the player.
pub fn apply_magnet(state: &mut GameState, dt: f32) {
    if !state.power_ups.magnet.active() {
        return;
    }
    let target = state.player.center();
    let t = &state.tuning;

    for item in &mut state.items {
        let ItemKind::Ball { ref mut base_y, .. } = item.kind else {
            continue;
        };
        let to_player = target - Vec2::new(item.x, item.y);
        let dist = to_player.length();
        if !dist.is_finite() || dist <= t.magnet_min_distance || dist > t.magnet_radius {
            continue;
        }
        let closeness = 1.0 - dist / t.magnet_radius;
        let pull = (t.magnet_pull * closeness * closeness * dt).min(dist);
        let step = to_player / dist * pull;
        item.x += step.x;
        item.y += step.y;
        *base_y += step.y;
    }
}

/// Any obstacle close ahead that the player is not riding over
pub fn obstacle_imminent(state: &GameState) -> bool {
    if state.player.grinding {
        return false;
    }
    let front = state.player.right();
    let back = state.player.left();
    let reach = state.tuning.worry_distance;
    state.items.iter().any(|item| {
        matches!(item.kind, ItemKind::Obstacle { .. })
            && item.x + item.size > back
            && item.x - front < reach
    })
}

/// Player body overlaps an obstacle: horizontal bands overlap and the feet
/// are below its top edge.
pub fn hits_obstacle(state: &GameState, item: &Item) -> bool {
    let ItemKind::Obstacle { height } = item.kind else {
        return false;
    };
    let player = &state.player;
    let overlaps_x = item.x < player.right() && item.x + item.size > player.left();
    overlaps_x && player.y > item.y - height
}

/// Circular pickup test between the player center and a ball
pub fn touches_pickup(state: &GameState, item: &Item) -> bool {
    let dist = state.player.center().distance(Vec2::new(item.x, item.y));
    dist.is_finite() && dist <= state.tuning.pickup_radius
}

fn collect(state: &mut GameState, tier: BallTier, pos: Vec2) {
    let combo = state.bump_combo();
    let points = tier.value() as f64 * combo as f64 * state.power_ups.score_multiplier();
    state.score += points;

    match tier {
        BallTier::Common => {}
        BallTier::Great => state.power_ups.double_score.arm(state.tuning.double_score_ms),
        BallTier::Ultra => state.power_ups.magnet.arm(state.tuning.magnet_ms),
        BallTier::Master => state.power_ups.shield = true,
    }

    state.events.push(GameEvent::Pickup {
        tier,
        pos,
        points,
        combo,
    });
}

fn end_run(state: &mut GameState, pos: Vec2) {
    if state.over {
        return;
    }
    let final_score = state.floored_score();
    state.over = true;
    state.final_score = Some(final_score);
    state.events.push(GameEvent::Crash { pos, final_score });
    log::info!("run over: score {} after {:.0}px", final_score, state.distance);
}

/// Scroll and resolve every item for one frame
pub fn resolve_items(state: &mut GameState, dt: f32) {
    let mut items = std::mem::take(&mut state.items);
    let feet_x = PLAYER_X;
    let mut riding = false;

    items.retain_mut(|item| {
        item.x -= item.speed * dt;

        match item.kind {
            ItemKind::Ball {
                tier,
                base_y,
                ref mut phase,
            } => {
                *phase += state.tuning.bob_speed * dt;
                item.y = base_y + phase.sin() * state.tuning.bob_amplitude;

                if !state.over && touches_pickup(state, item) {
                    collect(state, tier, Vec2::new(item.x, item.y));
                    return false;
                }
            }

            ItemKind::Rail { slope, .. } => {
                if item.rail_spans(feet_x) {
                    let surface = item.rail_surface_at(feet_x).unwrap_or(item.y);
                    let player = &mut state.player;

                    if player.grinding && player.rail_id == Some(item.id) {
                        player.y = surface;
                        player.vy = 0.0;
                        riding = true;

                        if !state.over {
                            let combo = state.combo.count.max(1) as f64;
                            state.score += state.tuning.grind_score as f64
                                * combo
                                * state.power_ups.score_multiplier()
                                * dt as f64;
                            state.events.push(GameEvent::Grind {
                                pos: Vec2::new(feet_x, surface),
                            });
                        }
                    } else if !player.grinding && player.vy >= 0.0 {
                        let offset = player.y - surface;
                        let catches = offset >= -state.tuning.rail_catch_above
                            && offset <= state.tuning.rail_catch_below;
                        if catches {
                            player.y = surface;
                            player.vy = 0.0;
                            player.grinding = true;
                            player.rail_id = Some(item.id);
                            player.rail_slope = slope;
                            riding = true;

                            let combo = state.bump_combo();
                            state.events.push(GameEvent::RailMount {
                                pos: Vec2::new(feet_x, surface),
                                combo,
                            });
                            log::debug!("rail #{} mounted, combo {}", item.id, combo);
                        }
                    }
                }
            }

            ItemKind::Obstacle { .. } => {
                if !state.player.grinding && hits_obstacle(state, item) {
                    let pos = Vec2::new(item.x + item.size / 2.0, item.y);
                    if state.power_ups.shield {
                        state.power_ups.shield = false;
                        state.events.push(GameEvent::ShieldAbsorbed { pos });
                        log::debug!("shield absorbed obstacle #{}", item.id);
                        return false;
                    }
                    end_run(state, pos);
                }
            }
        }

        item.trailing_edge() >= 0.0
    });

    state.items = items;

    if state.player.grinding && !riding {
        state.player.grinding = false;
        state.player.rail_id = None;
        state.player.rail_slope = 0.0;
    }
}
