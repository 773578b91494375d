//! Per-frame simulation step
//!
//! Order within a frame: timers, kinematics, spawning, particle aging,
//! collision and scoring, then feedback and its decay.

use glam::Vec2;

use super::collision;
use super::feedback;
use super::kinematics::{self, StepOutcome};
use super::spawner;
use super::state::{GameEvent, GameState, ItemKind};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump went down since the last tick
    pub jump_press: bool,
    /// Jump went up since the last tick
    pub jump_release: bool,
    /// Idle/demo mode - the autopilot hops obstacles
    pub idle_mode: bool,
}

fn feet(state: &GameState) -> Vec2 {
    Vec2::new(PLAYER_X, state.player.y)
}

/// Handle a jump press right away, outside the frame cadence.
/// Returns true if the player left the ground.
pub fn jump_press(state: &mut GameState) -> bool {
    match start_jump(state) {
        Some(event) => {
            state.events.push(event);
            true
        }
        None => false,
    }
}

/// Press jump and apply its feedback. The returned event is already applied
/// and must not go through `feedback::apply_events` again.
fn start_jump(state: &mut GameState) -> Option<GameEvent> {
    if state.over {
        return None;
    }
    let ground = state.viewport.ground_y();
    if !kinematics::press_jump(&mut state.player, ground, &state.tuning) {
        return None;
    }
    let event = GameEvent::Jumped { pos: feet(state) };
    feedback::apply_events(state, std::slice::from_ref(&event));
    Some(event)
}

/// Handle a jump release right away (jump cut)
pub fn jump_release(state: &mut GameState) -> bool {
    if state.over {
        return false;
    }
    kinematics::release_jump(&mut state.player, &state.tuning)
}

/// Demo mode: jump when the next obstacle is 6-12 frames away
fn autopilot(state: &GameState) -> bool {
    let ground = state.viewport.ground_y();
    if !kinematics::can_jump(&state.player, ground) {
        return false;
    }
    let speed = state.scroll_speed.max(1.0);
    let front = state.player.right();
    state.items.iter().any(|item| {
        if !matches!(item.kind, ItemKind::Obstacle { .. }) {
            return false;
        }
        let gap = item.x - front;
        gap >= speed * 6.0 && gap <= speed * 12.0
    })
}

/// Advance the game state by one frame of `dt_ms` milliseconds.
///
/// `dt_ms` is clamped to three nominal frames; physics constants are scaled by
/// the resulting frame factor.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.over {
        return;
    }
    state.events.clear();

    let dt = crate::frame_factor(dt_ms as f64);
    let dt_ms = dt * NOMINAL_FRAME_MS;
    state.frame += 1;
    state.elapsed_ms += dt_ms as f64;

    let pressed = if input.jump_press || (input.idle_mode && autopilot(state)) {
        start_jump(state)
    } else {
        None
    };
    if input.jump_release {
        jump_release(state);
    }

    // Timers. The combo holds while grinding.
    if !state.player.grinding && state.combo.timer.tick(dt_ms) {
        log::debug!("combo x{} expired", state.combo.count);
        state.combo.reset();
    }
    state.power_ups.double_score.tick(dt_ms);
    state.power_ups.magnet.tick(dt_ms);

    let ground = state.viewport.ground_y();
    let StepOutcome { jumped, landed } =
        kinematics::step_player(&mut state.player, ground, &state.tuning, dt, dt_ms);
    if landed {
        state.events.push(GameEvent::Landed { pos: feet(state) });
    }
    if jumped {
        state.events.push(GameEvent::Jumped { pos: feet(state) });
    }

    state.scroll_speed = spawner::scroll_speed(state.score, &state.tuning);
    spawner::maybe_spawn(state, dt_ms);
    state.distance += state.scroll_speed * dt;

    feedback::update_particles(state, dt);

    if state.power_ups.magnet.active() {
        collision::apply_magnet(state, dt);
    }
    collision::resolve_items(state, dt);
    state.companion_worried = !state.over && collision::obstacle_imminent(state);

    feedback::check_milestones(state);
    let events = std::mem::take(&mut state.events);
    feedback::apply_events(state, &events);
    state.events = events;
    if let Some(event) = pressed {
        state.events.insert(0, event);
    }
    feedback::decay(state, dt);
}
