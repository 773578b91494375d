//! Vertical player kinematics
//!
//! Asymmetric, apex-aware gravity with jump impulse, jump-cut, coyote time
//! and edge-triggered jump buffering. All velocities are in pixels per
//! nominal frame; `dt` is the frame factor, `dt_ms` the same step in ms.

use glam::Vec2;

use super::state::PlayerState;
use crate::tuning::Tuning;

/// What a kinematics step did besides moving the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// A buffered jump fired on touchdown
    pub jumped: bool,
    /// Touched ground or rail this step after being airborne
    pub landed: bool,
}

/// Effective gravity for the current vertical velocity.
///
/// Outside the apex zone this is the rise or fall constant. Inside it the
/// value eases (quadratically) from the apex float constant at vy = 0 up to
/// the edge constant at |vy| = threshold, so the hang time has no seam.
pub fn apex_gravity(vy: f32, tuning: &Tuning) -> f32 {
    let edge = if vy < 0.0 {
        tuning.gravity_rise
    } else {
        tuning.gravity_fall
    };
    let speed = vy.abs();
    if tuning.apex_threshold <= 0.0 || speed >= tuning.apex_threshold {
        return edge;
    }
    let consumed = speed / tuning.apex_threshold;
    let eased = consumed * consumed;
    tuning.gravity_apex + (edge - tuning.gravity_apex) * eased
}

/// Whether a jump pressed right now would fire
pub fn can_jump(player: &PlayerState, ground_y: f32) -> bool {
    player.is_supported(ground_y) || player.coyote.active()
}

/// Apply the jump impulse unconditionally
pub fn launch(player: &mut PlayerState, tuning: &Tuning) {
    player.vy = tuning.jump_velocity;
    player.grinding = false;
    player.rail_id = None;
    player.rail_slope = 0.0;
    player.coyote.clear();
    player.jump_buffer.clear();
    player.buffered_from_air = false;
    player.can_cut = true;
    player.scale = Vec2::new(tuning.jump_stretch.0, tuning.jump_stretch.1);
}

/// Jump input went down. Returns true if the jump fired immediately;
/// otherwise the request is buffered.
pub fn press_jump(player: &mut PlayerState, ground_y: f32, tuning: &Tuning) -> bool {
    if can_jump(player, ground_y) {
        launch(player, tuning);
        return true;
    }
    player.jump_buffer.arm(tuning.jump_buffer_ms);
    player.buffered_from_air = !player.is_supported(ground_y);
    false
}

/// Jump input went up. Cuts the jump short once if still rising.
pub fn release_jump(player: &mut PlayerState, tuning: &Tuning) -> bool {
    if player.can_cut && player.vy < 0.0 {
        player.vy *= tuning.jump_cut;
        player.can_cut = false;
        return true;
    }
    false
}

/// Advance the player one frame
pub fn step_player(
    player: &mut PlayerState,
    ground_y: f32,
    tuning: &Tuning,
    dt: f32,
    dt_ms: f32,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    player.jump_buffer.tick(dt_ms);

    // On a rail the collision pass owns y; gravity only applies in the air
    if !player.grinding {
        let gravity = apex_gravity(player.vy, tuning);
        player.vy = (player.vy + gravity * dt).min(tuning.max_fall_speed);
        player.y += player.vy * dt;

        if player.y >= ground_y {
            player.y = ground_y;
            player.vy = 0.0;
            player.can_cut = false;
        }
    }

    let supported = player.is_supported(ground_y);
    if supported {
        player.coyote.arm(tuning.coyote_ms);
    } else {
        player.coyote.tick(dt_ms);
    }

    if supported && !player.was_grounded {
        outcome.landed = true;
        if !player.grinding {
            player.scale = Vec2::new(tuning.land_squash.0, tuning.land_squash.1);
        }
        if player.jump_buffer.active() && player.buffered_from_air {
            launch(player, tuning);
            outcome.jumped = true;
        }
    }
    player.was_grounded = !outcome.jumped && supported;

    // Squash/stretch relaxes exponentially toward (1, 1)
    let keep = tuning.squash_relax.powf(dt);
    player.scale = Vec2::ONE + (player.scale - Vec2::ONE) * keep;

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f32 = 450.0;
    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn step(player: &mut PlayerState, tuning: &Tuning) -> StepOutcome {
        step_player(player, GROUND, tuning, 1.0, FRAME_MS)
    }

    #[test]
    fn test_apex_gravity_is_continuous() {
        let t = Tuning::default();
        assert_eq!(apex_gravity(0.0, &t), t.gravity_apex);
        assert_eq!(apex_gravity(-t.apex_threshold, &t), t.gravity_rise);
        assert_eq!(apex_gravity(t.apex_threshold, &t), t.gravity_fall);
        let just_inside = apex_gravity(t.apex_threshold - 1e-3, &t);
        assert!((just_inside - t.gravity_fall).abs() < 1e-2);
        // Eased: halfway through the zone is closer to apex than linear
        let half = apex_gravity(t.apex_threshold / 2.0, &t);
        let linear = (t.gravity_apex + t.gravity_fall) / 2.0;
        assert!(half < linear);
    }

    #[test]
    fn test_grounded_jump_fires_immediately() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        assert!(press_jump(&mut player, GROUND, &t));
        assert_eq!(player.vy, t.jump_velocity);
        assert!(player.scale.y > 1.0, "jump should stretch");
        step(&mut player, &t);
        assert!(player.y < GROUND);
    }

    #[test]
    fn test_no_double_jump_in_air() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        press_jump(&mut player, GROUND, &t);
        for _ in 0..10 {
            step(&mut player, &t);
        }
        let vy = player.vy;
        assert!(!press_jump(&mut player, GROUND, &t));
        assert_eq!(player.vy, vy);
        assert!(player.jump_buffer.active());
    }

    #[test]
    fn test_jump_cut_only_once_and_only_rising() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        press_jump(&mut player, GROUND, &t);
        step(&mut player, &t);
        let vy = player.vy;
        assert!(release_jump(&mut player, &t));
        assert!((player.vy - vy * t.jump_cut).abs() < 1e-5);
        let cut = player.vy;
        assert!(!release_jump(&mut player, &t));
        assert_eq!(player.vy, cut);
    }

    #[test]
    fn test_release_while_falling_does_nothing() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        player.y = GROUND - 100.0;
        player.vy = 3.0;
        player.was_grounded = false;
        player.can_cut = true;
        assert!(!release_jump(&mut player, &t));
        assert_eq!(player.vy, 3.0);
    }

    #[test]
    fn test_cut_jump_is_lower() {
        let t = Tuning::default();
        let apex = |cut_after: Option<usize>| {
            let mut player = PlayerState::new(GROUND);
            press_jump(&mut player, GROUND, &t);
            let mut best = GROUND;
            for frame in 0..120 {
                if Some(frame) == cut_after {
                    release_jump(&mut player, &t);
                }
                step(&mut player, &t);
                best = best.min(player.y);
            }
            best
        };
        assert!(apex(Some(3)) > apex(None));
    }

    #[test]
    fn test_fall_speed_is_capped() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        player.y = -10_000.0;
        player.was_grounded = false;
        for _ in 0..500 {
            step(&mut player, &t);
            assert!(player.vy <= t.max_fall_speed);
        }
    }

    #[test]
    fn test_landing_squashes_then_relaxes() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        player.y = GROUND - 5.0;
        player.vy = 8.0;
        player.was_grounded = false;
        let outcome = step(&mut player, &t);
        assert!(outcome.landed);
        assert_eq!(player.y, GROUND);
        assert_eq!(player.vy, 0.0);
        assert!(player.scale.x > 1.0 && player.scale.y < 1.0);
        let mut prev = (player.scale - Vec2::ONE).length();
        for _ in 0..30 {
            step(&mut player, &t);
            let dev = (player.scale - Vec2::ONE).length();
            assert!(dev < prev);
            prev = dev;
        }
    }

    #[test]
    fn test_coyote_window_after_leaving_rail() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        player.y = GROUND - 150.0;
        player.grinding = true;
        step(&mut player, &t);
        // Rail ends under the player
        player.grinding = false;
        step(&mut player, &t);
        assert!(player.coyote.active());
        assert!(press_jump(&mut player, GROUND, &t));
        assert_eq!(player.vy, t.jump_velocity);
    }

    #[test]
    fn test_buffered_jump_fires_on_touchdown() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        player.y = GROUND - 5.0;
        player.vy = 6.0;
        player.was_grounded = false;
        assert!(!press_jump(&mut player, GROUND, &t));
        let outcome = step(&mut player, &t);
        assert!(outcome.landed && outcome.jumped);
        assert_eq!(player.vy, t.jump_velocity);
        assert!(!player.jump_buffer.active());
    }

    #[test]
    fn test_stale_buffer_does_not_fire() {
        let t = Tuning::default();
        let mut player = PlayerState::new(GROUND);
        player.y = GROUND - 400.0;
        player.vy = 0.0;
        player.was_grounded = false;
        assert!(!press_jump(&mut player, GROUND, &t));
        let mut fired = false;
        for _ in 0..120 {
            fired |= step(&mut player, &t).jumped;
        }
        assert!(!fired);
        assert_eq!(player.y, GROUND);
    }
}
