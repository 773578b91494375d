//! Particles, screen shake, squash pulses and banners
//!
//! Turns the events of a tick into visual juice and decays all of it again.
//! Nothing here affects gameplay.

use glam::Vec2;
use rand::Rng;

use super::state::{BallTier, GameEvent, GameState, Particle, ParticleKind};

/// Announced score thresholds; past the last one, every 5000 points
pub const MILESTONES: [u32; 8] = [50, 100, 250, 500, 1000, 2500, 5000, 10000];
const MILESTONE_STEP: u32 = 5000;

const SPARKLE_WHITE: [f32; 4] = [1.0, 1.0, 0.9, 1.0];
const SHIELD_BLUE: [f32; 4] = [0.45, 0.85, 1.0, 1.0];
const HEART_PINK: [f32; 4] = [1.0, 0.45, 0.7, 1.0];
const COMBO_GOLD: [f32; 4] = [1.0, 0.9, 0.3, 1.0];

/// Highest milestone at or below `score`
pub fn highest_milestone(score: u32) -> Option<u32> {
    let last = MILESTONES[MILESTONES.len() - 1];
    if score >= last {
        return Some(score / MILESTONE_STEP * MILESTONE_STEP);
    }
    MILESTONES.iter().rev().find(|&&m| score >= m).copied()
}

fn push_particle(state: &mut GameState, particle: Particle) {
    if state.particles.len() < state.tuning.max_particles {
        state.particles.push(particle);
    }
}

/// Evenly spaced radial burst with a little jitter
fn burst(
    state: &mut GameState,
    origin: Vec2,
    count: usize,
    kind: ParticleKind,
    color: [f32; 4],
    speed: (f32, f32),
) {
    for i in 0..count {
        let jitter = state.rng.random_range(-0.25..=0.25);
        let angle = std::f32::consts::TAU * i as f32 / count as f32 + jitter;
        let spd = state.rng.random_range(speed.0..=speed.1);
        let mut vel = Vec2::new(angle.cos(), angle.sin()) * spd;
        let size = match kind {
            ParticleKind::Heart => state.rng.random_range(5.0..=7.0),
            _ => state.rng.random_range(2.0..=4.0),
        };
        if kind == ParticleKind::Heart {
            // Hearts drift upward
            vel.y -= 1.0;
        }
        push_particle(
            state,
            Particle {
                pos: origin,
                vel,
                color,
                life: 1.0,
                size,
                kind,
                text: None,
                scale: 1.0,
            },
        );
    }
}

fn show_combo(state: &mut GameState, combo: u32) {
    if combo < 2 {
        return;
    }
    state.combo.text = format!("x{} COMBO!", combo);
    state.combo.alpha = 1.0;
    state.combo.scale = state.tuning.combo_banner_scale;
}

fn kick_shake(state: &mut GameState, amount: f32) {
    state.shake = state.shake.max(amount);
}

/// Apply the juice for each event, in order
pub fn apply_events(state: &mut GameState, events: &[GameEvent]) {
    for event in events {
        match *event {
            GameEvent::Jumped { pos } => {
                for _ in 0..6 {
                    let vx = state.rng.random_range(-3.0..=1.0);
                    let vy = state.rng.random_range(-1.5..=0.0);
                    push_particle(
                        state,
                        Particle {
                            pos,
                            vel: Vec2::new(vx, vy),
                            color: SPARKLE_WHITE,
                            life: 0.6,
                            size: 2.5,
                            kind: ParticleKind::Sparkle,
                            text: None,
                            scale: 1.0,
                        },
                    );
                }
            }

            GameEvent::Landed { .. } => {}

            GameEvent::RailMount { pos, combo } => {
                show_combo(state, combo);
                kick_shake(state, 1.5);
                burst(state, pos, 5, ParticleKind::Sparkle, SPARKLE_WHITE, (1.0, 2.5));
            }

            GameEvent::Grind { pos } => {
                if state.rng.random_bool(0.35) {
                    let vy = state.rng.random_range(-2.0..=-0.5);
                    push_particle(
                        state,
                        Particle {
                            pos,
                            vel: Vec2::new(-state.scroll_speed * 0.5, vy),
                            color: COMBO_GOLD,
                            life: 0.5,
                            size: 2.0,
                            kind: ParticleKind::Sparkle,
                            text: None,
                            scale: 1.0,
                        },
                    );
                }
            }

            GameEvent::Pickup {
                tier, pos, combo, ..
            } => {
                let kind = if tier == BallTier::Master {
                    ParticleKind::Heart
                } else {
                    ParticleKind::Sparkle
                };
                let color = if tier == BallTier::Master {
                    HEART_PINK
                } else {
                    tier.color()
                };
                let top_speed = 3.0 + tier.value() as f32 * 0.5;
                burst(state, pos, tier.burst_count(), kind, color, (1.5, top_speed));

                if combo >= 2 {
                    push_particle(
                        state,
                        Particle {
                            pos,
                            vel: Vec2::new(0.0, -1.2),
                            color: COMBO_GOLD,
                            life: 1.0,
                            size: 10.0,
                            kind: ParticleKind::ComboText,
                            text: Some(format!("x{}", combo)),
                            scale: 1.4,
                        },
                    );
                }
                show_combo(state, combo);

                let (sx, sy) = state.tuning.pickup_squash;
                state.player.scale = Vec2::new(sx, sy);
                kick_shake(state, tier.shake());
            }

            GameEvent::ShieldAbsorbed { pos } => {
                burst(state, pos, 30, ParticleKind::Sparkle, SHIELD_BLUE, (2.0, 7.0));
                kick_shake(state, state.tuning.shield_shake);
            }

            GameEvent::Crash { .. } => {
                kick_shake(state, state.tuning.crash_shake);
            }

            GameEvent::Milestone { threshold } => {
                state.milestone.text = format!("{} POINTS!", threshold);
                state.milestone.alpha = 1.0;
                kick_shake(state, state.tuning.milestone_shake);
                let center = state.player.center();
                burst(state, center, 10, ParticleKind::Heart, HEART_PINK, (1.0, 3.0));
            }
        }
    }
}

/// Announce the next passed milestone, at most once per threshold
pub fn check_milestones(state: &mut GameState) -> Option<u32> {
    let reached = highest_milestone(state.floored_score())?;
    if reached <= state.milestone.watermark {
        return None;
    }
    state.milestone.watermark = reached;
    state.events.push(GameEvent::Milestone { threshold: reached });
    log::debug!("milestone {} reached", reached);
    Some(reached)
}

/// Move, damp and age particles; drop the dead ones
pub fn update_particles(state: &mut GameState, dt: f32) {
    let t = &state.tuning;
    let damping = t.air_resistance.powf(dt);
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        if p.kind == ParticleKind::Sparkle {
            p.vel.y += t.sparkle_gravity * dt;
        }
        p.vel.x *= damping;
        p.life -= t.particle_decay * dt;
        if p.kind == ParticleKind::ComboText {
            p.scale += (1.0 - p.scale) * 0.1 * dt;
        }
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Decay shake and fade banners
pub fn decay(state: &mut GameState, dt: f32) {
    let t = &state.tuning;

    state.shake = crate::decay(state.shake, t.shake_decay, dt);
    if state.shake < t.shake_floor {
        state.shake = 0.0;
    }

    if state.combo.count == 0 {
        state.combo.text.clear();
        state.combo.alpha = 0.0;
    } else {
        state.combo.alpha = (state.combo.alpha - t.banner_fade * dt).max(0.0);
    }
    state.combo.scale += (1.0 - state.combo.scale) * (1.0 - 0.85f32.powf(dt));

    state.milestone.alpha = (state.milestone.alpha - t.banner_fade * dt).max(0.0);
    if state.milestone.alpha == 0.0 {
        state.milestone.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(11, Viewport::default(), Tuning::without_spawning())
    }

    #[test]
    fn test_milestone_lookup() {
        assert_eq!(highest_milestone(0), None);
        assert_eq!(highest_milestone(49), None);
        assert_eq!(highest_milestone(50), Some(50));
        assert_eq!(highest_milestone(999), Some(500));
        assert_eq!(highest_milestone(10_000), Some(10_000));
        assert_eq!(highest_milestone(14_999), Some(10_000));
        assert_eq!(highest_milestone(15_000), Some(15_000));
    }

    #[test]
    fn test_milestone_fires_once() {
        let mut s = state();
        s.score = 120.0;
        assert_eq!(check_milestones(&mut s), Some(100));
        assert_eq!(check_milestones(&mut s), None);
        s.score = 260.0;
        assert_eq!(check_milestones(&mut s), Some(250));
        assert_eq!(s.milestone.watermark, 250);
    }

    #[test]
    fn test_pickup_burst_matches_tier() {
        for tier in BallTier::ALL {
            let mut s = state();
            let event = GameEvent::Pickup {
                tier,
                pos: Vec2::new(100.0, 100.0),
                points: 1.0,
                combo: 1,
            };
            apply_events(&mut s, &[event]);
            assert_eq!(s.particles.len(), tier.burst_count());
            let hearts = s.particles.iter().all(|p| p.kind == ParticleKind::Heart);
            assert_eq!(hearts, tier == BallTier::Master);
            assert_eq!(s.shake, tier.shake());
        }
    }

    #[test]
    fn test_combo_banner_text() {
        let mut s = state();
        s.combo.count = 2;
        apply_events(
            &mut s,
            &[GameEvent::Pickup {
                tier: BallTier::Great,
                pos: Vec2::ZERO,
                points: 8.0,
                combo: 2,
            }],
        );
        assert_eq!(s.combo.text, "x2 COMBO!");
        assert_eq!(s.combo.alpha, 1.0);
        let texts = s
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::ComboText)
            .count();
        assert_eq!(texts, 1);
    }

    #[test]
    fn test_particles_expire() {
        let mut s = state();
        burst(&mut s, Vec2::ZERO, 10, ParticleKind::Sparkle, SPARKLE_WHITE, (1.0, 2.0));
        let frames = (1.0 / s.tuning.particle_decay).ceil() as usize;
        for _ in 0..frames {
            update_particles(&mut s, 1.0);
        }
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut s = state();
        s.tuning.max_particles = 5;
        burst(&mut s, Vec2::ZERO, 50, ParticleKind::Sparkle, SPARKLE_WHITE, (1.0, 2.0));
        assert_eq!(s.particles.len(), 5);
    }

    #[test]
    fn test_shake_decays_to_zero() {
        let mut s = state();
        s.shake = 10.0;
        let mut prev = s.shake;
        for _ in 0..200 {
            decay(&mut s, 1.0);
            assert!(s.shake <= prev);
            prev = s.shake;
        }
        assert_eq!(s.shake, 0.0);
    }

    #[test]
    fn test_combo_banner_clears_with_combo() {
        let mut s = state();
        s.combo.text = "x3 COMBO!".into();
        s.combo.alpha = 0.8;
        s.combo.count = 0;
        decay(&mut s, 1.0);
        assert!(s.combo.text.is_empty());
        assert_eq!(s.combo.alpha, 0.0);
    }
}
