//! Scene building
//!
//! Reads a `GameState` and produces one triangle list in CSS pixel space.
//! Never mutates the simulation.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::*;
use crate::outfit::{Companion, Outfit};
use crate::settings::Settings;
use crate::sim::{BallTier, GameState, Item, ItemKind, ParticleKind};

/// Cheap per-index hash in 0..1, stable across frames
fn hash01(seed: u32) -> f32 {
    let hash = seed.wrapping_mul(2654435761).wrapping_add(7919);
    ((hash >> 8) % 1000) as f32 / 1000.0
}

/// Render-time shake offset. Jitter comes from the frame counter so the
/// simulation RNG is never touched.
pub fn shake_offset(state: &GameState, settings: &Settings) -> Vec2 {
    if !settings.effective_screen_shake() || state.shake <= 0.0 {
        return Vec2::ZERO;
    }
    let hash = (state.frame as u32).wrapping_mul(2654435761);
    let rand1 = (hash % 1000) as f32 / 1000.0 - 0.5;
    let rand2 = ((hash >> 10) % 1000) as f32 / 1000.0 - 0.5;
    Vec2::new(rand1, rand2) * 2.0 * state.shake
}

/// Build the full frame. Returns nothing for a degenerate viewport.
pub fn build_scene(
    state: &GameState,
    outfit: &Outfit,
    settings: &Settings,
    time_ms: f64,
) -> Vec<Vertex> {
    let viewport = state.viewport;
    if !viewport.is_valid() {
        log::warn!("skipping render for viewport {}x{}", viewport.width, viewport.height);
        return Vec::new();
    }
    let time = (time_ms / 1000.0) as f32;
    let mut out = Vec::with_capacity(4096);

    out.extend(shapes::gradient_rect(
        0.0,
        0.0,
        viewport.width,
        viewport.height,
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));
    if settings.effective_parallax() {
        skyline(&mut out, state, 0.15, 180.0, colors::SKYLINE_FAR, 0);
        skyline(&mut out, state, 0.4, 110.0, colors::SKYLINE_NEAR, 97);
    }

    // Everything from here on shakes
    let shaken_from = out.len();

    ground(&mut out, state);
    for item in &state.items {
        match item.kind {
            ItemKind::Rail { length, .. } => rail(&mut out, state, item, length),
            ItemKind::Obstacle { height } => {
                let top = item.y - height;
                out.extend(shapes::rect(item.x, top, item.size, height, colors::OBSTACLE));
                out.extend(shapes::rect(
                    item.x,
                    top + height * 0.35,
                    item.size,
                    height * 0.2,
                    colors::OBSTACLE_STRIPE,
                ));
            }
            ItemKind::Ball { tier, .. } => ball(&mut out, Vec2::new(item.x, item.y), tier, time),
        }
    }

    companion(&mut out, state, outfit.companion, time);
    player(&mut out, state, outfit);

    for p in &state.particles {
        let color = with_alpha(p.color, p.life);
        match p.kind {
            ParticleKind::Sparkle => out.extend(shapes::diamond(p.pos, p.size * 1.5, color)),
            ParticleKind::Heart => out.extend(shapes::heart(p.pos, p.size * 2.0, color)),
            ParticleKind::ComboText => {
                let r = p.size * p.scale;
                out.extend(shapes::ring(p.pos, r * 0.7, r, color, 16));
            }
        }
    }

    let offset = shake_offset(state, settings);
    if offset != Vec2::ZERO {
        for v in &mut out[shaken_from..] {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
        }
    }

    power_up_bars(&mut out, state);
    out
}

fn skyline(out: &mut Vec<Vertex>, state: &GameState, factor: f32, max_h: f32, color: [f32; 4], salt: u32) {
    let ground = state.viewport.ground_y();
    let spacing = 90.0;
    let scroll = state.distance * factor;
    let first = (scroll / spacing).floor() as i64;
    let count = (state.viewport.width / spacing).ceil() as i64 + 2;
    for i in first..first + count {
        let seed = (i as u32).wrapping_add(salt);
        let w = spacing * (0.6 + 0.35 * hash01(seed));
        let h = max_h * (0.35 + 0.65 * hash01(seed ^ 0x9e37));
        let x = i as f32 * spacing - scroll;
        out.extend(shapes::rect(x, ground - h, w, h, color));
    }
}

fn ground(out: &mut Vec<Vertex>, state: &GameState) {
    let vp = state.viewport;
    let ground = vp.ground_y();
    out.extend(shapes::rect(-20.0, ground, vp.width + 40.0, vp.height - ground + 20.0, colors::GROUND));
    out.extend(shapes::rect(-20.0, ground, vp.width + 40.0, 4.0, colors::GROUND_LINE));
    // Sidewalk seams scroll with the world
    let spacing = 60.0;
    let shift = state.distance % spacing;
    let mut x = -shift;
    while x < vp.width {
        out.extend(shapes::rect(x, ground + 14.0, 2.0, 22.0, colors::GROUND_LINE));
        x += spacing;
    }
}

fn rail(out: &mut Vec<Vertex>, state: &GameState, item: &Item, length: f32) {
    let (x, y) = (item.x, item.y);
    let ground = state.viewport.ground_y();
    let right_y = item.rail_surface_at(x + length).unwrap_or(y);
    for (px, py) in [(x + 12.0, y), (x + length - 12.0, right_y)] {
        let top = item.rail_surface_at(px).unwrap_or(py);
        out.extend(shapes::rect(px - 3.0, top, 6.0, (ground - top).max(0.0), colors::RAIL_POST));
    }
    let thickness = item.size;
    let half = Vec2::new(0.0, thickness / 2.0);
    out.extend(shapes::segment(
        Vec2::new(x, y) + half,
        Vec2::new(x + length, right_y) + half,
        thickness,
        colors::RAIL,
    ));
}

fn ball(out: &mut Vec<Vertex>, center: Vec2, tier: BallTier, time: f32) {
    let r = tier.radius();
    out.extend(shapes::circle(center, r, tier.color(), 20));
    out.extend(shapes::circle(center + Vec2::new(-r * 0.35, -r * 0.35), r * 0.3, colors::BALL_SHINE, 8));
    if tier == BallTier::Master {
        let pulse = 1.0 + 0.15 * (time * 6.0).sin();
        out.extend(shapes::ring(center, r * 1.2 * pulse, r * 1.4 * pulse, with_alpha(tier.color(), 0.6), 24));
    }
}

fn player(out: &mut Vec<Vertex>, state: &GameState, outfit: &Outfit) {
    let p = &state.player;
    let feet = Vec2::new(PLAYER_X, p.y);
    let w = PLAYER_WIDTH * p.scale.x;
    let h = PLAYER_HEIGHT * p.scale.y;

    // Board follows the rail's tilt
    let tilt = if p.grinding {
        (-p.rail_slope).atan2(RAIL_SLOPE_RUN)
    } else {
        0.0
    };
    let board_len = PLAYER_WIDTH * 1.5;
    out.extend(shapes::rotated_rect(feet, Vec2::new(board_len / 2.0, 6.0), Vec2::new(board_len, 6.0), tilt, outfit.board));
    for side in [-1.0f32, 1.0] {
        let along = Vec2::new(tilt.cos(), tilt.sin()) * (board_len * 0.32 * side);
        out.extend(shapes::circle(feet + along + Vec2::new(0.0, 2.0), 4.0, colors::WHEEL, 8));
    }

    // Body is anchored at the feet so squash never sinks into the board
    let body_top = feet.y - 6.0 - h * 0.7;
    out.extend(shapes::rect(feet.x - w / 2.0, body_top, w, h * 0.7, outfit.body));
    out.extend(shapes::rect(feet.x - w / 2.0, body_top + h * 0.45, w, h * 0.08, outfit.accent));

    let head_r = w * 0.36;
    let head = Vec2::new(feet.x + w * 0.05, body_top - head_r * 0.8);
    out.extend(shapes::circle(head, head_r, outfit.skin, 16));
    out.extend(shapes::ellipse(head - Vec2::new(0.0, head_r * 0.45), Vec2::new(head_r * 1.05, head_r * 0.6), outfit.accent, 14));
    out.extend(shapes::circle(head + Vec2::new(head_r * 0.4, 0.1 * head_r), head_r * 0.14, colors::EYE, 6));

    if state.power_ups.shield {
        out.extend(shapes::circle(p.center(), PLAYER_HEIGHT * 0.85, colors::SHIELD, 28));
    }
    if state.power_ups.magnet.active() {
        let a = with_alpha(colors::MAGNET, 0.25 + 0.5 * state.power_ups.magnet.fraction());
        out.extend(shapes::ring(p.center(), PLAYER_HEIGHT * 0.95, PLAYER_HEIGHT, a, 28));
    }
}

fn companion(out: &mut Vec<Vertex>, state: &GameState, kind: Companion, time: f32) {
    let ground = state.viewport.ground_y();
    let hop = (time * 9.0).sin().abs() * 5.0;
    let base = Vec2::new(PLAYER_X - 62.0, ground - hop);
    let fur = kind.fur();
    let r = 11.0;

    out.extend(shapes::ellipse(base - Vec2::new(0.0, r * 0.9), Vec2::new(r * 1.3, r * 0.9), fur, 14));
    let head = base + Vec2::new(r * 0.9, -r * 2.0);
    let (ear_w, ear_h) = kind.ears();
    for side in [-1.0f32, 1.0] {
        let ear_base = head + Vec2::new(side * r * 0.45, -r * 0.6);
        out.extend(shapes::triangle(
            ear_base - Vec2::new(ear_w * r * 0.5, 0.0),
            ear_base + Vec2::new(ear_w * r * 0.5, 0.0),
            ear_base - Vec2::new(0.0, ear_h * r),
            fur,
        ));
    }
    out.extend(shapes::circle(head, r, fur, 14));

    // Worried: wide eyes glancing ahead and a sweat drop
    let (eye_r, glance) = if state.companion_worried { (2.6, 2.0) } else { (1.8, 0.0) };
    for side in [-1.0f32, 1.0] {
        let eye = head + Vec2::new(side * r * 0.4 + glance, -r * 0.1);
        out.extend(shapes::circle(eye, eye_r, colors::EYE, 6));
    }
    if state.companion_worried {
        out.extend(shapes::circle(head + Vec2::new(r * 1.1, -r * 0.7), 2.5, colors::SWEAT, 6));
    }
}

fn power_up_bars(out: &mut Vec<Vertex>, state: &GameState) {
    let bars = [
        (state.power_ups.double_score, colors::DOUBLE_SCORE),
        (state.power_ups.magnet, colors::MAGNET),
    ];
    let mut y = 16.0;
    for (timer, color) in bars {
        if !timer.active() {
            continue;
        }
        out.extend(shapes::rect(16.0, y, 120.0, 8.0, with_alpha(color, 0.3)));
        out.extend(shapes::rect(16.0, y, 120.0 * timer.fraction(), 8.0, color));
        y += 14.0;
    }
}
