//! Data-driven game feel
//!
//! Every hand-tuned constant of the arcade feel model lives here. The
//! defaults are the shipped values; a JSON document can override any subset.
//! Per-frame quantities are expressed per nominal 60 Hz frame and scaled by
//! the frame factor; timers are in milliseconds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Kinematics ===
    /// Gravity while rising (px/frame²)
    pub gravity_rise: f32,
    /// Gravity while falling (px/frame²)
    pub gravity_fall: f32,
    /// Gravity at the very top of the arc
    pub gravity_apex: f32,
    /// |vy| below which apex blending kicks in
    pub apex_threshold: f32,
    /// Terminal fall speed (px/frame)
    pub max_fall_speed: f32,
    /// Jump impulse (negative = up)
    pub jump_velocity: f32,
    /// Velocity multiplier applied when the jump is released while rising
    pub jump_cut: f32,
    pub coyote_ms: f32,
    pub jump_buffer_ms: f32,
    /// Fraction of squash deviation kept per frame
    pub squash_relax: f32,
    pub land_squash: (f32, f32),
    pub jump_stretch: (f32, f32),
    pub pickup_squash: (f32, f32),

    // === Spawning ===
    pub spawn_interval_base_ms: f32,
    pub spawn_interval_per_point_ms: f32,
    pub spawn_interval_min_ms: f32,
    pub scroll_speed_base: f32,
    pub scroll_speed_per_point: f32,
    pub scroll_speed_max: f32,
    /// First roll below this spawns a rail
    pub rail_chance: f32,
    /// First roll above this (and not a rail) spawns an obstacle
    pub obstacle_threshold: f32,
    /// Second roll bands for ball tiers (cumulative, rarest first)
    pub master_band: f32,
    pub ultra_band: f32,
    pub great_band: f32,
    /// Rail heights above the ground line
    pub rail_tiers: [f32; 3],
    pub rail_jitter: f32,
    pub rail_length_min: f32,
    pub rail_length_max: f32,
    pub rail_slope_chance: f32,
    /// Max rise per `RAIL_SLOPE_RUN` pixels
    pub rail_slope_max: f32,
    /// Lowest point of a rail stays at least this far above ground
    pub rail_min_clearance: f32,
    /// Highest point of a rail stays at most this far above ground
    pub rail_max_height: f32,
    pub ball_height_min: f32,
    pub ball_height_max: f32,
    pub bob_amplitude: f32,
    pub bob_speed: f32,
    pub obstacle_height_min: f32,
    pub obstacle_height_max: f32,

    // === Collision & scoring ===
    /// Feet may be this far above the rail surface and still catch it
    pub rail_catch_above: f32,
    /// Feet may be this far below the rail surface and still catch it
    pub rail_catch_below: f32,
    pub pickup_radius: f32,
    pub grind_score: f32,
    pub combo_timeout_ms: f32,
    pub double_score_ms: f32,
    pub magnet_ms: f32,
    pub magnet_radius: f32,
    /// Max pull (px/frame) right next to the player
    pub magnet_pull: f32,
    pub magnet_min_distance: f32,
    /// Obstacles closer than this make the companion nervous
    pub worry_distance: f32,

    // === Feedback ===
    pub particle_decay: f32,
    pub sparkle_gravity: f32,
    /// Horizontal velocity kept per frame
    pub air_resistance: f32,
    pub shake_decay: f32,
    pub shake_floor: f32,
    pub banner_fade: f32,
    pub combo_banner_scale: f32,
    pub shield_shake: f32,
    pub crash_shake: f32,
    pub milestone_shake: f32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_rise: 0.55,
            gravity_fall: 0.95,
            gravity_apex: 0.22,
            apex_threshold: 2.5,
            max_fall_speed: 15.0,
            jump_velocity: -13.0,
            jump_cut: 0.45,
            coyote_ms: 80.0,
            jump_buffer_ms: 100.0,
            squash_relax: 0.82,
            land_squash: (1.3, 0.72),
            jump_stretch: (0.78, 1.28),
            pickup_squash: (1.12, 0.9),

            spawn_interval_base_ms: 1500.0,
            spawn_interval_per_point_ms: 5.0,
            spawn_interval_min_ms: 600.0,
            scroll_speed_base: 5.0,
            scroll_speed_per_point: 0.015,
            scroll_speed_max: 11.0,
            rail_chance: 0.45,
            obstacle_threshold: 0.9,
            master_band: 0.005,
            ultra_band: 0.035,
            great_band: 0.135,
            rail_tiers: [70.0, 140.0, 210.0],
            rail_jitter: 18.0,
            rail_length_min: 220.0,
            rail_length_max: 420.0,
            rail_slope_chance: 0.35,
            rail_slope_max: 22.0,
            rail_min_clearance: 45.0,
            rail_max_height: 300.0,
            ball_height_min: 40.0,
            ball_height_max: 210.0,
            bob_amplitude: 6.0,
            bob_speed: 0.08,
            obstacle_height_min: 28.0,
            obstacle_height_max: 52.0,

            rail_catch_above: 10.0,
            rail_catch_below: 24.0,
            pickup_radius: 44.0,
            grind_score: 0.12,
            combo_timeout_ms: 2000.0,
            double_score_ms: 8000.0,
            magnet_ms: 6000.0,
            magnet_radius: 260.0,
            magnet_pull: 9.0,
            magnet_min_distance: 1.0,
            worry_distance: 200.0,

            particle_decay: 0.025,
            sparkle_gravity: 0.15,
            air_resistance: 0.97,
            shake_decay: 0.9,
            shake_floor: 0.1,
            banner_fade: 0.02,
            combo_banner_scale: 1.5,
            shield_shake: 8.0,
            crash_shake: 18.0,
            milestone_shake: 3.0,
            max_particles: crate::consts::MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning override; missing fields keep defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    /// Tuning with the spawner effectively switched off (scripted scenarios)
    pub fn without_spawning() -> Self {
        Self {
            spawn_interval_base_ms: f32::INFINITY,
            spawn_interval_min_ms: f32::INFINITY,
            ..Self::default()
        }
    }

    /// Put every min/max pair the spawner samples from in order, make the
    /// jitter non-negative, and replace non-finite values with the defaults.
    pub fn normalized(mut self) -> Self {
        let d = Self::default();

        (self.rail_length_min, self.rail_length_max) = ordered(
            (self.rail_length_min, self.rail_length_max),
            (d.rail_length_min, d.rail_length_max),
        );
        self.rail_length_min = self.rail_length_min.max(0.0);
        self.rail_length_max = self.rail_length_max.max(0.0);
        (self.rail_min_clearance, self.rail_max_height) = ordered(
            (self.rail_min_clearance, self.rail_max_height),
            (d.rail_min_clearance, d.rail_max_height),
        );
        (self.ball_height_min, self.ball_height_max) = ordered(
            (self.ball_height_min, self.ball_height_max),
            (d.ball_height_min, d.ball_height_max),
        );
        (self.obstacle_height_min, self.obstacle_height_max) = ordered(
            (self.obstacle_height_min, self.obstacle_height_max),
            (d.obstacle_height_min, d.obstacle_height_max),
        );

        self.rail_jitter = finite_or(self.rail_jitter, d.rail_jitter).abs();
        self.rail_slope_max = finite_or(self.rail_slope_max, d.rail_slope_max);
        for (tier, default) in self.rail_tiers.iter_mut().zip(d.rail_tiers) {
            *tier = finite_or(*tier, default);
        }
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

fn ordered(pair: (f32, f32), fallback: (f32, f32)) -> (f32, f32) {
    let lo = finite_or(pair.0, fallback.0);
    let hi = finite_or(pair.1, fallback.1);
    if lo <= hi { (lo, hi) } else { (hi, lo) }
}
