//! Game state and core simulation types
//!
//! One `GameState` owns everything a play session mutates. It is created at
//! session start and dropped with the session; nothing in it is shared.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timer::Countdown;
use crate::consts::*;
use crate::tuning::Tuning;

/// Player feet within this many pixels of the ground count as grounded
const GROUND_EPSILON: f32 = 0.5;

/// Render target size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y coordinate of the ground line (screen space, y grows downward)
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_MARGIN
    }

    /// Whether there is anything to draw into
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0, 540.0)
    }
}

/// The skater. Horizontal position is fixed at `PLAYER_X`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Feet position (bottom of the sprite)
    pub y: f32,
    /// Vertical velocity, px per nominal frame (negative = up)
    pub vy: f32,
    pub grinding: bool,
    /// Rail currently being ground
    pub rail_id: Option<u32>,
    /// Slope of that rail (rise per `RAIL_SLOPE_RUN`), for the board tilt
    pub rail_slope: f32,
    /// Squash/stretch scale, relaxes toward (1, 1)
    pub scale: Vec2,
    pub coyote: Countdown,
    pub jump_buffer: Countdown,
    /// The pending buffered jump was requested while airborne
    pub buffered_from_air: bool,
    /// Was standing on ground or rail at the end of the last step
    pub was_grounded: bool,
    /// A jump-cut is still available for the current jump
    pub can_cut: bool,
}

impl PlayerState {
    pub fn new(ground_y: f32) -> Self {
        Self {
            y: ground_y,
            vy: 0.0,
            grinding: false,
            rail_id: None,
            rail_slope: 0.0,
            scale: Vec2::ONE,
            coyote: Countdown::IDLE,
            jump_buffer: Countdown::IDLE,
            buffered_from_air: false,
            was_grounded: true,
            can_cut: false,
        }
    }

    pub fn is_grounded(&self, ground_y: f32) -> bool {
        self.vy >= 0.0 && self.y >= ground_y - GROUND_EPSILON
    }

    /// Standing on the ground or riding a rail
    pub fn is_supported(&self, ground_y: f32) -> bool {
        self.grinding || self.is_grounded(ground_y)
    }

    /// Center of the (unscaled) body, used for pickups and the magnet
    pub fn center(&self) -> Vec2 {
        Vec2::new(PLAYER_X, self.y - PLAYER_HEIGHT / 2.0)
    }

    pub fn left(&self) -> f32 {
        PLAYER_X - PLAYER_WIDTH / 2.0
    }

    pub fn right(&self) -> f32 {
        PLAYER_X + PLAYER_WIDTH / 2.0
    }
}

/// Pickup ranks, rarest last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallTier {
    Common,
    Great,
    Ultra,
    Master,
}

impl BallTier {
    pub const ALL: [BallTier; 4] = [
        BallTier::Common,
        BallTier::Great,
        BallTier::Ultra,
        BallTier::Master,
    ];

    /// Base score before combo and double-score multipliers
    pub fn value(&self) -> u32 {
        match self {
            BallTier::Common => 1,
            BallTier::Great => 2,
            BallTier::Ultra => 3,
            BallTier::Master => 5,
        }
    }

    /// Visual radius
    pub fn radius(&self) -> f32 {
        match self {
            BallTier::Common => 14.0,
            BallTier::Great => 15.0,
            BallTier::Ultra => 16.0,
            BallTier::Master => 18.0,
        }
    }

    /// Particles emitted on pickup
    pub fn burst_count(&self) -> usize {
        match self {
            BallTier::Common => 8,
            BallTier::Great => 12,
            BallTier::Ultra => 16,
            BallTier::Master => 24,
        }
    }

    pub fn shake(&self) -> f32 {
        match self {
            BallTier::Common => 2.0,
            BallTier::Great => 4.0,
            BallTier::Ultra => 6.0,
            BallTier::Master => 10.0,
        }
    }

    /// Particle tint for this tier's burst
    pub fn color(&self) -> [f32; 4] {
        match self {
            BallTier::Common => [1.0, 0.35, 0.35, 1.0],
            BallTier::Great => [0.35, 0.55, 1.0, 1.0],
            BallTier::Ultra => [1.0, 0.85, 0.25, 1.0],
            BallTier::Master => [0.85, 0.4, 1.0, 1.0],
        }
    }
}

/// Per-variant data of a scrolling entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Collectible. `y` bobs around `base_y` driven by `phase`.
    Ball { tier: BallTier, base_y: f32, phase: f32 },
    /// Grindable rail. `x`/`y` are the left end of the surface.
    Rail { length: f32, slope: f32 },
    /// Ground hazard. `x` is the left edge, `y` the ground line.
    Obstacle { height: f32 },
}

/// A scrolling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Leftward scroll speed, px per nominal frame
    pub speed: f32,
    /// Radius for balls, thickness for rails, width for obstacles
    pub size: f32,
    pub kind: ItemKind,
}

impl Item {
    /// Right-most x still occupied by the item
    pub fn trailing_edge(&self) -> f32 {
        match self.kind {
            ItemKind::Ball { .. } => self.x + self.size,
            ItemKind::Rail { length, .. } => self.x + length,
            ItemKind::Obstacle { .. } => self.x + self.size,
        }
    }

    /// Rail surface y under `at_x`, interpolated along the slope
    pub fn rail_surface_at(&self, at_x: f32) -> Option<f32> {
        match self.kind {
            ItemKind::Rail { length, slope } => {
                if length <= 0.0 {
                    return Some(self.y);
                }
                let frac = ((at_x - self.x) / length).clamp(0.0, 1.0);
                let rise = slope * length / RAIL_SLOPE_RUN;
                Some(self.y - rise * frac)
            }
            _ => None,
        }
    }

    /// Whether `at_x` lies within the rail's horizontal span
    pub fn rail_spans(&self, at_x: f32) -> bool {
        match self.kind {
            ItemKind::Rail { length, .. } => at_x >= self.x && at_x <= self.x + length,
            _ => false,
        }
    }
}

/// Consecutive pickup/mount streak
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    pub timer: Countdown,
    /// "xN COMBO!" banner
    pub text: String,
    pub alpha: f32,
    pub scale: f32,
}

impl ComboState {
    pub fn reset(&mut self) {
        self.count = 0;
        self.timer.clear();
        self.text.clear();
        self.alpha = 0.0;
        self.scale = 1.0;
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUps {
    pub double_score: Countdown,
    pub magnet: Countdown,
    /// Absorbs exactly one obstacle hit
    pub shield: bool,
}

impl PowerUps {
    pub fn score_multiplier(&self) -> f64 {
        if self.double_score.active() { 2.0 } else { 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Sparkle,
    Heart,
    ComboText,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
    pub kind: ParticleKind,
    /// Label for `ComboText` particles
    pub text: Option<String>,
    pub scale: f32,
}

/// Highest score threshold already announced this session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneState {
    pub watermark: u32,
    pub text: String,
    pub alpha: f32,
}

/// What happened during a tick; consumed by the feedback system and the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { pos: Vec2 },
    Landed { pos: Vec2 },
    RailMount { pos: Vec2, combo: u32 },
    Grind { pos: Vec2 },
    Pickup { tier: BallTier, pos: Vec2, points: f64, combo: u32 },
    ShieldAbsorbed { pos: Vec2 },
    Crash { pos: Vec2, final_score: u32 },
    Milestone { threshold: u32 },
}

/// Complete per-session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub player: PlayerState,
    /// Live scrolling entities, in spawn order
    pub items: Vec<Item>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub combo: ComboState,
    pub power_ups: PowerUps,
    pub milestone: MilestoneState,
    /// Unfloored score accumulator
    pub score: f64,
    /// Screen shake intensity (pixels)
    pub shake: f32,
    /// An obstacle is close and not being grinded over
    pub companion_worried: bool,
    /// Pixels scrolled so far (parallax)
    pub distance: f32,
    pub scroll_speed: f32,
    /// Time since the last spawn
    pub spawn_clock_ms: f32,
    pub elapsed_ms: f64,
    pub frame: u64,
    /// Run has ended; set once by the first unshielded obstacle hit
    pub over: bool,
    pub final_score: Option<u32>,
    /// Events produced by the most recent tick (and any jump since)
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let tuning = tuning.normalized();
        let scroll_speed = tuning.scroll_speed_base;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: PlayerState::new(viewport.ground_y()),
            viewport,
            tuning,
            items: Vec::new(),
            particles: Vec::new(),
            combo: ComboState {
                scale: 1.0,
                ..Default::default()
            },
            power_ups: PowerUps::default(),
            milestone: MilestoneState::default(),
            score: 0.0,
            shake: 0.0,
            companion_worried: false,
            distance: 0.0,
            scroll_speed,
            spawn_clock_ms: 0.0,
            elapsed_ms: 0.0,
            frame: 0,
            over: false,
            final_score: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Score as displayed and reported
    pub fn floored_score(&self) -> u32 {
        if self.score.is_finite() && self.score > 0.0 {
            self.score.floor().min(u32::MAX as f64) as u32
        } else {
            0
        }
    }

    /// Count a pickup or rail mount toward the streak
    pub fn bump_combo(&mut self) -> u32 {
        self.combo.count += 1;
        self.combo.timer.arm(self.tuning.combo_timeout_ms);
        self.combo.count
    }

    /// Adopt new viewport dimensions. Items keep their coordinates; a grounded
    /// player follows the new ground line.
    pub fn resize(&mut self, viewport: Viewport) {
        let old_ground = self.viewport.ground_y();
        let new_ground = viewport.ground_y();
        if !self.player.grinding && self.player.is_grounded(old_ground) {
            self.player.y = new_ground;
        } else if self.player.y > new_ground {
            self.player.y = new_ground;
            self.player.vy = self.player.vy.min(0.0);
        }
        self.viewport = viewport;
    }

    /// Push a hand-built item (scripted scenarios and tests)
    pub fn insert_item(&mut self, x: f32, y: f32, size: f32, kind: ItemKind) -> u32 {
        let id = self.next_entity_id();
        self.items.push(Item {
            id,
            x,
            y,
            speed: self.scroll_speed,
            size,
            kind,
        });
        id
    }
}
