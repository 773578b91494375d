//! Randomized invariants of the simulation and session

use proptest::prelude::*;

use skate_dash::consts::*;
use skate_dash::sim::kinematics::{press_jump, step_player};
use skate_dash::sim::{
    BallTier, GameState, ItemKind, PlayerState, TickInput, Viewport, jump_press, jump_release,
    tick,
};
use skate_dash::{GameSession, SessionOwner, Tuning};

#[derive(Default)]
struct Recorder {
    reports: Vec<u32>,
}

impl SessionOwner for Recorder {
    fn on_session_end(&mut self, final_score: u32) {
        self.reports.push(final_score);
    }
}

fn quiet_state(seed: u64) -> GameState {
    GameState::new(seed, Viewport::default(), Tuning::without_spawning())
}

fn ball_at_player(state: &mut GameState, tier: BallTier) {
    let center = state.player.center();
    state.scroll_speed = 0.0;
    state.insert_item(
        center.x,
        center.y,
        tier.radius(),
        ItemKind::Ball {
            tier,
            base_y: center.y,
            phase: 0.0,
        },
    );
}

fn obstacle_at_player(state: &mut GameState, height: f32) {
    let ground = state.viewport.ground_y();
    state.scroll_speed = 0.0;
    state.insert_item(
        PLAYER_X - OBSTACLE_WIDTH / 2.0,
        ground,
        OBSTACLE_WIDTH,
        ItemKind::Obstacle { height },
    );
}

#[derive(Debug, Clone)]
enum Action {
    Frame(f32),
    Press,
    Release,
    Ball(BallTier),
    Rail { ahead: f32, lift: f32, slope: f32 },
    Obstacle { ahead: f32 },
}

fn tier() -> impl Strategy<Value = BallTier> {
    prop::sample::select(BallTier::ALL.to_vec())
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (1.0f32..80.0).prop_map(Action::Frame),
        1 => Just(Action::Press),
        1 => Just(Action::Release),
        2 => tier().prop_map(Action::Ball),
        1 => (0.0f32..300.0, 60.0f32..200.0, -10.0f32..10.0)
            .prop_map(|(ahead, lift, slope)| Action::Rail { ahead, lift, slope }),
        1 => (50.0f32..600.0).prop_map(|ahead| Action::Obstacle { ahead }),
    ]
}

fn apply(state: &mut GameState, action: &Action) {
    let ground = state.viewport.ground_y();
    match *action {
        Action::Frame(dt_ms) => tick(state, &TickInput::default(), dt_ms),
        Action::Press => {
            jump_press(state);
        }
        Action::Release => {
            jump_release(state);
        }
        Action::Ball(tier) => ball_at_player(state, tier),
        Action::Rail { ahead, lift, slope } => {
            state.scroll_speed = 5.0;
            state.insert_item(
                PLAYER_X + ahead,
                ground - lift,
                RAIL_THICKNESS,
                ItemKind::Rail {
                    length: 250.0,
                    slope,
                },
            );
        }
        Action::Obstacle { ahead } => {
            state.scroll_speed = 5.0;
            state.insert_item(
                PLAYER_X + ahead,
                ground,
                OBSTACLE_WIDTH,
                ItemKind::Obstacle { height: 40.0 },
            );
        }
    }
}

proptest! {
    #[test]
    fn score_never_decreases(seed in any::<u64>(), actions in prop::collection::vec(action(), 1..200)) {
        let mut state = quiet_state(seed);
        let mut last = state.floored_score();
        for action in &actions {
            apply(&mut state, action);
            let now = state.floored_score();
            prop_assert!(now >= last, "{} -> {} after {:?}", last, now, action);
            prop_assert!(state.score.is_finite());
            last = now;
        }
    }

    #[test]
    fn unshielded_hit_reports_once(
        seed in any::<u64>(),
        pickups in prop::collection::vec(prop::sample::select(vec![BallTier::Common, BallTier::Great, BallTier::Ultra]), 0..12),
        extra_hits in 0usize..4,
        frames_after in 0u32..60,
    ) {
        let mut session = GameSession::new(
            Recorder::default(),
            seed,
            Viewport::default(),
            Tuning::without_spawning(),
        );
        session.start();
        let mut clock = 0.0;
        let mut next_frame = |session: &mut GameSession<Recorder>| {
            clock += NOMINAL_FRAME_MS as f64;
            session.frame(clock)
        };

        for tier in pickups {
            ball_at_player(session.state_mut(), tier);
            prop_assert!(next_frame(&mut session));
        }
        prop_assert!(!session.state().power_ups.shield);

        let expected = session.state().floored_score();
        obstacle_at_player(session.state_mut(), 40.0);
        for _ in 0..extra_hits {
            obstacle_at_player(session.state_mut(), 40.0);
        }
        prop_assert!(!next_frame(&mut session));

        for _ in 0..frames_after {
            obstacle_at_player(session.state_mut(), 40.0);
            prop_assert!(!next_frame(&mut session));
        }

        prop_assert_eq!(&session.owner().reports, &vec![expected]);
        prop_assert_eq!(session.state().final_score, Some(expected));
    }

    #[test]
    fn shield_absorbs_exactly_one_hit(seed in any::<u64>(), gap in 1u32..120, height in 20.0f32..52.0) {
        let mut state = quiet_state(seed);
        let input = TickInput::default();
        state.power_ups.shield = true;

        obstacle_at_player(&mut state, height);
        tick(&mut state, &input, NOMINAL_FRAME_MS);
        prop_assert!(!state.power_ups.shield);
        prop_assert!(!state.over);
        prop_assert!(state.items.is_empty());

        for _ in 0..gap {
            tick(&mut state, &input, NOMINAL_FRAME_MS);
        }
        prop_assert!(!state.over);

        obstacle_at_player(&mut state, height);
        tick(&mut state, &input, NOMINAL_FRAME_MS);
        prop_assert!(state.over);
    }

    #[test]
    fn fall_speed_stays_capped(
        seed in any::<u64>(),
        start_vy in -20.0f32..40.0,
        frames in prop::collection::vec(1.0f32..200.0, 1..150),
    ) {
        let mut state = quiet_state(seed);
        state.player.y = state.viewport.ground_y() - 3000.0;
        state.player.vy = start_vy.min(state.tuning.max_fall_speed);
        state.player.was_grounded = false;
        let cap = state.tuning.max_fall_speed;

        for dt_ms in frames {
            tick(&mut state, &TickInput::default(), dt_ms);
            prop_assert!(!state.player.grinding);
            prop_assert!(state.player.vy <= cap, "vy {} over cap {}", state.player.vy, cap);
        }
    }

    #[test]
    fn combo_lapses_without_pickups(
        seed in any::<u64>(),
        streak in 1u32..20,
        dt_ms in 5.0f32..50.0,
    ) {
        let mut state = quiet_state(seed);
        for _ in 0..streak {
            state.bump_combo();
        }
        let timeout = state.tuning.combo_timeout_ms;
        // dt_ms stays under the three-frame clamp, so each tick advances by it
        let frames = (timeout / dt_ms).ceil() as u32;

        let mut elapsed = 0.0;
        for _ in 0..frames + 2 {
            tick(&mut state, &TickInput::default(), dt_ms);
            elapsed += dt_ms;
            if elapsed < timeout - dt_ms {
                prop_assert_eq!(state.combo.count, streak);
            }
        }
        prop_assert_eq!(state.combo.count, 0);
        prop_assert!(state.combo.text.is_empty());
    }

    #[test]
    fn offscreen_items_are_dropped_for_good(
        seed in any::<u64>(),
        items in prop::collection::vec((0.0f32..900.0, 1.0f32..12.0, any::<bool>()), 1..30),
        frames in 1u32..400,
    ) {
        let mut state = quiet_state(seed);
        // Everything sits high above the player's reach
        for (x, speed, is_rail) in items {
            state.scroll_speed = speed;
            if is_rail {
                state.insert_item(x, 20.0, RAIL_THICKNESS, ItemKind::Rail { length: 120.0, slope: 0.0 });
            } else {
                state.insert_item(x, 20.0, 14.0, ItemKind::Ball { tier: BallTier::Common, base_y: 20.0, phase: 0.0 });
            }
        }

        let mut gone = std::collections::HashSet::new();
        for _ in 0..frames {
            let before: Vec<u32> = state.items.iter().map(|item| item.id).collect();
            tick(&mut state, &TickInput::default(), NOMINAL_FRAME_MS);
            for item in &state.items {
                prop_assert!(item.trailing_edge() >= 0.0);
                prop_assert!(!gone.contains(&item.id));
            }
            for id in before {
                if !state.items.iter().any(|item| item.id == id) {
                    gone.insert(id);
                }
            }
        }
        prop_assert_eq!(state.score, 0.0);
    }
}

/// A player that just rolled off a rail high above the ground
fn off_rail(tuning: &Tuning) -> (PlayerState, f32) {
    let ground = Viewport::default().ground_y();
    let mut player = PlayerState::new(ground);
    player.y = ground - 400.0;
    player.grinding = true;
    step_player(&mut player, ground, tuning, 1.0, NOMINAL_FRAME_MS);
    player.grinding = false;
    (player, ground)
}

fn step(player: &mut PlayerState, ground: f32, tuning: &Tuning) -> bool {
    step_player(player, ground, tuning, 1.0, NOMINAL_FRAME_MS).jumped
}

proptest! {
    #[test]
    fn press_inside_coyote_window_jumps(frames_off in 1u32..=3) {
        let tuning = Tuning::default();
        let (mut player, ground) = off_rail(&tuning);
        for _ in 0..frames_off {
            step(&mut player, ground, &tuning);
        }
        prop_assert!(player.y < ground);
        prop_assert!(press_jump(&mut player, ground, &tuning));
        prop_assert_eq!(player.vy, tuning.jump_velocity);
    }

    #[test]
    fn buffered_press_fires_only_near_touchdown(lead in prop_oneof![1u32..=4, 7u32..=20]) {
        let tuning = Tuning::default();
        let (player, ground) = off_rail(&tuning);

        // Steps from leaving the rail until touchdown, without any input
        let mut probe = player.clone();
        let mut touchdown = 0;
        loop {
            touchdown += 1;
            if step_player(&mut probe, ground, &tuning, 1.0, NOMINAL_FRAME_MS).landed {
                break;
            }
        }
        prop_assume!(touchdown > lead + 6);

        let mut player = player;
        for _ in 0..touchdown - lead {
            step(&mut player, ground, &tuning);
        }
        prop_assert!(!player.coyote.active());
        prop_assert!(!press_jump(&mut player, ground, &tuning));

        let mut fired = false;
        for _ in 0..lead {
            fired |= step(&mut player, ground, &tuning);
        }
        for _ in 0..30 {
            fired |= step(&mut player, ground, &tuning);
        }

        if lead <= 4 {
            prop_assert!(fired);
        } else {
            prop_assert!(!fired);
            prop_assert_eq!(player.y, ground);
            prop_assert_eq!(player.vy, 0.0);
        }
    }
}
