//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where spawning is involved, an RNG handle) and returns
//! a brand-new `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    Difficulty, Faller, FallerKind, GameState, Key, Player, Screen, SpriteSizes,
};

// ── Field & tuning constants ─────────────────────────────────────────────────

/// Simulation field in pixels; the renderer projects this onto the terminal.
pub const FIELD_W: i32 = 640;
pub const FIELD_H: i32 = 480;

/// Horizontal player speed in pixels per tick.
const MOVE_STEP: i32 = 3;

/// Fall speed range, inclusive, drawn per entity at spawn.
const FALL_SPEED_MIN: i32 = 1;
const FALL_SPEED_MAX: i32 = 3;

/// A coin spawns when a draw in `0..=COIN_SPAWN_BOUND` comes up zero.
const COIN_SPAWN_BOUND: u32 = 100;

/// Monster spawn denominator: starts at 200 and drops by 20 every 300
/// ticks until it bottoms out at 60.
const MONSTER_DENOM_START: u32 = 200;
const MONSTER_DENOM_FLOOR: u32 = 60;
const RAMP_INTERVAL: u32 = 300;
const RAMP_STEP: u32 = 20;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the startup state: the title screen, with a parked player and no
/// run in progress.
pub fn init_state(width: i32, height: i32, sprites: SpriteSizes) -> GameState {
    GameState {
        screen: Screen::Title,
        player: spawn_player(width, height, sprites),
        coins: Vec::new(),
        monsters: Vec::new(),
        score: 0,
        difficulty: fresh_difficulty(),
        frame: 0,
        width,
        height,
        sprites,
    }
}

/// Begin a fresh run: player centered on the bottom edge, empty field,
/// score and difficulty reset.  Used for both Title → Playing and
/// GameOver → Playing.
pub fn start_run(state: &GameState) -> GameState {
    GameState {
        screen: Screen::Playing,
        player: spawn_player(state.width, state.height, state.sprites),
        coins: Vec::new(),
        monsters: Vec::new(),
        score: 0,
        difficulty: fresh_difficulty(),
        frame: 0,
        ..state.clone()
    }
}

fn spawn_player(width: i32, height: i32, sprites: SpriteSizes) -> Player {
    Player {
        x: (width - sprites.player.w) / 2,
        y: height - sprites.player.h,
        size: sprites.player,
        moving_left: false,
        moving_right: false,
    }
}

fn fresh_difficulty() -> Difficulty {
    Difficulty {
        frames_since_ramp: 0,
        spawn_denominator: MONSTER_DENOM_START,
    }
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Dispatch a key press to the active screen.  Combinations with no
/// listed transition leave the state unchanged.
pub fn key_down(state: &GameState, key: Key) -> GameState {
    match (&state.screen, key) {
        (Screen::Title | Screen::GameOver, Key::Enter) => start_run(state),
        (Screen::Playing, Key::Left) => GameState {
            player: Player { moving_left: true, ..state.player.clone() },
            ..state.clone()
        },
        (Screen::Playing, Key::Right) => GameState {
            player: Player { moving_right: true, ..state.player.clone() },
            ..state.clone()
        },
        _ => state.clone(),
    }
}

/// Dispatch a key release.  Only movement intents care about releases.
pub fn key_up(state: &GameState, key: Key) -> GameState {
    match (&state.screen, key) {
        (Screen::Playing, Key::Left) => GameState {
            player: Player { moving_left: false, ..state.player.clone() },
            ..state.clone()
        },
        (Screen::Playing, Key::Right) => GameState {
            player: Player { moving_right: false, ..state.player.clone() },
            ..state.clone()
        },
        _ => state.clone(),
    }
}

// ── Per-tick simulation (nearly pure — RNG is injected) ──────────────────────

/// Advance the simulation by one tick.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Outside the Playing screen this is a no-op: Title and GameOver idle.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.screen != Screen::Playing {
        return state.clone();
    }
    let frame = state.frame + 1;

    // ── 1. Move the player from its held-key intents, clamped to the field ──
    let player = step_player(&state.player, state.width);
    let player_box = player.rect();

    // ── 2. Spawn draws — coin, then monster, then advance the ramp ───────────
    let mut coins = state.coins.clone();
    if rng.gen_range(0..=COIN_SPAWN_BOUND) == 0 {
        coins.push(spawn_faller(FallerKind::Coin, state, rng));
    }

    let mut monsters = state.monsters.clone();
    if rng.gen_range(0..=state.difficulty.spawn_denominator) == 0 {
        monsters.push(spawn_faller(FallerKind::Monster, state, rng));
    }
    let difficulty = step_difficulty(&state.difficulty);

    // ── 3. Advance coins; collect on contact, drop the ones off the field ───
    let mut score = state.score;
    let coins: Vec<Faller> = coins
        .iter()
        .filter_map(|c| {
            let c = Faller { y: c.y + c.speed, ..c.clone() };
            if c.rect().overlaps(&player_box) {
                score += 1;
                return None; // consumed — never collides again
            }
            if c.y >= state.height {
                return None; // fully below the bottom edge
            }
            Some(c)
        })
        .collect();

    // ── 4. Advance monsters; any contact ends the run ────────────────────────
    let mut dead = false;
    let monsters: Vec<Faller> = monsters
        .iter()
        .filter_map(|m| {
            let m = Faller { y: m.y + m.speed, ..m.clone() };
            if m.rect().overlaps(&player_box) {
                dead = true;
            }
            if m.y >= state.height {
                return None;
            }
            Some(m)
        })
        .collect();

    // ── 5. Screen transition — score is left as it stands on death ───────────
    let screen = if dead { Screen::GameOver } else { Screen::Playing };

    GameState {
        screen,
        player,
        coins,
        monsters,
        score,
        difficulty,
        frame,
        ..state.clone()
    }
}

fn step_player(player: &Player, field_w: i32) -> Player {
    let mut x = player.x;
    if player.moving_right {
        x += MOVE_STEP;
    }
    if player.moving_left {
        x -= MOVE_STEP;
    }
    Player {
        x: x.clamp(0, field_w - player.size.w),
        ..player.clone()
    }
}

/// One spawn constructor for both kinds: random column, just above the
/// visible field, random fall speed.
fn spawn_faller(kind: FallerKind, state: &GameState, rng: &mut impl Rng) -> Faller {
    let size = match kind {
        FallerKind::Coin => state.sprites.coin,
        FallerKind::Monster => state.sprites.monster,
    };
    Faller {
        kind,
        x: rng.gen_range(0..=state.width - size.w),
        y: -size.h,
        speed: rng.gen_range(FALL_SPEED_MIN..=FALL_SPEED_MAX),
        size,
    }
}

fn step_difficulty(difficulty: &Difficulty) -> Difficulty {
    let frames = difficulty.frames_since_ramp + 1;
    if frames >= RAMP_INTERVAL && difficulty.spawn_denominator > MONSTER_DENOM_FLOOR {
        Difficulty {
            frames_since_ramp: 0,
            spawn_denominator: (difficulty.spawn_denominator - RAMP_STEP)
                .max(MONSTER_DENOM_FLOOR),
        }
    } else {
        Difficulty {
            frames_since_ramp: frames,
            ..difficulty.clone()
        }
    }
}
