mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;

use coin_rain::assets::SpriteSet;
use coin_rain::compute::{init_state, key_down, key_up, tick, FIELD_H, FIELD_W};
use coin_rain::entities::{GameState, Key, Screen};

const FRAME: Duration = Duration::from_micros(16_667); // 60 ticks/second

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs every screen of the game until the user quits.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the held state of the
/// arrow keys is compared against the previous frame, and the edges are
/// dispatched to the core as key-down / key-up transitions — so the core
/// sees clean discrete events on both classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames
///   of silence, which is shorter than the OS repeat interval, so the key
///   stays live while it is actively generating repeats.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    sprites: &SpriteSet,
) -> std::io::Result<()> {
    let mut rng = thread_rng();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut was_left = false;
    let mut was_right = false;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(());
                        }
                        KeyCode::Enter => {
                            let was_playing = state.screen == Screen::Playing;
                            *state = key_down(state, Key::Enter);
                            if !was_playing && state.screen == Screen::Playing {
                                tracing::info!("run started");
                            }
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Turn held-key edges into key-down / key-up transitions ────────────
        let left = is_held(&key_frame, &KeyCode::Left, frame);
        let right = is_held(&key_frame, &KeyCode::Right, frame);
        if left != was_left {
            *state = if left {
                key_down(state, Key::Left)
            } else {
                key_up(state, Key::Left)
            };
            was_left = left;
        }
        if right != was_right {
            *state = if right {
                key_down(state, Key::Right)
            } else {
                key_up(state, Key::Right)
            };
            was_right = right;
        }

        // ── Simulate — only the Playing screen ticks ──────────────────────────
        if state.screen == Screen::Playing {
            *state = tick(state, &mut rng);
            if state.screen == Screen::GameOver {
                tracing::info!(score = state.score, "run over");
            }
        }

        display::render(out, state, sprites)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Sprites must load before anything else — layout and collision need
    // their dimensions.
    let sprites = SpriteSet::load(Path::new("assets")).context("loading sprite assets")?;
    let sizes = sprites.sizes();
    tracing::info!(
        player = ?sizes.player,
        coin = ?sizes.coin,
        monster = ?sizes.monster,
        "sprites loaded"
    );

    let (cols, rows) = terminal::size().context("querying terminal size")?;
    ensure!(
        cols >= display::GRID_W && rows >= display::GRID_H,
        "terminal too small: the field needs {}x{} cells, have {}x{}",
        display::GRID_W,
        display::GRID_H,
        cols,
        rows,
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle("A rain of coins"))?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the
    // hold-window expiry in the game loop.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut state = init_state(FIELD_W, FIELD_H, sizes);
    let result = game_loop(&mut out, &mut state, &rx, &sprites);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    tracing::info!("shutdown");
    result?;
    Ok(())
}

/// Logging would land on the alternate screen, so it goes to a file
/// instead, and only when `RUST_LOG` asks for it.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Ok(file) = std::fs::File::create("coin_rain.log") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
