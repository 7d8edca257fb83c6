//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.
//!
//! The simulation runs on a 640×480 pixel field; drawing projects that
//! field onto an 80×24 cell grid at a fixed pixels-per-cell metric shared
//! with the sprite loader.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use coin_rain::assets::{Sprite, SpriteSet, CELL_H_PX, CELL_W_PX};
use coin_rain::compute::{FIELD_H, FIELD_W};
use coin_rain::entities::{GameState, Screen};

/// Cell grid the field projects onto; the terminal must be at least this big.
pub const GRID_W: u16 = (FIELD_W / CELL_W_PX) as u16;
pub const GRID_H: u16 = (FIELD_H / CELL_H_PX) as u16;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::White;
const C_COIN: Color = Color::Yellow;
const C_MONSTER: Color = Color::Red;
const C_SCORE: Color = Color::Yellow;
const C_TEXT: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_GAME_OVER: Color = Color::Red;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for whichever screen is active.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    sprites: &SpriteSet,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.screen {
        Screen::Title => draw_title(out, sprites)?,
        Screen::Playing => draw_playing(out, state, sprites)?,
        Screen::GameOver => draw_game_over(out, state)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, GRID_H.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Title screen ──────────────────────────────────────────────────────────────

fn draw_title<W: Write>(out: &mut W, sprites: &SpriteSet) -> std::io::Result<()> {
    draw_centered_text(out, "Collect coins, avoid monsters!", 200, C_TEXT)?;
    draw_centered_text(out, "L + R arrow keys to move", 240, C_TEXT)?;
    draw_centered_text(out, "Press ENTER to begin", 280, C_HINT)?;

    // Decorative cast, at the same field positions as the original art
    draw_sprite(out, &sprites.coin, 200, 100, C_COIN)?;
    draw_sprite(out, &sprites.monster, 400, 80, C_MONSTER)?;
    draw_sprite(out, &sprites.player, 295, 394, C_PLAYER)?;

    Ok(())
}

// ── Playing screen ────────────────────────────────────────────────────────────

fn draw_playing<W: Write>(
    out: &mut W,
    state: &GameState,
    sprites: &SpriteSet,
) -> std::io::Result<()> {
    for coin in &state.coins {
        draw_sprite(out, &sprites.coin, coin.x, coin.y, C_COIN)?;
    }
    for monster in &state.monsters {
        draw_sprite(out, &sprites.monster, monster.x, monster.y, C_MONSTER)?;
    }
    draw_sprite(out, &sprites.player, state.player.x, state.player.y, C_PLAYER)?;

    draw_score(out, state)
}

/// Score, right-aligned on the top row.
fn draw_score<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let text = format!("Score: {}", state.score);
    let col = GRID_W.saturating_sub(text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(&text))?;
    Ok(())
}

// ── Game-over screen ──────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let over = format!("Game over! Score: {}", state.score);
    draw_centered_text(out, &over, 200, C_GAME_OVER)?;
    draw_centered_text(out, "Press ENTER to retry", 280, C_TEXT)?;
    Ok(())
}

// ── Drawing primitives ────────────────────────────────────────────────────────

/// Blit a sprite with its top-left corner at a field-pixel position.
/// Rows projected above or below the grid are clipped — fallers spawn
/// above the visible field and slide in.
fn draw_sprite<W: Write>(
    out: &mut W,
    sprite: &Sprite,
    x: i32,
    y: i32,
    color: Color,
) -> std::io::Result<()> {
    let col = x.div_euclid(CELL_W_PX);
    let row = y.div_euclid(CELL_H_PX);
    if col < 0 {
        return Ok(());
    }

    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in sprite.rows.iter().enumerate() {
        let r = row + i as i32;
        if r < 0 || r >= GRID_H as i32 {
            continue;
        }
        out.queue(cursor::MoveTo(col as u16, r as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

/// Draw a line of text horizontally centered on the field, at a field-pixel
/// row.
fn draw_centered_text<W: Write>(
    out: &mut W,
    text: &str,
    y: i32,
    color: Color,
) -> std::io::Result<()> {
    let row = (y / CELL_H_PX) as u16;
    let col = (GRID_W / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}
