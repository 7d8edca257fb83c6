//! Sprite assets.
//!
//! Sprites are character-cell art read from `assets/` once at startup.
//! Each cell stands for a fixed block of field pixels, so a sprite's
//! collision box falls straight out of its art dimensions.  A missing or
//! empty art file is fatal — the game cannot lay anything out without the
//! sprite sizes.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::entities::{Size, SpriteSizes};

/// One terminal cell covers this many field pixels.
pub const CELL_W_PX: i32 = 8;
pub const CELL_H_PX: i32 = 20;

pub struct Sprite {
    /// Art rows, top to bottom, drawn verbatim.
    pub rows: Vec<String>,
    /// Intrinsic size in field pixels, derived from the art.
    pub size: Size,
}

impl Sprite {
    /// Parse character art into a sprite.  The width is the widest row.
    pub fn parse(art: &str) -> Result<Sprite> {
        let mut rows: Vec<String> = art.lines().map(str::to_string).collect();
        while rows.last().is_some_and(|r| r.trim().is_empty()) {
            rows.pop();
        }
        ensure!(!rows.is_empty(), "sprite art is empty");

        let cols = rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0) as i32;
        ensure!(cols > 0, "sprite art has no visible cells");

        Ok(Sprite {
            size: Size {
                w: cols * CELL_W_PX,
                h: rows.len() as i32 * CELL_H_PX,
            },
            rows,
        })
    }
}

/// The three sprites the game draws, loaded once at startup.
pub struct SpriteSet {
    pub player: Sprite,
    pub coin: Sprite,
    pub monster: Sprite,
}

impl SpriteSet {
    pub fn load(dir: &Path) -> Result<SpriteSet> {
        Ok(SpriteSet {
            player: load_sprite(dir, "robot.txt")?,
            coin: load_sprite(dir, "coin.txt")?,
            monster: load_sprite(dir, "monster.txt")?,
        })
    }

    /// Just the dimensions, for the core's layout and collision math.
    pub fn sizes(&self) -> SpriteSizes {
        SpriteSizes {
            player: self.player.size,
            coin: self.coin.size,
            monster: self.monster.size,
        }
    }
}

fn load_sprite(dir: &Path, name: &str) -> Result<Sprite> {
    let path = dir.join(name);
    let art = fs::read_to_string(&path)
        .with_context(|| format!("reading sprite {}", path.display()))?;
    Sprite::parse(&art).with_context(|| format!("parsing sprite {}", path.display()))
}
