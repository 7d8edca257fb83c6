use std::path::Path;

use coin_rain::assets::{Sprite, SpriteSet, CELL_H_PX, CELL_W_PX};

// ── Parsing ───────────────────────────────────────────────────────────────────

#[test]
fn parse_derives_size_from_art() {
    let s = Sprite::parse("██\n██\n██\n").unwrap();
    assert_eq!(s.size.w, 2 * CELL_W_PX);
    assert_eq!(s.size.h, 3 * CELL_H_PX);
    assert_eq!(s.rows.len(), 3);
}

#[test]
fn parse_widest_row_wins() {
    let s = Sprite::parse("█\n███\n██\n").unwrap();
    assert_eq!(s.size.w, 3 * CELL_W_PX);
}

#[test]
fn parse_counts_unicode_cells_not_bytes() {
    // Block glyphs are multi-byte; width must come from character count
    let s = Sprite::parse("▐███▌\n").unwrap();
    assert_eq!(s.size.w, 5 * CELL_W_PX);
}

#[test]
fn parse_trims_trailing_blank_lines() {
    let s = Sprite::parse("██\n\n\n").unwrap();
    assert_eq!(s.size.h, CELL_H_PX);
}

#[test]
fn parse_rejects_empty_art() {
    assert!(Sprite::parse("").is_err());
    assert!(Sprite::parse("\n\n").is_err());
    assert!(Sprite::parse("   \n  \n").is_err());
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[test]
fn load_fails_on_missing_directory() {
    assert!(SpriteSet::load(Path::new("no/such/dir")).is_err());
}

#[test]
fn bundled_assets_load() {
    // Integration tests run from the package root, where assets/ lives
    let set = SpriteSet::load(Path::new("assets")).unwrap();
    let sizes = set.sizes();
    for size in [sizes.player, sizes.coin, sizes.monster] {
        assert!(size.w > 0 && size.h > 0);
        assert_eq!(size.w % CELL_W_PX, 0);
        assert_eq!(size.h % CELL_H_PX, 0);
    }
}
