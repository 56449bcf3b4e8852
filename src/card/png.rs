use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::stats::StatsSnapshot;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 460;

const BACKGROUND: RGBColor = RGBColor(17, 24, 39);
const TILE_FILL: RGBColor = RGBColor(31, 41, 55);
const PURPLE: RGBColor = RGBColor(168, 85, 247);
const BLUE: RGBColor = RGBColor(96, 165, 250);
const CYAN: RGBColor = RGBColor(34, 211, 238);
const GREY: RGBColor = RGBColor(156, 163, 175);

#[derive(Debug, Error)]
pub enum CardError {
    #[error("Failed to render card image: {0}")]
    Draw(String),
}

struct Tile {
    label: &'static str,
    value: String,
    caption: String,
    accent: RGBColor,
    /// Progress bar fill, 0–100.
    percent: u32,
}

/// Rasterize the stat card to a PNG file.
///
/// Fixed layout on a dark background: username header, three metric
/// tiles with proportional progress bars, generation-date footer.
pub fn export_png(snapshot: &StatsSnapshot, path: &Path) -> Result<(), CardError> {
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    draw_card(snapshot, &root).map_err(|e| CardError::Draw(e.to_string()))?;
    root.present().map_err(|e| CardError::Draw(e.to_string()))?;
    Ok(())
}

fn draw_card(
    snapshot: &StatsSnapshot,
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
) -> Result<(), Box<dyn std::error::Error>> {
    root.fill(&BACKGROUND)?;

    // Header
    root.draw(&Text::new(
        snapshot.username.clone(),
        (40, 40),
        ("sans-serif", 42).into_font().color(&WHITE),
    ))?;
    root.draw(&Text::new(
        "GitHub Developer",
        (40, 92),
        ("sans-serif", 18).into_font().color(&GREY),
    ))?;

    let pr = &snapshot.pr_stats;
    let commits = &snapshot.commit_stats;
    let org = &snapshot.org_stats;
    let tiles = [
        Tile {
            label: "Pull Requests",
            value: format!("{}", pr.total_prs),
            caption: format!("{} merged • {} open", pr.merged_prs, pr.open_prs),
            accent: PURPLE,
            percent: percent_of(pr.total_prs * 10),
        },
        Tile {
            label: "Commits",
            value: format!("{}+", commits.total),
            caption: "in top repositories".to_string(),
            accent: BLUE,
            percent: percent_of(commits.total as u64),
        },
        Tile {
            label: "Open Source",
            value: format!("{}", org.total_prs),
            caption: format!("across {} orgs", org.org_count),
            accent: CYAN,
            percent: percent_of(org.total_prs as u64 * 10),
        },
    ];

    let tile_width: i32 = 260;
    let tile_height: i32 = 220;
    let top: i32 = 130;
    for (i, tile) in tiles.iter().enumerate() {
        let left = 40 + i as i32 * (tile_width + 20);
        draw_tile(root, tile, left, top, tile_width, tile_height)?;
    }

    // Footer
    root.draw(&Text::new(
        format!("Generated on {}", snapshot.generated_at.format("%d/%m/%Y")),
        (40, HEIGHT as i32 - 60),
        ("sans-serif", 16).into_font().color(&GREY),
    ))?;
    root.draw(&Text::new(
        format!("github.com/{}", snapshot.username),
        (WIDTH as i32 - 280, HEIGHT as i32 - 60),
        ("sans-serif", 16).into_font().color(&GREY),
    ))?;

    Ok(())
}

fn draw_tile(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    tile: &Tile,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    root.draw(&Rectangle::new(
        [(left, top), (left + width, top + height)],
        TILE_FILL.filled(),
    ))?;
    root.draw(&Rectangle::new(
        [(left, top), (left + width, top + height)],
        tile.accent.mix(0.6).stroke_width(1),
    ))?;

    root.draw(&Text::new(
        tile.label,
        (left + 20, top + 24),
        ("sans-serif", 20).into_font().color(&tile.accent),
    ))?;
    root.draw(&Text::new(
        tile.value.clone(),
        (left + 20, top + 60),
        ("sans-serif", 48).into_font().color(&WHITE),
    ))?;
    root.draw(&Text::new(
        tile.caption.clone(),
        (left + 20, top + 124),
        ("sans-serif", 15).into_font().color(&GREY),
    ))?;

    // Progress bar: track, then proportional fill.
    let bar_top = top + height - 40;
    let bar_bottom = bar_top + 8;
    root.draw(&Rectangle::new(
        [(left + 20, bar_top), (left + width - 20, bar_bottom)],
        GREY.mix(0.25).filled(),
    ))?;
    let track = (width - 40) as u32;
    let fill = (track * tile.percent / 100) as i32;
    if fill > 0 {
        root.draw(&Rectangle::new(
            [(left + 20, bar_top), (left + 20 + fill, bar_bottom)],
            tile.accent.filled(),
        ))?;
    }

    Ok(())
}

/// Clamp a raw progress value to the 0–100 bar range.
fn percent_of(value: u64) -> u32 {
    value.min(100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(percent_of(0), 0);
        assert_eq!(percent_of(40), 40);
        assert_eq!(percent_of(1_000), 100);
    }
}
