use crate::config::Direction;
use serde::{Deserialize, Serialize};

/// One sprite's position in the sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    /// Selector name: the basename of the source path.
    pub name: String,
    /// Cumulative extent along the layout axis of every earlier sprite.
    pub offset: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Top-left corner of this sprite within the sheet.
    pub fn position(&self, direction: Direction) -> (i64, i64) {
        match direction {
            Direction::Vertical => (0, self.offset),
            Direction::Horizontal => (self.offset, 0),
        }
    }

    /// CSS `background-position` pair (x, y) that reveals this sprite.
    pub fn background_position(&self, direction: Direction) -> (i64, i64) {
        let (x, y) = self.position(direction);
        (-x, -y)
    }
}

/// Layout of a whole sprite sheet: canvas size plus ordered placements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sheet {
    pub width: u32,
    pub height: u32,
    pub direction: Direction,
    pub placements: Vec<Placement>,
}

/// Coverage figures for a sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SheetStats {
    pub num_sprites: usize,
    pub width: u32,
    pub height: u32,
    /// `width * height` of the canvas.
    pub total_area: u64,
    /// Sum of sprite areas; sprites never overlap so this is the covered area.
    pub used_area: u64,
    /// `used_area / total_area` (0.0 to 1.0).
    pub occupancy: f64,
}

impl Sheet {
    /// Computes coverage statistics for this sheet.
    pub fn stats(&self) -> SheetStats {
        let total_area = (self.width as u64) * (self.height as u64);
        let used_area: u64 = self
            .placements
            .iter()
            .map(|p| (p.width as u64) * (p.height as u64))
            .sum();
        let occupancy = if total_area > 0 {
            used_area as f64 / total_area as f64
        } else {
            0.0
        };
        SheetStats {
            num_sprites: self.placements.len(),
            width: self.width,
            height: self.height,
            total_area,
            used_area,
            occupancy,
        }
    }
}

impl SheetStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sprites: {}, Size: {}x{}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_sprites,
            self.width,
            self.height,
            self.occupancy * 100.0,
            self.total_area,
            self.used_area,
        )
    }

    /// Transparent filler in pixels (cross-axis slack of narrower sprites).
    pub fn wasted_area(&self) -> u64 {
        self.total_area.saturating_sub(self.used_area)
    }
}
