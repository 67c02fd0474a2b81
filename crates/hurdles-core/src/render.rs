//! Per-frame occupancy grids handed to rendering sinks.
//!
//! Cell codes: 0 = empty, 1 = ground, 2 = agent, 3 = obstacle. Row 0 is the
//! ground line; world `y = 0` maps to row 1.

use crate::config::WorldConfig;
use crate::geometry::Rectangle;
use serde::{Deserialize, Serialize};

pub const EMPTY: u8 = 0;
pub const GROUND: u8 = 1;
pub const AGENT: u8 = 2;
pub const OBSTACLE: u8 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGrid {
    pub frame: u32,
    pub columns: usize,
    pub rows: usize,
    /// Row-major, bottom row first.
    pub cells: Vec<u8>,
}

impl FrameGrid {
    pub fn new(frame: u32, columns: usize, rows: usize) -> Self {
        let mut cells = vec![EMPTY; columns * rows];
        if rows > 0 {
            cells[..columns].fill(GROUND);
        }
        Self {
            frame,
            columns,
            rows,
            cells,
        }
    }

    /// Empty grid sized to the world extent plus the ground row.
    pub fn for_world(frame: u32, config: &WorldConfig) -> Self {
        let columns = (config.world_width / config.cell_size).ceil() as usize;
        let rows = (config.world_height / config.cell_size).ceil() as usize + 1;
        Self::new(frame, columns, rows)
    }

    pub fn get(&self, column: usize, row: usize) -> Option<u8> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// Fill every cell the rectangle touches with `code`, clipped to the grid.
    pub fn paint(&mut self, rect: &Rectangle, code: u8, cell_size: f64) {
        let Some((col_start, col_end)) =
            Self::cell_span(rect.left(), rect.right(), cell_size, 0, self.columns)
        else {
            return;
        };
        let Some((row_start, row_end)) =
            Self::cell_span(rect.bottom(), rect.top(), cell_size, 1, self.rows)
        else {
            return;
        };
        for row in row_start..=row_end {
            let base = row * self.columns;
            self.cells[base + col_start..=base + col_end].fill(code);
        }
    }

    /// Inclusive cell range covering `lo..=hi`, shifted by `offset` cells.
    fn cell_span(
        lo: f64,
        hi: f64,
        cell_size: f64,
        offset: usize,
        limit: usize,
    ) -> Option<(usize, usize)> {
        let first = (lo / cell_size).floor() + offset as f64;
        let last = (hi / cell_size).floor() + offset as f64;
        if limit == 0 || last < offset as f64 || first >= limit as f64 {
            return None;
        }
        let first = first.max(offset as f64) as usize;
        let last = (last as usize).min(limit - 1);
        (first <= last).then_some((first, last))
    }

    /// Text rendering, top row first.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in (0..self.rows).rev() {
            let base = row * self.columns;
            out.extend(self.cells[base..base + self.columns].iter().map(|&c| match c {
                GROUND => '_',
                AGENT => '|',
                OBSTACLE => '#',
                _ => ' ',
            }));
            out.push('\n');
        }
        out
    }
}
