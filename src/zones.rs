//! Coarse activity grid laid over the screen.
//!
//! Cell coordinates are derived by proportional scaling, so the grid keeps
//! [`GRID_SIZE`] cells per axis whatever the panel resolution is.

use core::fmt::Write as _;

use super::types::ScreenSize;

pub const GRID_SIZE: usize = 20;
/// Window in which repeated hits on one cell count as a burst.
pub const ACTIVATION_WINDOW_MS: u64 = 100;
/// One row is `GRID_SIZE` "c " pairs plus a newline.
pub const ZONE_MAP_LEN: usize = GRID_SIZE * (2 * GRID_SIZE + 1);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneCell {
    pub active: bool,
    pub activation_ms: u64,
    pub last_touch_ms: u64,
    pub touch_count: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneCoord {
    pub x: usize,
    pub y: usize,
}

impl ZoneCoord {
    pub fn of(screen: ScreenSize, x: i16, y: i16) -> Option<Self> {
        if screen.width == 0 || screen.height == 0 || x < 0 || y < 0 {
            return None;
        }
        let zx = (x as u32 * GRID_SIZE as u32 / u32::from(screen.width)) as usize;
        let zy = (y as u32 * GRID_SIZE as u32 / u32::from(screen.height)) as usize;
        (zx < GRID_SIZE && zy < GRID_SIZE).then_some(Self { x: zx, y: zy })
    }
}

#[derive(Clone, Debug)]
pub struct ZoneGrid {
    cells: [[ZoneCell; GRID_SIZE]; GRID_SIZE],
}

impl Default for ZoneGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneGrid {
    pub const fn new() -> Self {
        Self {
            cells: [[ZoneCell {
                active: false,
                activation_ms: 0,
                last_touch_ms: 0,
                touch_count: 0,
            }; GRID_SIZE]; GRID_SIZE],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn cell(&self, coord: ZoneCoord) -> Option<&ZoneCell> {
        self.cells.get(coord.x).and_then(|column| column.get(coord.y))
    }

    /// Records a hit. The burst counter restarts whenever the previous burst
    /// window has closed.
    pub fn mark(&mut self, coord: ZoneCoord, now_ms: u64) {
        let Some(cell) = self
            .cells
            .get_mut(coord.x)
            .and_then(|column| column.get_mut(coord.y))
        else {
            return;
        };
        let in_window =
            cell.active && now_ms.saturating_sub(cell.activation_ms) < ACTIVATION_WINDOW_MS;
        if in_window {
            cell.touch_count = cell.touch_count.saturating_add(1);
        } else {
            cell.activation_ms = now_ms;
            cell.touch_count = 1;
        }
        cell.active = true;
        cell.last_touch_ms = now_ms;
    }

    /// Deactivates cells idle for longer than `timeout_ms`. Returns how many
    /// cells were cleared.
    pub fn sweep(&mut self, now_ms: u64, timeout_ms: u64) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().flatten() {
            if cell.active && now_ms.saturating_sub(cell.last_touch_ms) > timeout_ms {
                cell.active = false;
                cell.touch_count = 0;
                cleared += 1;
            }
        }
        cleared
    }

    pub fn active_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.active).count()
    }

    /// Active cells around `coord` (centre excluded) touched within `timeout_ms`.
    pub fn active_neighbors(&self, coord: ZoneCoord, now_ms: u64, timeout_ms: u64) -> u8 {
        let mut count = 0u8;
        for dx in -1isize..=1 {
            for dy in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (Some(nx), Some(ny)) = (
                    coord.x.checked_add_signed(dx),
                    coord.y.checked_add_signed(dy),
                ) else {
                    continue;
                };
                let Some(cell) = self.cell(ZoneCoord { x: nx, y: ny }) else {
                    continue;
                };
                if cell.active && now_ms.saturating_sub(cell.last_touch_ms) < timeout_ms {
                    count += 1;
                }
            }
        }
        count
    }

    /// Renders the grid row by row: `.` for an idle cell, the burst count for
    /// an active one (`+` once it exceeds 9).
    pub fn render(&self) -> heapless::String<ZONE_MAP_LEN> {
        let mut out = heapless::String::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let cell = &self.cells[x][y];
                let mark = if !cell.active {
                    '.'
                } else if cell.touch_count > 9 {
                    '+'
                } else {
                    char::from(b'0' + cell.touch_count)
                };
                let _ = write!(out, "{mark} ");
            }
            let _ = out.push('\n');
        }
        out
    }
}
