//! Text rendering of grids

use crate::course::Course;
use crate::grid::Grid;
use std::fmt;

/// Render a grid as marker characters, one `\n`-terminated line per row
pub fn render(grid: &Grid) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() {
        if let Some(row) = grid.row(y) {
            out.extend(row.iter().map(|kind| kind.marker()));
        }
        out.push('\n');
    }
    out
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.grid(), f)
    }
}
