use std::ops::RangeInclusive;

/// Straight-alpha color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Translucent white.
    pub const SNOW: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 0.8,
    };

    pub fn from_array([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Something the snow field can paint on. Owned by exactly one animation.
pub trait Surface: Send {
    /// Matches the backing store to the viewport, in pixels.
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);

    /// Called once per frame after all circles are drawn.
    fn present(&mut self) {}
}

/// Rasterizes flakes onto a grid of characters, one cell per `cell_w x cell_h`
/// pixels. Good enough for a terminal and for headless checks.
pub struct CharSurface {
    cell_w: f32,
    cell_h: f32,
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl CharSurface {
    pub fn new(width: u32, height: u32, cell_w: f32, cell_h: f32) -> Self {
        let mut surface = Self {
            cell_w: cell_w.max(1.0),
            cell_h: cell_h.max(1.0),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        surface.resize(width, height);
        surface
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c != ' ').count()
    }

    pub fn render(&self) -> String {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn glyph(radius: f32) -> char {
        match radius {
            r if r < 2.0 => '.',
            r if r < 3.0 => '*',
            _ => '❄',
        }
    }

    fn glyph_rank(glyph: char) -> u8 {
        match glyph {
            '.' => 1,
            '*' => 2,
            '❄' => 3,
            _ => 0,
        }
    }
}

impl Surface for CharSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.cols = (width as f32 / self.cell_w).ceil() as usize;
        self.rows = (height as f32 / self.cell_h).ceil() as usize;
        self.cells = vec![' '; self.cols * self.rows];
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = ' ');
    }

    /// Lights every cell the circle overlaps, including partly visible flakes.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        if color.a <= 0.0 || !x.is_finite() || !y.is_finite() {
            return;
        }
        let radius = radius.max(0.0);
        let (Some(cols), Some(rows)) = (
            cell_span(x, radius, self.cell_w, self.cols),
            cell_span(y, radius, self.cell_h, self.rows),
        ) else {
            return;
        };

        let glyph = Self::glyph(radius);
        for row in rows {
            for col in cols.clone() {
                let near_x = x.clamp(col as f32 * self.cell_w, (col + 1) as f32 * self.cell_w);
                let near_y = y.clamp(row as f32 * self.cell_h, (row + 1) as f32 * self.cell_h);
                if (near_x - x).powi(2) + (near_y - y).powi(2) > radius * radius {
                    continue;
                }
                let cell = &mut self.cells[row * self.cols + col];
                // Bigger flakes win when they share a cell.
                if *cell == ' ' || Self::glyph_rank(glyph) > Self::glyph_rank(*cell) {
                    *cell = glyph;
                }
            }
        }
    }
}

/// Cells along one axis touched by `centre ± radius`, clipped to the grid.
fn cell_span(centre: f32, radius: f32, cell: f32, count: usize) -> Option<RangeInclusive<usize>> {
    let first = ((centre - radius) / cell).floor();
    let last = ((centre + radius) / cell).floor();
    if count == 0 || last < 0.0 || first >= count as f32 {
        return None;
    }
    Some(first.max(0.0) as usize..=(last as usize).min(count - 1))
}
