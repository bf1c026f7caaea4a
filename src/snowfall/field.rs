//! Falling-snow particle field.
//!
//! Flakes never die: a flake leaving the bottom edge is moved back to the top
//! at a fresh horizontal position and keeps its radius and density, so the mix
//! of flake sizes stays stable for the whole run.

use super::surface::{Rgba, Surface};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const RADIUS_RANGE: std::ops::Range<f32> = 1.0..4.0;
pub const DENSITY_RANGE: std::ops::Range<f32> = 0.0..50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub density: f32,
}

impl Snowflake {
    pub fn random(rng: &mut impl Rng, viewport: Viewport) -> Self {
        Self {
            x: random_in(rng, viewport.width),
            y: random_in(rng, viewport.height),
            radius: rng.random_range(RADIUS_RANGE),
            density: rng.random_range(DENSITY_RANGE),
        }
    }

    /// Denser flakes fall faster, with diminishing returns.
    pub fn fall_speed(&self) -> f32 {
        self.density.sqrt() * 0.1 + 0.5
    }

    /// Sway depends only on height, so flakes need no phase of their own.
    pub fn sway(y: f32) -> f32 {
        (y * 0.01).sin() * 0.5
    }

    fn advance(&mut self) {
        self.y += self.fall_speed();
        self.x += Self::sway(self.y);
    }
}

// `random_range` panics on an empty range, and a zero-sized viewport is legal.
fn random_in(rng: &mut impl Rng, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}

pub struct SnowField {
    flakes: Vec<Snowflake>,
    viewport: Viewport,
    fill: Rgba,
    rng: StdRng,
}

impl SnowField {
    pub fn new(viewport: Viewport, count: usize) -> Self {
        Self::with_rng(viewport, count, StdRng::from_os_rng())
    }

    pub fn seeded(viewport: Viewport, count: usize, seed: u64) -> Self {
        Self::with_rng(viewport, count, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(viewport: Viewport, count: usize, mut rng: StdRng) -> Self {
        let flakes = (0..count)
            .map(|_| Snowflake::random(&mut rng, viewport))
            .collect();
        Self {
            flakes,
            viewport,
            fill: Rgba::SNOW,
            rng,
        }
    }

    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Existing flakes keep their positions; only new spawns use the new size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear();
        for flake in &self.flakes {
            surface.fill_circle(flake.x, flake.y, flake.radius, self.fill);
        }
    }

    /// Advances every flake one frame and recycles the ones that fell out.
    pub fn step(&mut self) {
        let Viewport { width, height } = self.viewport;
        for flake in &mut self.flakes {
            flake.advance();
            if flake.y > height {
                flake.x = random_in(&mut self.rng, width);
                flake.y = 0.0;
            }
        }
    }

    /// One animation frame: draw the current positions, then move on.
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        self.draw(surface);
        self.step();
    }
}
