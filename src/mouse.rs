use crate::Position;
use crate::canvas::{Canvas, Color, Rect};
use crate::config::GridConfig;

use log::debug;
use rand::Rng;

const MOUSE_COLOR: Color = Color::Red;

/// The target. It may land on the snake, nothing is excluded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mouse {
    pos: Position,
    grid: GridConfig,
}

impl Mouse {
    pub fn new(grid: GridConfig, rng: &mut impl Rng) -> Self {
        let mut mouse = Mouse { pos: Position { x: 0, y: 0 }, grid };
        mouse.respawn(rng);
        mouse
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn respawn(&mut self, rng: &mut impl Rng) {
        let size = self.grid.cell_size;

        let x = rng.gen_range(0..=self.grid.max_x());
        let y = rng.gen_range(0..=self.grid.max_y());
        self.pos = Position { x: x - x % size, y: y - y % size };

        debug!("mouse respawned at ({}, {})", self.pos.x, self.pos.y);
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        let size = self.grid.cell_size;
        canvas.fill_rect(Rect::new(self.pos.x, self.pos.y, size, size), MOUSE_COLOR);
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, pos: Position) {
        self.pos = pos;
    }
}
