use crate::Position;
use crate::canvas::{Canvas, Color, Rect};
use crate::config::GridConfig;
use Direction::*;

pub const INITIAL_SIZE: usize = 4;
pub const START: Position = Position { x: 20, y: 200 };

const BODY_COLOR: Color = Color::White;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub pos: Position,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Segment>,
    direction: Direction,
    grid: GridConfig,
}

impl Snake {
    /// Lays out `INITIAL_SIZE + 1` segments in a row heading right, head at the
    /// far end from `START` and the tail sitting on it.
    pub fn new(grid: GridConfig) -> Self {
        let direction = Right;
        let step = grid.cell_size;

        let body = (0..=INITIAL_SIZE as i32).rev()
            .map(|i| Position { x: START.x + step * i, y: START.y })
            .map(|pos| Segment { pos, direction })
            .collect();
        Snake { body, direction, grid }
    }

    #[cfg(test)]
    pub(crate) fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0].pos
    }

    pub fn tail(&self) -> Segment {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[cfg(test)]
    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Reversing straight into the neck is refused silently.
    pub fn set_direction(&mut self, new_direction: Direction) {
        match (&new_direction, &self.direction) {
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right) => {},
            _ => self.direction = new_direction,
        };
    }

    pub fn advance(&mut self) {
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }

        let step = self.grid.cell_size;
        let (dx, dy) = self.direction.delta();
        let head = &mut self.body[0];
        head.pos.x += dx * step;
        head.pos.y += dy * step;
        head.direction = self.direction;

        // Only one axis is corrected per step, in this order.
        let (max_x, max_y) = (self.grid.max_x(), self.grid.max_y());
        if head.pos.y < 0 {
            head.pos.y = max_y;
        } else if head.pos.y > max_y {
            head.pos.y = 0;
        } else if head.pos.x < 0 {
            head.pos.x = max_x;
        } else if head.pos.x > max_x {
            head.pos.x = 0;
        }
    }

    /// Appends one segment a cell behind the tail, on the side opposite to the
    /// current heading.
    pub fn grow(&mut self) {
        let tail = self.tail();
        let step = self.grid.cell_size;
        let (dx, dy) = self.direction.opposite().delta();
        let pos = Position { x: tail.pos.x + dx * step, y: tail.pos.y + dy * step };

        self.body.push(Segment { pos, direction: tail.direction });
    }

    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.body[1..].iter().any(|seg| seg.pos == head)
    }

    pub fn score(&self) -> i32 {
        (self.body.len() as i32 - INITIAL_SIZE as i32 - 1) * 10
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        let size = self.grid.cell_size;
        for seg in &self.body {
            canvas.fill_rect(Rect::new(seg.pos.x, seg.pos.y, size, size), BODY_COLOR);
        }
    }

    #[cfg(test)]
    pub(crate) fn with_body(grid: GridConfig, body: Vec<Segment>, direction: Direction) -> Self {
        Snake { body, direction, grid }
    }
}
