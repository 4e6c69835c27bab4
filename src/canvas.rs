/// The few colours the game paints with. Backends map them to whatever they draw on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    Red,
}

/// An axis-aligned rectangle in logic units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }
}

/// Draw sink for a single frame. The game never talks to a screen directly,
/// it only submits filled rectangles and text through this.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// `(x, y)` is the text baseline origin, as on a 2D canvas.
    fn fill_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color);
}
