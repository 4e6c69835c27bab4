use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::canvas::{Canvas, Color, Rect};
use crate::config::GameConfig;
use crate::input::{Input, InputLatch};
use crate::mouse::Mouse;
use crate::snake::Snake;

const BIG_FONT: u16 = 36;
const SMALL_FONT: u16 = 24;

const SCORE_TEXT_AT: (i32, i32) = (30, 385);
const SCORE_BAR: Rect = Rect::new(5, 350, 590, 5);
const GAME_OVER_AT: (i32, i32) = (215, 150);
const RETRY_AT: (i32, i32) = (205, 180);

const GAME_OVER_TEXT: &str = "game over";
const RETRY_TEXT: &str = "Press  r  to  Retry";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Over,
}

pub struct SnakeGame<R = StdRng> {
    config: GameConfig,
    snake: Snake,
    mouse: Mouse,
    state: GameState,
    rng: R,
}

impl SnakeGame<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        SnakeGame::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> SnakeGame<R> {
    pub fn with_rng(config: GameConfig, mut rng: R) -> Self {
        let snake = Snake::new(config.grid);
        let mouse = Mouse::new(config.grid, &mut rng);
        SnakeGame { config, snake, mouse, state: GameState::Running, rng }
    }

    /// One fixed-period step: apply the latched key, then either move and
    /// resolve collisions or wait for a retry, then draw the whole frame.
    pub fn tick(&mut self, latch: &InputLatch, canvas: &mut impl Canvas) {
        let input = latch.latest();

        if let Some(dir) = input.and_then(Input::direction) {
            self.snake.set_direction(dir);
        }

        match self.state {
            GameState::Over => {
                if input == Some(Input::Retry) {
                    self.restart(latch);
                }
            }
            GameState::Running => {
                self.snake.advance();
                self.check_collisions();
            }
        }

        self.draw(canvas);
    }

    ///////////////////////////////////////////////////////////////////////////

    fn restart(&mut self, latch: &InputLatch) {
        info!("retrying after scoring {}", self.snake.score());
        self.state = GameState::Running;
        self.snake = Snake::new(self.config.grid);
        latch.reset();
    }

    fn check_collisions(&mut self) {
        if self.snake.head() == self.mouse.pos() {
            self.snake.grow();
            self.mouse.respawn(&mut self.rng);
            debug!("ate the mouse, length now {}", self.snake.len());
        }

        if self.snake.collides_with_self() {
            info!("game over with score {}", self.snake.score());
            self.state = GameState::Over;
        }
    }

    fn draw(&self, canvas: &mut impl Canvas) {
        let vp = self.config.viewport;
        canvas.fill_rect(Rect::new(0, 0, vp.width, vp.height), Color::Black);

        self.draw_score(canvas);
        self.snake.render(canvas);
        self.mouse.render(canvas);

        if self.state == GameState::Over {
            let (x, y) = GAME_OVER_AT;
            canvas.fill_text(GAME_OVER_TEXT, x, y, BIG_FONT, Color::White);
            let (x, y) = RETRY_AT;
            canvas.fill_text(RETRY_TEXT, x, y, SMALL_FONT, Color::White);
        }
    }

    fn draw_score(&self, canvas: &mut impl Canvas) {
        let (x, y) = SCORE_TEXT_AT;
        canvas.fill_text(&self.snake.score().to_string(), x, y, BIG_FONT, Color::White);
        canvas.fill_rect(SCORE_BAR, Color::White);
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub(crate) fn mouse(&self) -> &Mouse {
        &self.mouse
    }

    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut Snake, &mut Mouse) {
        (&mut self.snake, &mut self.mouse)
    }
}
