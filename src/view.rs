use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::board::{HEIGHT, WIDTH};
use crate::game::{Game, GameStatus};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Tsify)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Read-only picture of a game for render sinks.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Tsify)]
pub struct FrameView {
    pub width: usize,
    pub height: usize,
    /// Row-major, 1 for a locked cell.
    pub field: Vec<u8>,
    /// Active piece cells inside the visible grid.
    pub active: Vec<Point>,
    pub score: u32,
    pub lines: u32,
    pub game_over: bool,
}

impl FrameView {
    pub fn capture(game: &Game) -> Self {
        let board = game.board();
        let field = board
            .rows()
            .iter()
            .flatten()
            .map(|c| c.is_filled() as u8)
            .collect();
        let active = game
            .active()
            .map(|piece| {
                piece
                    .cells()
                    .filter(|p| (0..HEIGHT as i32).contains(&p.y))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            width: WIDTH,
            height: HEIGHT,
            field,
            active,
            score: board.score(),
            lines: board.lines_cleared(),
            game_over: game.status() == GameStatus::GameOver,
        }
    }

    /// Plain-text rendering: `#` locked, `@` active, `.` empty.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let here = Point {
                    x: x as i32,
                    y: y as i32,
                };
                let ch = if self.active.contains(&here) {
                    '@'
                } else if self.field[y * self.width + x] != 0 {
                    '#'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
