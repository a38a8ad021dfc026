use serde::{Deserialize, Serialize};

use crate::board::{Board, WIDTH};
use crate::input::Intent;
use crate::randomizer::{Randomizer, randomizer_from_kind};
use crate::settings::{GameOverPolicy, GameSettings};
use crate::shape::{Shape, Tetromino};
use crate::view::{FrameView, Point};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Notifications for score displays and game-over sinks.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PieceLocked { piece: Tetromino },
    LinesCleared { lines: u32 },
    ScoreChanged { score: u32 },
    GameOver { final_score: u32 },
    Restarted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Fell,
    Locked { lines_cleared: u32 },
    /// The piece locked and the next spawn overlapped the stack.
    ToppedOut,
    /// Nothing to do: the game is halted.
    Idle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivePiece {
    pub piece: Tetromino,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Centered horizontally on the top row.
    fn spawn(piece: Tetromino) -> Self {
        let shape = piece.shape();
        let x = (WIDTH / 2) as i32 - (shape.width() / 2) as i32;
        Self { piece, shape, x, y: 0 }
    }

    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.shape.cells().map(|(dx, dy)| Point {
            x: self.x + dx,
            y: self.y + dy,
        })
    }
}

/// Drives one game: owns the board, the falling piece and the piece source.
pub struct Game {
    board: Board,
    active: Option<ActivePiece>,
    status: GameStatus,
    policy: GameOverPolicy,
    randomizer: Box<dyn Randomizer>,
    tick_ms: u32,
    fall_accum: u32,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(settings: &GameSettings) -> Self {
        let randomizer = randomizer_from_kind(settings.randomizer.clone());
        Self::with_randomizer(settings, randomizer)
    }

    pub fn with_randomizer(settings: &GameSettings, randomizer: Box<dyn Randomizer>) -> Self {
        Self::with_board(settings, randomizer, Board::new())
    }

    /// Starts from a prepared board; the first piece spawns against it.
    pub fn with_board(
        settings: &GameSettings,
        randomizer: Box<dyn Randomizer>,
        board: Board,
    ) -> Self {
        let mut game = Self {
            board,
            active: None,
            status: GameStatus::Playing,
            policy: settings.game_over,
            randomizer,
            tick_ms: settings.tick_ms.max(1),
            fall_accum: 0,
            events: Vec::new(),
        };
        game.spawn();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Test and tooling access to the board; gameplay goes through the controller.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replaces the active piece. Returns false (and changes nothing) if the
    /// placement collides.
    pub fn place_active(&mut self, piece: Tetromino, shape: Shape, x: i32, y: i32) -> bool {
        if !self.board.is_valid_placement(&shape, x, y) {
            return false;
        }
        self.active = Some(ActivePiece { piece, shape, x, y });
        true
    }

    /// Draws the next piece. Returns false when the spawn position is blocked,
    /// after the game-over handling for the configured policy has run.
    pub fn spawn(&mut self) -> bool {
        let next = ActivePiece::spawn(self.randomizer.next());
        if self.board.is_valid_placement(&next.shape, next.x, next.y) {
            log::debug!("spawned {:?} at x={}", next.piece, next.x);
            self.active = Some(next);
            return true;
        }
        self.game_over();
        false
    }

    fn game_over(&mut self) {
        let final_score = self.board.score();
        log::info!("game over, final score {}", final_score);
        self.events.push(GameEvent::GameOver { final_score });
        self.active = None;
        self.status = GameStatus::GameOver;
        if self.policy == GameOverPolicy::AutoRestart {
            self.restart();
        }
    }

    /// Clears the board and score and spawns a fresh piece.
    pub fn restart(&mut self) {
        self.board.reset();
        self.status = GameStatus::Playing;
        self.fall_accum = 0;
        self.events.push(GameEvent::Restarted);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        // every template fits on an empty board
        self.spawn();
    }

    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !self
            .board
            .is_valid_placement(&active.shape, active.x + dx, active.y + dy)
        {
            return false;
        }
        active.x += dx;
        active.y += dy;
        true
    }

    /// Clockwise rotation in place. No kicks: a blocked rotation is dropped.
    pub fn rotate(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let rotated = active.shape.rotate_cw();
        if !self.board.is_valid_placement(&rotated, active.x, active.y) {
            return false;
        }
        active.shape = rotated;
        true
    }

    /// Drops the piece to its lowest legal row and returns the rows travelled.
    /// Locking happens on the next tick.
    pub fn hard_drop(&mut self) -> u32 {
        let mut rows = 0;
        while self.try_move(0, 1) {
            rows += 1;
        }
        rows
    }

    /// One gravity step: fall by a row, or lock, clear and spawn the next piece.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Playing {
            return TickOutcome::Idle;
        }
        if self.try_move(0, 1) {
            return TickOutcome::Fell;
        }
        let Some(active) = self.active.take() else {
            return if self.spawn() {
                TickOutcome::Fell
            } else {
                TickOutcome::ToppedOut
            };
        };
        self.board.merge(&active.shape, active.x, active.y);
        self.events.push(GameEvent::PieceLocked {
            piece: active.piece,
        });
        let lines = self.board.clear_full_lines() as u32;
        if lines > 0 {
            self.board.credit_lines(lines as usize);
            log::debug!("cleared {} lines, score {}", lines, self.board.score());
            self.events.push(GameEvent::LinesCleared { lines });
            self.events.push(GameEvent::ScoreChanged {
                score: self.board.score(),
            });
        }
        if self.spawn() {
            TickOutcome::Locked {
                lines_cleared: lines,
            }
        } else {
            TickOutcome::ToppedOut
        }
    }

    /// Soft drop is a gravity tick, so it locks a piece that can no longer fall.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::MoveLeft => self.try_move(-1, 0),
            Intent::MoveRight => self.try_move(1, 0),
            Intent::SoftDrop => !matches!(self.tick(), TickOutcome::Idle),
            Intent::Rotate => self.rotate(),
            Intent::HardDrop => self.hard_drop() > 0,
        }
    }

    /// Feeds elapsed wall time into the gravity clock, ticking once per period.
    /// At most one period is credited per call, so a long stall (a hidden tab,
    /// a suspended host) costs one step rather than replaying the gap.
    pub fn advance(&mut self, dt_ms: u32) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        if self.status != GameStatus::Playing {
            return outcomes;
        }
        self.fall_accum = self.fall_accum.saturating_add(dt_ms.min(self.tick_ms));
        while self.fall_accum >= self.tick_ms {
            self.fall_accum -= self.tick_ms;
            let outcome = self.tick();
            outcomes.push(outcome);
            if matches!(outcome, TickOutcome::ToppedOut | TickOutcome::Idle) {
                self.fall_accum = 0;
                break;
            }
        }
        outcomes
    }

    pub fn snapshot(&self) -> FrameView {
        FrameView::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, HEIGHT};
    use crate::randomizer::Sequence;

    fn game_with(pieces: Vec<Tetromino>) -> Game {
        Game::with_randomizer(&GameSettings::default(), Box::new(Sequence::new(pieces)))
    }

    #[test]
    fn spawn_centers_each_piece() {
        for piece in Tetromino::all() {
            let game = game_with(vec![piece]);
            let active = game.active().unwrap();
            assert_eq!(active.y, 0);
            assert_eq!(active.x, 5 - (piece.shape().width() / 2) as i32, "{:?}", piece);
        }
    }

    #[test]
    fn moves_until_the_wall() {
        let mut game = game_with(vec![Tetromino::O]);
        assert_eq!(game.active().unwrap().x, 4);
        let mut steps = 0;
        while game.try_move(-1, 0) {
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert_eq!(game.active().unwrap().x, 0);
        assert!(!game.try_move(-1, 0));
    }

    #[test]
    fn blocked_rotation_keeps_shape() {
        let mut game = game_with(vec![Tetromino::I]);
        assert!(game.place_active(Tetromino::I, Tetromino::I.shape(), 0, 10));
        // vertical I would occupy column 0 rows 10..14
        game.board_mut().set_cell(0, 12, Cell::Filled);
        let before = game.active().unwrap().shape.clone();
        assert!(!game.rotate());
        assert_eq!(game.active().unwrap().shape, before);
    }

    #[test]
    fn rotation_near_floor_is_discarded() {
        let mut game = game_with(vec![Tetromino::I]);
        game.hard_drop();
        assert_eq!(game.active().unwrap().y, HEIGHT as i32 - 1);
        assert!(!game.rotate());
        assert_eq!(game.active().unwrap().shape, Tetromino::I.shape());
    }

    #[test]
    fn rotation_applies_when_clear() {
        let mut game = game_with(vec![Tetromino::T]);
        assert!(game.rotate());
        assert_eq!(game.active().unwrap().shape, Tetromino::T.shape().rotate_cw());
    }

    #[test]
    fn hard_drop_does_not_lock() {
        let mut game = game_with(vec![Tetromino::O, Tetromino::T]);
        assert_eq!(game.hard_drop(), HEIGHT as u32 - 2);
        assert_eq!(game.active().unwrap().piece, Tetromino::O);
        assert!(game.board().is_empty());
        assert_eq!(game.tick(), TickOutcome::Locked { lines_cleared: 0 });
        assert_eq!(game.active().unwrap().piece, Tetromino::T);
        assert!(game.board().cell(4, HEIGHT - 1).is_filled());
        assert!(game.board().cell(5, HEIGHT - 2).is_filled());
    }

    #[test]
    fn tick_falls_one_row() {
        let mut game = game_with(vec![Tetromino::S]);
        assert_eq!(game.tick(), TickOutcome::Fell);
        assert_eq!(game.active().unwrap().y, 1);
    }

    #[test]
    fn advance_ticks_once_per_period() {
        let mut game = game_with(vec![Tetromino::S]);
        assert!(game.advance(499).is_empty());
        assert_eq!(game.advance(1), vec![TickOutcome::Fell]);
        assert_eq!(game.advance(250), Vec::new());
        assert_eq!(game.advance(250), vec![TickOutcome::Fell]);
        assert_eq!(game.active().unwrap().y, 2);
    }

    #[test]
    fn long_stall_runs_a_single_step() {
        let mut game = game_with(vec![Tetromino::O]);
        assert_eq!(game.advance(600_000), vec![TickOutcome::Fell]);
        assert_eq!(game.active().unwrap().y, 1);
        assert_eq!(game.advance(u32::MAX), vec![TickOutcome::Fell]);
        assert_eq!(game.active().unwrap().y, 2);
        assert!(game.board().is_empty());
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn soft_drop_locks_a_landed_piece() {
        let mut game = game_with(vec![Tetromino::O, Tetromino::T]);
        game.hard_drop();
        assert!(game.apply(Intent::SoftDrop));
        assert_eq!(game.active().unwrap().piece, Tetromino::T);
        assert!(game.board().cell(4, HEIGHT - 1).is_filled());
    }

    #[test]
    fn halt_policy_stops_the_game() {
        let settings = GameSettings {
            game_over: GameOverPolicy::Halt,
            ..GameSettings::default()
        };
        let mut board = Board::new();
        board.set_cell(5, 0, Cell::Filled);
        board.credit_lines(2);
        let mut game = Game::with_board(&settings, Box::new(Sequence::new(vec![Tetromino::O])), board);
        assert_eq!(game.status(), GameStatus::GameOver);
        assert!(game.active().is_none());
        assert_eq!(game.score(), 200);
        assert_eq!(game.drain_events(), vec![GameEvent::GameOver { final_score: 200 }]);
        assert_eq!(game.tick(), TickOutcome::Idle);
        assert!(!game.apply(Intent::MoveLeft));
        assert!(game.advance(5_000).is_empty());

        game.restart();
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.board().is_empty());
        assert!(game.active().is_some());
    }

    #[test]
    fn soft_drop_intent_ticks() {
        let mut game = game_with(vec![Tetromino::L]);
        assert!(game.apply(Intent::SoftDrop));
        assert_eq!(game.active().unwrap().y, 1);
        assert!(game.apply(Intent::MoveRight));
        assert_eq!(game.active().unwrap().x, 5);
    }
}
