use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use web_sys::console;

pub mod board;
pub mod error;
pub mod game;
pub mod input;
pub mod randomizer;
pub mod settings;
pub mod shape;
pub mod view;

pub use board::{Board, Cell, HEIGHT, POINTS_PER_LINE, WIDTH};
pub use error::Error;
pub use game::{ActivePiece, Game, GameEvent, GameStatus, TickOutcome};
pub use input::{ControlBindings, Intent};
pub use randomizer::{Randomizer, RandomizerKind};
pub use settings::{GameOverPolicy, GameSettings};
pub use shape::{Shape, Tetromino, rotate_cw};
pub use view::{FrameView, Point};

/// `log` backend writing to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        console::log_1(&JsValue::from_str(&line));
    }

    fn flush(&self) {}
}

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
    if log::set_logger(&CONSOLE_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

fn to_js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Browser-facing handle: one game plus the settings it was built from.
#[wasm_bindgen]
pub struct GameClient {
    game: Game,
    settings: GameSettings,
}

#[wasm_bindgen]
impl GameClient {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<GameClient, JsValue> {
        let settings: GameSettings = if settings.is_undefined() || settings.is_null() {
            GameSettings::default()
        } else {
            from_value(settings)?
        };
        settings.validate().map_err(to_js_error)?;
        log::info!("new game, tick every {} ms", settings.tick_ms);
        Ok(Self {
            game: Game::new(&settings),
            settings,
        })
    }

    /// Advances the gravity clock and returns the resulting frame.
    /// Negative or NaN deltas count as zero.
    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self, dt_ms: f32) -> Result<JsValue, JsValue> {
        self.game.advance(dt_ms as u32);
        self.frame()
    }

    /// Applies the intent bound to `key`. Returns false for unbound keys.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        match self.settings.bindings.intent_for(key) {
            Some(intent) => {
                self.game.apply(intent);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = frame)]
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        to_value(&self.game.snapshot()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        to_value(&self.game.drain_events()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = restart)]
    pub fn restart(&mut self) {
        self.game.restart();
    }

    #[wasm_bindgen(js_name = score)]
    pub fn score(&self) -> u32 {
        self.game.score()
    }

    #[wasm_bindgen(js_name = blockSize)]
    pub fn block_size(&self) -> u32 {
        self.settings.block_size
    }
}
