use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::{Error, Result};
use crate::input::ControlBindings;
use crate::randomizer::RandomizerKind;

pub const TICK_MS_DEFAULT: u32 = 500;
pub const BLOCK_SIZE_DEFAULT: u32 = 20;

/// What happens when a freshly spawned piece overlaps the stack.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Tsify)]
pub enum GameOverPolicy {
    /// Report game over, then reset the board and keep playing.
    #[default]
    AutoRestart,
    /// Stay in `GameOver` until the host calls `restart`.
    Halt,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Tsify)]
#[serde(default)]
pub struct GameSettings {
    /// Gravity period in milliseconds.
    pub tick_ms: u32,
    /// Pixel size of one cell, for renderers.
    pub block_size: u32,
    pub game_over: GameOverPolicy,
    pub randomizer: RandomizerKind,
    pub bindings: ControlBindings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS_DEFAULT,
            block_size: BLOCK_SIZE_DEFAULT,
            game_over: GameOverPolicy::AutoRestart,
            randomizer: RandomizerKind::TrueRandom,
            bindings: ControlBindings::default(),
        }
    }
}

impl GameSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: GameSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(Error::InvalidSettings("tick_ms must be positive".to_string()));
        }
        if self.block_size == 0 {
            return Err(Error::InvalidSettings("block_size must be positive".to_string()));
        }
        self.bindings.validate()
    }
}
