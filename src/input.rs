use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::{Error, Result};

/// One discrete player action.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
}

impl std::str::FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MoveLeft" | "left" => Ok(Intent::MoveLeft),
            "MoveRight" | "right" => Ok(Intent::MoveRight),
            "SoftDrop" | "down" => Ok(Intent::SoftDrop),
            "Rotate" | "rotate" => Ok(Intent::Rotate),
            "HardDrop" | "drop" => Ok(Intent::HardDrop),
            other => Err(Error::UnknownIntent(other.to_string())),
        }
    }
}

/// Key names (browser `KeyboardEvent.key` values) for each intent.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Tsify)]
#[serde(default)]
pub struct ControlBindings {
    pub move_left: String,
    pub move_right: String,
    pub soft_drop: String,
    pub rotate: String,
    pub hard_drop: String,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            move_left: "ArrowLeft".to_string(),
            move_right: "ArrowRight".to_string(),
            soft_drop: "ArrowDown".to_string(),
            rotate: "ArrowUp".to_string(),
            hard_drop: "Space".to_string(),
        }
    }
}

impl ControlBindings {
    pub fn intent_for(&self, key: &str) -> Option<Intent> {
        // `KeyboardEvent.key` reports the space bar as a literal space
        let key = if key == " " { "Space" } else { key };
        [
            (&self.move_left, Intent::MoveLeft),
            (&self.move_right, Intent::MoveRight),
            (&self.soft_drop, Intent::SoftDrop),
            (&self.rotate, Intent::Rotate),
            (&self.hard_drop, Intent::HardDrop),
        ]
        .into_iter()
        .find(|(bound, _)| bound.as_str() == key)
        .map(|(_, intent)| intent)
    }

    pub fn validate(&self) -> Result<()> {
        let keys = [
            &self.move_left,
            &self.move_right,
            &self.soft_drop,
            &self.rotate,
            &self.hard_drop,
        ];
        for (i, key) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(Error::InvalidSettings("empty key binding".to_string()));
            }
            if keys[i + 1..].contains(key) {
                return Err(Error::InvalidSettings(format!("key `{}` bound twice", key)));
            }
        }
        Ok(())
    }
}
