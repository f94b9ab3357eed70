use core::fmt;

use crate::games::GameId;

#[derive(Debug)]
pub enum ArcadeError {
    UnknownGame(String),
    NotBundled(GameId),
    Config(serde_json::Error),
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGame(name) => write!(f, "unknown game id: {name:?}"),
            Self::NotBundled(id) => write!(f, "game {id} is not bundled in this build"),
            Self::Config(err) => write!(f, "invalid tuning config: {err}"),
        }
    }
}

impl std::error::Error for ArcadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ArcadeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}
