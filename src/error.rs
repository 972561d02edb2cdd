use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("unknown boss '{0}'")]
    UnknownBoss(String),

    #[error("expected exactly {expected} bosses, got {found}")]
    BossCount { expected: usize, found: usize },

    #[error("roster has {found} units; at most {max} are supported")]
    RosterTooLarge { max: usize, found: usize },

    #[error("invalid unit '{name}': {reason}")]
    InvalidUnit { name: String, reason: String },

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
