pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod optimizer;
pub mod parallel;

pub use config::AssaultConfig;
pub use error::{PlannerError, Result};
pub use optimizer::{plan_assault, rank_teams, score_named_team, AssaultReport, TeamRanking};
