pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{StaticConnectivity, TcpProbe, TmdbClient};
pub use config::toml_config::TomlConfig;
pub use crate::core::{
    controller::{Lifecycle, LifecycleOutcome, ListController, ListEvent, LoadState, RequestOutcome},
    parser::ImageSettings,
    snapshot::Snapshot,
};
pub use domain::model::{DisplayFields, ListState, Movie, SortCriterion};
pub use utils::error::{FailureReason, MovieError, Result};
