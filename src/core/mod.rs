pub mod controller;
pub mod detail;
pub mod parser;
pub mod snapshot;

pub use crate::domain::model::{DisplayFields, ListState, Movie, SortCriterion};
pub use crate::domain::ports::{ConfigProvider, ConnectivityProbe, MovieSource};
pub use crate::utils::error::Result;
