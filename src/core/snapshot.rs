use crate::domain::model::ListState;
use crate::utils::error::{FailureReason, MovieError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SNAPSHOT_VERSION: u32 = 1;

/// Externalized list state, carried across a view restart.
///
/// Opaque to its holder: produce one with [`Snapshot::capture`], keep the
/// string wherever the host keeps transient state, and hand it back to
/// [`Snapshot::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

#[derive(Serialize, Deserialize)]
struct SnapshotBody {
    version: u32,
    captured_at: DateTime<Utc>,
    state: ListState,
    #[serde(default)]
    failure: Option<FailureReason>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestoredState {
    pub state: ListState,
    pub failure: Option<FailureReason>,
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn capture(state: &ListState, failure: Option<FailureReason>) -> Result<Self> {
        let body = SnapshotBody {
            version: SNAPSHOT_VERSION,
            captured_at: Utc::now(),
            state: state.clone(),
            failure,
        };
        Ok(Self(serde_json::to_string(&body)?))
    }

    pub fn restore(&self) -> Result<RestoredState> {
        let body: SnapshotBody =
            serde_json::from_str(&self.0).map_err(|e| MovieError::DecodeError {
                message: format!("unreadable snapshot: {}", e),
            })?;

        if body.version != SNAPSHOT_VERSION {
            return Err(MovieError::DecodeError {
                message: format!(
                    "snapshot version {} is not supported (expected {})",
                    body.version, SNAPSHOT_VERSION
                ),
            });
        }

        Ok(RestoredState {
            state: body.state,
            failure: body.failure,
            captured_at: body.captured_at,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Snapshot {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
