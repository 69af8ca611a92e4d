use serde::{Deserialize, Serialize};

/// Lifecycle of a data request against the satellite data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryState {
    /// Data has been processed and can be removed from storage, if necessary
    Processed,
    /// Data is available in storage
    Available,
    /// Data is not yet available in storage, but the download is partially complete
    Incomplete,
    /// Data is not in storage but online, a request has already been made
    Pending,
    /// The request is new and has not yet been processed
    New,
    /// Data is not in storage and not online
    Unavailable,
    /// Identifier does not relate to any data
    Invalid,
}

impl QueryState {
    /// States from which no further progress is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QueryState::Processed | QueryState::Unavailable | QueryState::Invalid
        )
    }
}
