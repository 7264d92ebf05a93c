pub mod client;
pub mod error;

use crate::domain::stats::{SyncStats, TopSender};
use error::ApiError;

pub use client::ApiClient;

/// The backend operations the client relies on.
#[cfg_attr(test, mockall::automock)]
pub trait StatsBackend: Send + Sync {
    /// Runs an inbox sync and returns its counters.
    fn sync(&self) -> Result<SyncStats, ApiError>;

    /// Sender counts in whatever order the backend returns them.
    fn top_senders(&self) -> Result<Vec<TopSender>, ApiError>;

    /// Address of the connected Gmail account.
    fn profile(&self) -> Result<String, ApiError>;

    /// Moves every message from `sender` to the trash; returns how many.
    fn delete_sender(&self, sender: &str) -> Result<u64, ApiError>;

    /// Drops the Gmail credential stored in the backend session.
    fn disconnect(&self) -> Result<(), ApiError>;

    /// Where the browser goes to start the OAuth connect flow.
    fn authorize_url(&self) -> String;
}
