// Robot log ingestion endpoints

use serde::Serialize;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;

#[derive(Debug, Clone, Copy)]
pub struct Logs<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn logs(&self) -> Logs<'_> {
        Logs { client: self }
    }
}

impl Logs<'_> {
    /// Submit a batch of log entries.
    ///
    /// Each entry is a JSON document serialized to a string, e.g.
    /// `{"message":"…","level":"Information","timeStamp":"…","jobId":"…"}`.
    ///
    /// `POST api/Logs/SubmitLogs`
    pub async fn submit(&self, entries: &[String]) -> Result<(), Error> {
        if entries.is_empty() {
            return Ok(());
        }
        debug!(count = entries.len(), "submitting log entries");
        self.client
            .post_no_response("api/Logs/SubmitLogs", entries)
            .await
    }

    /// Insert a single log entry.
    ///
    /// `POST api/Logs`
    #[deprecated(note = "use `submit` instead")]
    pub async fn post<B: Serialize + ?Sized>(&self, entry: &B) -> Result<(), Error> {
        self.client.post_no_response("api/Logs", entry).await
    }
}
