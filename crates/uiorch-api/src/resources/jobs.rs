// Job endpoints
//
// Jobs are folder-scoped: listing and starting only see the folder the
// client handle is scoped to. Job actions are OData bound/unbound functions
// under the `UiPath.Server.Configuration.OData` namespace.

use futures_util::Stream;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::client::{DEFAULT_PAGE_SIZE, OrchestratorClient};
use crate::error::Error;
use crate::models::{Job, StartInfo, StopStrategy};
use crate::odata::{ODataList, ODataQuery};

const JOBS: &str = "odata/Jobs";
const ACTIONS: &str = "odata/Jobs/UiPath.Server.Configuration.OData";

/// Handle for `odata/Jobs`.
#[derive(Debug, Clone, Copy)]
pub struct Jobs<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn jobs(&self) -> Jobs<'_> {
        Jobs { client: self }
    }
}

impl<'a> Jobs<'a> {
    /// One page of jobs.
    ///
    /// `GET odata/Jobs`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Job>, Error> {
        debug!("listing jobs");
        self.client.get_list(JOBS, query).await
    }

    /// Every job matching `query`, following pagination.
    pub async fn list_all(&self, query: &ODataQuery) -> Result<Vec<Job>, Error> {
        self.client.collect_all(JOBS, query, DEFAULT_PAGE_SIZE).await
    }

    /// Every job matching `query`, fetched page by page as the stream is polled.
    pub fn stream(self, query: ODataQuery) -> impl Stream<Item = Result<Job, Error>> + 'a {
        self.client.stream_all(JOBS, query, DEFAULT_PAGE_SIZE)
    }

    /// `GET odata/Jobs({id})`
    pub async fn get(&self, id: i64) -> Result<Job, Error> {
        debug!(id, "fetching job");
        self.client.get(&format!("odata/Jobs({id})")).await
    }

    /// Start jobs for a release. Returns the jobs created.
    ///
    /// `POST odata/Jobs/UiPath.Server.Configuration.OData.StartJobs` with `{"startInfo": ...}`
    pub async fn start(&self, start_info: &StartInfo) -> Result<Vec<Job>, Error> {
        start_info.validate()?;
        debug!(release_key = %start_info.release_key, strategy = %start_info.strategy, "starting jobs");
        let list: ODataList<Job> = self
            .client
            .post(&format!("{ACTIONS}.StartJobs"), &json!({ "startInfo": start_info }))
            .await?;
        Ok(list.into_vec())
    }

    /// Stop one job.
    ///
    /// `POST odata/Jobs({id})/UiPath.Server.Configuration.OData.StopJob`
    pub async fn stop(&self, id: i64, strategy: StopStrategy) -> Result<(), Error> {
        debug!(id, %strategy, "stopping job");
        self.client
            .post_no_response(
                &format!("odata/Jobs({id})/UiPath.Server.Configuration.OData.StopJob"),
                &json!({ "strategy": strategy }),
            )
            .await
    }

    /// Stop several jobs with one call.
    ///
    /// `POST odata/Jobs/UiPath.Server.Configuration.OData.StopJobs`
    pub async fn stop_many(&self, ids: &[i64], strategy: StopStrategy) -> Result<(), Error> {
        if ids.is_empty() {
            return Err(Error::validation("job_ids", "at least one job id is required"));
        }
        debug!(count = ids.len(), %strategy, "stopping jobs");
        self.client
            .post_no_response(
                &format!("{ACTIONS}.StopJobs"),
                &json!({ "jobIds": ids, "strategy": strategy }),
            )
            .await
    }

    /// Start a new run of a finished job with the same parameters.
    ///
    /// `POST odata/Jobs/UiPath.Server.Configuration.OData.RestartJob`
    pub async fn restart(&self, id: i64) -> Result<Job, Error> {
        debug!(id, "restarting job");
        self.client
            .post(&format!("{ACTIONS}.RestartJob"), &json!({ "jobId": id }))
            .await
    }

    /// Resume a suspended job, optionally passing new input arguments.
    ///
    /// `POST odata/Jobs/UiPath.Server.Configuration.OData.ResumeJob`
    pub async fn resume(&self, job_key: Uuid, input: Option<&Value>) -> Result<(), Error> {
        debug!(%job_key, "resuming job");
        let mut body = json!({ "jobKey": job_key });
        if let Some(args) = input {
            body["inputArguments"] = Value::String(args.to_string());
        }
        self.client
            .post_no_response(&format!("{ACTIONS}.ResumeJob"), &body)
            .await
    }
}
