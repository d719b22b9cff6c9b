// Task form and task endpoints (Action Center)

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::require;
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{Task, TaskForm};
use crate::odata::{Filter, ODataList, ODataQuery};

const TASK_FORMS: &str = "odata/TaskForms";
const TASKS: &str = "odata/Tasks";

#[derive(Debug, Clone, Copy)]
pub struct TaskForms<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn task_forms(&self) -> TaskForms<'_> {
        TaskForms { client: self }
    }
}

impl TaskForms<'_> {
    /// `GET odata/TaskForms`
    pub async fn list(
        &self,
        process_name: Option<&str>,
        status: Option<&str>,
    ) -> Result<ODataList<TaskForm>, Error> {
        let filter = Filter::new()
            .eq_str_opt("ProcessName", process_name)
            .eq_str_opt("Status", status);
        self.client
            .get_list(TASK_FORMS, &ODataQuery::from(filter))
            .await
    }

    /// `GET odata/TaskForms({id})`
    pub async fn get(&self, id: i64) -> Result<TaskForm, Error> {
        self.client.get(&format!("{TASK_FORMS}({id})")).await
    }

    /// Submit the form data for a task form.
    ///
    /// `POST odata/TaskForms({id})/UiPath.Server.Configuration.OData.Submit`
    pub async fn submit<B: Serialize + ?Sized>(&self, id: i64, data: &B) -> Result<(), Error> {
        debug!(id, "submitting task form");
        self.client
            .post_no_response(
                &format!("{TASK_FORMS}({id})/UiPath.Server.Configuration.OData.Submit"),
                data,
            )
            .await
    }

    /// `POST odata/TaskForms({id})/UiPath.Server.Configuration.OData.Assign`
    pub async fn assign(&self, id: i64, user_id: i64) -> Result<(), Error> {
        debug!(id, user_id, "assigning task form");
        self.client
            .post_no_response(
                &format!("{TASK_FORMS}({id})/UiPath.Server.Configuration.OData.Assign"),
                &json!({ "userId": user_id }),
            )
            .await
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// `GET odata/Tasks`
    pub async fn tasks(
        &self,
        title: Option<&str>,
        status: Option<&str>,
        assigned_to: Option<i64>,
        skip: u32,
        take: u32,
    ) -> Result<ODataList<Task>, Error> {
        let mut filter = Filter::new()
            .eq_str_opt("Title", title)
            .eq_str_opt("Status", status);
        if let Some(user_id) = assigned_to {
            filter = filter.eq("AssignedToUserId", user_id);
        }
        let query = ODataQuery::from(filter).skip(skip).top(take);
        self.client.get_list(TASKS, &query).await
    }

    /// `GET odata/Tasks({id})`
    pub async fn task(&self, id: i64) -> Result<Task, Error> {
        self.client.get(&format!("{TASKS}({id})")).await
    }

    /// `PUT odata/Tasks({id})`
    pub async fn update_task<B: Serialize + ?Sized>(
        &self,
        id: i64,
        body: &B,
    ) -> Result<Option<Task>, Error> {
        debug!(id, "updating task");
        self.client.put(&format!("{TASKS}({id})"), body).await
    }

    /// `DELETE odata/Tasks({id})`
    pub async fn delete_task(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting task");
        self.client.delete(&format!("{TASKS}({id})")).await
    }

    /// Complete a task with the chosen action (e.g. `Approve`).
    ///
    /// `POST odata/Tasks({id})/UiPath.Server.Configuration.OData.Complete`
    pub async fn complete_task(&self, id: i64, action: &str) -> Result<(), Error> {
        require("action", action)?;
        debug!(id, action, "completing task");
        self.client
            .post_no_response(
                &format!("{TASKS}({id})/UiPath.Server.Configuration.OData.Complete"),
                &json!({ "action": action }),
            )
            .await
    }
}
