// Test automation endpoints

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{push_opt, require};
use crate::client::OrchestratorClient;
use crate::error::Error;

const TEST_AUTOMATION: &str = "api/TestAutomation";

#[derive(Debug, Clone, Copy)]
pub struct TestAutomation<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn test_automation(&self) -> TestAutomation<'_> {
        TestAutomation { client: self }
    }
}

impl TestAutomation<'_> {
    /// `POST api/TestAutomation/CancelTestCaseExecution`
    pub async fn cancel_test_case_execution(&self, execution_id: i64) -> Result<(), Error> {
        debug!(execution_id, "cancelling test case execution");
        self.client
            .post_params_no_response(
                &format!("{TEST_AUTOMATION}/CancelTestCaseExecution"),
                &[("testCaseExecutionId", execution_id.to_string())],
            )
            .await
    }

    /// `POST api/TestAutomation/CancelTestSetExecution`
    pub async fn cancel_test_set_execution(&self, execution_id: i64) -> Result<(), Error> {
        debug!(execution_id, "cancelling test set execution");
        self.client
            .post_params_no_response(
                &format!("{TEST_AUTOMATION}/CancelTestSetExecution"),
                &[("testSetExecutionId", execution_id.to_string())],
            )
            .await
    }

    /// Create an API-sourced test set. Returns the new test set id.
    ///
    /// `POST api/TestAutomation/CreateTestSetForReleaseVersion`
    pub async fn create_test_set<B: Serialize + ?Sized>(&self, body: &B) -> Result<i64, Error> {
        debug!("creating test set");
        self.client
            .post(&format!("{TEST_AUTOMATION}/CreateTestSetForReleaseVersion"), body)
            .await
    }

    /// `GET api/TestAutomation/GetAssertionScreenshot`
    pub async fn assertion_screenshot(&self, assertion_id: i64) -> Result<Bytes, Error> {
        self.client
            .get_bytes(
                &format!("{TEST_AUTOMATION}/GetAssertionScreenshot"),
                &[("testCaseAssertionId", assertion_id.to_string())],
            )
            .await
    }

    /// `GET api/TestAutomation/GetPackageInfoByTestCaseUniqueId`
    pub async fn package_info(
        &self,
        test_case_unique_id: &str,
        package_identifier: &str,
    ) -> Result<Value, Error> {
        require("test_case_unique_id", test_case_unique_id)?;
        require("package_identifier", package_identifier)?;
        self.client
            .get_with_params(
                &format!("{TEST_AUTOMATION}/GetPackageInfoByTestCaseUniqueId"),
                &[
                    ("testCaseUniqueId", test_case_unique_id.to_owned()),
                    ("packageIdentifier", package_identifier.to_owned()),
                ],
            )
            .await
    }

    /// Start a test set by id or key. Returns the execution id.
    ///
    /// `POST api/TestAutomation/StartTestSetExecution`
    pub async fn start_test_set_execution(
        &self,
        test_set_id: Option<i64>,
        test_set_key: Option<&str>,
        trigger_type: &str,
    ) -> Result<i64, Error> {
        if test_set_id.is_none() && test_set_key.is_none() {
            return Err(Error::validation(
                "test_set",
                "either a test set id or a test set key is required",
            ));
        }
        let mut params = vec![("triggerType", trigger_type.to_owned())];
        push_opt(&mut params, "testSetId", test_set_id);
        push_opt(&mut params, "testSetKey", test_set_key);
        debug!(?test_set_id, ?test_set_key, trigger_type, "starting test set execution");
        self.client
            .post_params::<i64>(&format!("{TEST_AUTOMATION}/StartTestSetExecution"), &params)
            .await?
            .ok_or_else(|| Error::Deserialization {
                message: "empty response, expected an execution id".into(),
                body: String::new(),
            })
    }
}
