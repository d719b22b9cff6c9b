// Directory service endpoints (Active Directory / identity lookups)

use serde_json::Value;

use super::{push_opt, require};
use crate::client::OrchestratorClient;
use crate::error::Error;

const DIRECTORY: &str = "api/DirectoryService";

#[derive(Debug, Clone, Copy)]
pub struct Directory<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn directory(&self) -> Directory<'_> {
        Directory { client: self }
    }
}

impl Directory<'_> {
    /// `GET api/DirectoryService/GetDirectoryPermissions`
    pub async fn permissions(
        &self,
        username: Option<&str>,
        domain: Option<&str>,
    ) -> Result<Value, Error> {
        let mut params = Vec::new();
        push_opt(&mut params, "username", username);
        push_opt(&mut params, "domain", domain);
        self.client
            .get_with_params(&format!("{DIRECTORY}/GetDirectoryPermissions"), &params)
            .await
    }

    /// `GET api/DirectoryService/GetDomains`
    pub async fn domains(&self) -> Result<Value, Error> {
        self.client.get(&format!("{DIRECTORY}/GetDomains")).await
    }

    /// Orchestrator user id of a directory user or group.
    ///
    /// `GET api/DirectoryService/GetDomainUserId`
    pub async fn domain_user_id(
        &self,
        domain: &str,
        directory_identifier: &str,
        user_name: &str,
        user_type: &str,
    ) -> Result<i64, Error> {
        require("domain", domain)?;
        require("user_name", user_name)?;
        self.client
            .get_with_params(
                &format!("{DIRECTORY}/GetDomainUserId"),
                &[
                    ("domain", domain.to_owned()),
                    ("directoryIdentifier", directory_identifier.to_owned()),
                    ("userName", user_name.to_owned()),
                    ("userType", user_type.to_owned()),
                ],
            )
            .await
    }

    /// `GET api/DirectoryService/SearchForUsersAndGroups`
    pub async fn search(
        &self,
        search_context: &str,
        domain: &str,
        prefix: &str,
    ) -> Result<Value, Error> {
        require("domain", domain)?;
        self.client
            .get_with_params(
                &format!("{DIRECTORY}/SearchForUsersAndGroups"),
                &[
                    ("searchContext", search_context.to_owned()),
                    ("domain", domain.to_owned()),
                    ("prefix", prefix.to_owned()),
                ],
            )
            .await
    }
}
