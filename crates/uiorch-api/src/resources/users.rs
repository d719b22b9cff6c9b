// User endpoints

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::User;
use crate::odata::{Filter, ODataList, ODataQuery};

const USERS: &str = "odata/Users";

#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a OrchestratorClient,
}

impl OrchestratorClient {
    pub fn users(&self) -> Users<'_> {
        Users { client: self }
    }
}

impl Users<'_> {
    /// `GET odata/Users`, optionally filtered.
    pub async fn list(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<ODataList<User>, Error> {
        let mut filter = Filter::new()
            .eq_str_opt("UserName", username)
            .eq_str_opt("EmailAddress", email);
        if let Some(active) = is_active {
            filter = filter.eq("IsActive", active);
        }
        self.client
            .get_list(USERS, &ODataQuery::from(filter))
            .await
    }

    /// `GET odata/Users({id})`
    pub async fn get(&self, id: i64) -> Result<User, Error> {
        self.client.get(&format!("{USERS}({id})")).await
    }

    /// `POST odata/Users`
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<User, Error> {
        debug!("creating user");
        self.client.post(USERS, body).await
    }

    /// `PUT odata/Users({id})`
    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<(), Error> {
        debug!(id, "updating user");
        self.client.put_no_response(&format!("{USERS}({id})"), body).await
    }

    /// `DELETE odata/Users({id})`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting user");
        self.client.delete(&format!("{USERS}({id})")).await
    }

    /// `POST odata/Users({id})/UiPath.Server.Configuration.OData.ChangePassword`
    pub async fn change_password(
        &self,
        id: i64,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<(), Error> {
        debug!(id, "changing user password");
        self.client
            .post_no_response(
                &format!("{USERS}({id})/UiPath.Server.Configuration.OData.ChangePassword"),
                &json!({
                    "currentPassword": current.expose_secret(),
                    "newPassword": new.expose_secret(),
                }),
            )
            .await
    }
}
