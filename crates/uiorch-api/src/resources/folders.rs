// Folder endpoints
//
// Folder CRUD is OData (`odata/Folders`); key-based management and the
// navigation tree are plain REST under `api/Folders` and
// `api/FoldersNavigation`. All of them are tenant-level, so the handle
// drops the client's folder header.

use serde_json::{Map, Value};
use tracing::debug;

use super::{push_opt, require};
use crate::client::OrchestratorClient;
use crate::error::Error;
use crate::models::{Folder, NewFolder};
use crate::odata::{ODataList, ODataQuery};

const FOLDERS: &str = "odata/Folders";
const NAVIGATION: &str = "api/FoldersNavigation";

#[derive(Debug, Clone)]
pub struct Folders {
    client: OrchestratorClient,
}

impl OrchestratorClient {
    pub fn folders(&self) -> Folders {
        Folders {
            client: self.without_folder(),
        }
    }
}

impl Folders {
    /// `GET odata/Folders`
    pub async fn list(&self, query: &ODataQuery) -> Result<ODataList<Folder>, Error> {
        debug!("listing folders");
        self.client.get_list(FOLDERS, query).await
    }

    /// `POST odata/Folders`
    pub async fn create(&self, folder: &NewFolder) -> Result<Folder, Error> {
        require("display_name", &folder.display_name)?;
        debug!(name = %folder.display_name, "creating folder");
        self.client.post(FOLDERS, folder).await
    }

    /// Delete a folder by key. Fails unless the folder and its descendants are empty.
    ///
    /// `DELETE api/Folders/DeleteByKey?key=…`
    pub async fn delete_by_key(&self, key: &str) -> Result<(), Error> {
        require("key", key)?;
        debug!(key, "deleting folder");
        self.client
            .delete_with_params("api/Folders/DeleteByKey", &[("key", key.to_owned())])
            .await
    }

    /// A page of the folders the current user can access.
    ///
    /// `GET api/Folders/GetAllForCurrentUser`
    pub async fn all_for_current_user(
        &self,
        take: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Value, Error> {
        let mut params = Vec::new();
        push_opt(&mut params, "take", take);
        push_opt(&mut params, "skip", skip);
        self.client
            .get_with_params("api/Folders/GetAllForCurrentUser", &params)
            .await
    }

    /// Rename a folder and/or change its description. Absent fields are left alone.
    ///
    /// `PATCH api/Folders/PatchNameDescription?key=…`
    pub async fn update_name_description(
        &self,
        key: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), Error> {
        require("key", key)?;
        let mut body = Map::new();
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            body.insert("Name".into(), Value::from(name));
        }
        if let Some(desc) = description.filter(|d| !d.is_empty()) {
            body.insert("Description".into(), Value::from(desc));
        }
        debug!(key, "updating folder name/description");
        self.client
            .patch_no_response(
                "api/Folders/PatchNameDescription",
                &[("key", key.to_owned())],
                &body,
            )
            .await
    }

    /// Folders visible to the current user, optionally filtered.
    ///
    /// `GET api/FoldersNavigation/GetFoldersForCurrentUser`
    pub async fn navigation(
        &self,
        search_text: Option<&str>,
        folder_type: Option<&str>,
    ) -> Result<Value, Error> {
        let mut params = Vec::new();
        push_opt(&mut params, "searchText", search_text);
        push_opt(&mut params, "folderTypes", folder_type);
        self.client
            .get_with_params(&format!("{NAVIGATION}/GetFoldersForCurrentUser"), &params)
            .await
    }

    /// `GET api/FoldersNavigation/GetFolderNavigationContextForCurrentUser?folderId=…`
    pub async fn navigation_context(&self, folder_id: i64) -> Result<Value, Error> {
        self.client
            .get_with_params(
                &format!("{NAVIGATION}/GetFolderNavigationContextForCurrentUser"),
                &[("folderId", folder_id.to_string())],
            )
            .await
    }

    /// `GET api/FoldersNavigation/GetAllFoldersForCurrentUser`
    pub async fn hierarchy(&self) -> Result<Value, Error> {
        self.client
            .get(&format!("{NAVIGATION}/GetAllFoldersForCurrentUser"))
            .await
    }

    /// Folder roles held by a user, group, machine, robot, or external application.
    ///
    /// `GET api/FoldersNavigation/GetAllRolesForUser`
    pub async fn user_roles(
        &self,
        username: &str,
        user_type: &str,
        search_text: Option<&str>,
        skip: u32,
        take: u32,
    ) -> Result<Value, Error> {
        require("username", username)?;
        let mut params = vec![
            ("username", username.to_owned()),
            ("type", user_type.to_owned()),
            ("skip", skip.to_string()),
            ("take", take.to_string()),
        ];
        push_opt(&mut params, "searchText", search_text);
        self.client
            .get_with_params(&format!("{NAVIGATION}/GetAllRolesForUser"), &params)
            .await
    }
}
