//! Folder command handlers.

use tabled::Tabled;

use uiorch_api::models::Folder;
use uiorch_api::{Filter, OrchestratorClient};

use crate::cli::{FoldersArgs, FoldersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const FOLDERS: &str = "odata/Folders";

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Type")]
    provision: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id,
            name: f.display_name.clone(),
            path: util::or_dash(f.fully_qualified_name.as_deref()),
            provision: util::or_dash(f.provision_type.as_deref()),
        }
    }
}

pub async fn handle(
    client: &OrchestratorClient,
    args: FoldersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Folders are tenant-level; a folder header would only narrow the view.
    let client = client.without_folder();

    match args.command {
        FoldersCommand::List(list) => {
            let query = util::list_query(&list, Filter::new(), Some("FullyQualifiedName"));
            let folders: Vec<Folder> = if list.all {
                util::fetch_all(&client, FOLDERS, &query).await?
            } else {
                client.folders().list(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &folders,
                |f| FolderRow::from(f),
                |f| {
                    f.fully_qualified_name
                        .clone()
                        .unwrap_or_else(|| f.display_name.clone())
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
