//! Release command handlers.

use tabled::Tabled;

use uiorch_api::models::Release;
use uiorch_api::{Filter, OrchestratorClient};

use crate::cli::{GlobalOpts, ReleasesArgs, ReleasesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReleaseRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Folder")]
    folder: String,
    #[tabled(rename = "Key")]
    key: String,
}

impl From<&Release> for ReleaseRow {
    fn from(r: &Release) -> Self {
        Self {
            id: r.id,
            name: util::or_dash(r.name.as_deref()),
            package: util::or_dash(r.process_key.as_deref()),
            version: util::or_dash(r.process_version.as_deref()),
            folder: util::or_dash(r.organization_unit_fully_qualified_name.as_deref()),
            key: r.key.map(|k| k.to_string()).unwrap_or_default(),
        }
    }
}

pub async fn handle(
    client: &OrchestratorClient,
    args: ReleasesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReleasesCommand::List(list) => {
            let query = util::list_query(&list, Filter::new(), Some("Name"));
            let releases = if list.all {
                client.releases().list_all(&query).await?
            } else {
                client.releases().list(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &releases,
                |r| ReleaseRow::from(r),
                |r| r.key.map(|k| k.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
