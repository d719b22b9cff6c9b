//! Process (package feed) command handlers.

use tabled::Tabled;

use uiorch_api::models::Package;
use uiorch_api::{Filter, OrchestratorClient};

use crate::cli::{GlobalOpts, ProcessesArgs, ProcessesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Package")]
    id: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Published")]
    published: String,
}

impl From<&Package> for PackageRow {
    fn from(p: &Package) -> Self {
        Self {
            id: p.id.clone(),
            version: util::or_dash(p.version.as_deref()),
            title: util::or_dash(p.title.as_deref()),
            latest: match p.is_latest_version {
                Some(true) => "*".into(),
                _ => String::new(),
            },
            published: util::or_dash(p.published.as_deref()),
        }
    }
}

pub async fn handle(
    client: &OrchestratorClient,
    args: ProcessesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProcessesCommand::List(list) => {
            let query = util::list_query(&list, Filter::new(), Some("Id"));
            let packages = if list.all {
                client.processes().list_all(&query).await?
            } else {
                client.processes().list(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &packages,
                |p| PackageRow::from(p),
                |p| p.key.clone().unwrap_or_else(|| p.id.clone()),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
