//! Asset command handlers.

use tabled::Tabled;

use uiorch_api::models::Asset;
use uiorch_api::{Filter, OrchestratorClient};

use crate::cli::{AssetsArgs, AssetsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const ASSETS: &str = "odata/Assets";

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    value_type: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&Asset> for AssetRow {
    fn from(a: &Asset) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            value_type: a.value_type.map(|t| t.to_string()).unwrap_or_default(),
            scope: a.value_scope.map(|s| s.to_string()).unwrap_or_default(),
            value: util::or_dash(a.value.as_deref()),
        }
    }
}

fn detail(a: &Asset) -> String {
    output::detail_lines(&[
        ("ID", a.id.to_string()),
        ("Name", a.name.clone()),
        (
            "Type",
            a.value_type.map(|t| t.to_string()).unwrap_or_default(),
        ),
        (
            "Scope",
            a.value_scope.map(|s| s.to_string()).unwrap_or_default(),
        ),
        ("Value", a.value.clone().unwrap_or_default()),
        ("Username", a.credential_username.clone().unwrap_or_default()),
        ("Description", a.description.clone().unwrap_or_default()),
    ])
}

pub async fn handle(
    client: &OrchestratorClient,
    args: AssetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AssetsCommand::List(list) => {
            let query = util::list_query(&list, Filter::new(), Some("Name"));
            let assets: Vec<Asset> = if list.all {
                util::fetch_all(client, ASSETS, &query).await?
            } else {
                client.assets().list(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &assets,
                |a| AssetRow::from(a),
                |a| a.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AssetsCommand::Get { name } => {
            let asset = client
                .assets()
                .get_by_name(&name)
                .await?
                .ok_or_else(|| CliError::not_found("asset", &name, "assets list"))?;
            let out = output::render_single(&global.output, &asset, detail, |a| {
                a.value.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
