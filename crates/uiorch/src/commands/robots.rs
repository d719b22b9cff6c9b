//! Robot and session command handlers.

use tabled::Tabled;

use uiorch_api::models::{Robot, Session};
use uiorch_api::{Filter, OrchestratorClient};

use crate::cli::{GlobalOpts, RobotsArgs, RobotsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const ROBOTS: &str = "odata/Robots";
const SESSIONS: &str = "odata/Sessions";

#[derive(Tabled)]
struct RobotRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Type")]
    robot_type: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&Robot> for RobotRow {
    fn from(r: &Robot) -> Self {
        Self {
            id: r.id,
            name: util::or_dash(r.name.as_deref()),
            machine: util::or_dash(r.machine_name.as_deref()),
            username: util::or_dash(r.username.as_deref()),
            robot_type: util::or_dash(r.robot_type.as_deref()),
            enabled: r
                .enabled
                .map(|e| if e { "yes" } else { "no" }.to_owned())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Session")]
    id: String,
    #[tabled(rename = "Robot")]
    robot: String,
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Responsive")]
    responsive: String,
    #[tabled(rename = "Last Report")]
    reported: String,
}

impl From<&Session> for SessionRow {
    fn from(s: &Session) -> Self {
        Self {
            id: s.session_id.map(|id| id.to_string()).unwrap_or_default(),
            robot: util::or_dash(s.robot.as_ref().and_then(|r| r.name.as_deref())),
            machine: util::or_dash(
                s.host_machine_name
                    .as_deref()
                    .or(s.machine_name.as_deref()),
            ),
            state: util::or_dash(s.state.as_deref()),
            responsive: s
                .is_unresponsive
                .map(|u| if u { "no" } else { "yes" }.to_owned())
                .unwrap_or_default(),
            reported: util::or_dash(s.reporting_time.as_deref()),
        }
    }
}

pub async fn handle(
    client: &OrchestratorClient,
    args: RobotsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RobotsCommand::List(list) => {
            let query = util::list_query(&list, Filter::new(), Some("Name"));
            let robots: Vec<Robot> = if list.all {
                util::fetch_all(client, ROBOTS, &query).await?
            } else {
                client.robots().list(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &robots,
                |r| RobotRow::from(r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RobotsCommand::Sessions(list) => {
            let query = util::list_query(&list, Filter::new(), None).expand("Robot");
            let sessions: Vec<Session> = if list.all {
                util::fetch_all(client, SESSIONS, &query).await?
            } else {
                client.robots().sessions(&query).await?.value
            };
            let out = output::render_list(
                &global.output,
                &sessions,
                |s| SessionRow::from(s),
                |s| s.session_id.map(|id| id.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
