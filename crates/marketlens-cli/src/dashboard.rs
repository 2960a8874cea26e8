//! Interactive dashboard on stdin.
//!
//! Reads one command per line. Syncs run in the background; their notices
//! are printed as they arrive while the prompt keeps accepting input.

use std::sync::Arc;

use marketlens_gateway::GatewayClient;
use marketlens_session::{Dashboard, SubmitOutcome, SyncRequest};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::render;

const HELP: &str = "\
Commands:
  search <query>   search the marketplace
  sync <asin>...   sync one or more products into the catalog
  status           show search results and sync states
  overview         show the analytics overview (cached)
  trends           show revenue trends (cached)
  refresh          drop cached analytics
  clear            reset the search
  help             show this help
  quit             exit
";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DashboardCommand {
    Search(String),
    Sync(Vec<String>),
    Status,
    Overview,
    Trends,
    Refresh,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parses one input line. Never fails; bad input becomes `Unknown`.
pub(crate) fn parse_line(line: &str) -> DashboardCommand {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    match verb.to_ascii_lowercase().as_str() {
        "" => DashboardCommand::Empty,
        "search" | "s" if !rest.is_empty() => DashboardCommand::Search(rest.to_owned()),
        "sync" if !rest.is_empty() => {
            DashboardCommand::Sync(rest.split_whitespace().map(str::to_owned).collect())
        }
        "status" | "ls" => DashboardCommand::Status,
        "overview" => DashboardCommand::Overview,
        "trends" => DashboardCommand::Trends,
        "refresh" => DashboardCommand::Refresh,
        "clear" => DashboardCommand::Clear,
        "help" | "?" => DashboardCommand::Help,
        "quit" | "exit" | "q" => DashboardCommand::Quit,
        _ => DashboardCommand::Unknown(line.to_owned()),
    }
}

/// Runs the interactive loop until `quit`, end of input, or Ctrl-C.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub(crate) async fn run_dashboard(dashboard: Arc<Dashboard<GatewayClient>>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut notices = dashboard.syncs().subscribe();

    println!("{HELP}");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_command(&dashboard, parse_line(&line)).await {
                    break;
                }
            }
            notice = notices.recv() => match notice {
                Ok(notice) => println!("{}", render::render_notice(&notice)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "sync notices dropped; run `status` for current states");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received");
                break;
            }
        }
    }

    if dashboard.syncs().in_flight_count() > 0 {
        println!("Waiting for in-flight syncs to finish...");
        dashboard.syncs().settle().await;
        print!("{}", render::render_sync_records(&dashboard.syncs().snapshot()));
    }
    Ok(())
}

/// Executes one command. Returns `false` when the loop should stop.
async fn handle_command(
    dashboard: &Arc<Dashboard<GatewayClient>>,
    command: DashboardCommand,
) -> bool {
    match command {
        DashboardCommand::Search(query) => {
            // Off the input loop; a `search` issued meanwhile comes back ignored.
            let dashboard = Arc::clone(dashboard);
            tokio::spawn(async move {
                let outcome = dashboard.submit_search(&query).await;
                tracing::debug!(?outcome, "search settled");
                if matches!(outcome, SubmitOutcome::Completed(_)) {
                    print!("{}", render::render_view(&dashboard.view()));
                } else {
                    println!("A search is already running; wait for it to finish.");
                }
            });
        }
        DashboardCommand::Sync(asins) => {
            for asin in asins {
                match dashboard.request_sync(&asin) {
                    SyncRequest::Started => println!("Syncing {asin}..."),
                    SyncRequest::AlreadyInFlight => {
                        println!("{asin} is already syncing.");
                    }
                    SyncRequest::InvalidIdentifier => {
                        println!("Invalid identifier: {asin:?}");
                    }
                }
            }
        }
        DashboardCommand::Status => {
            let view = dashboard.view();
            print!("{}", render::render_view(&view));
            print!("{}", render::render_sync_records(&view.syncs));
        }
        DashboardCommand::Overview => {
            let dashboard = Arc::clone(dashboard);
            tokio::spawn(async move {
                match dashboard.overview().await {
                    Ok(overview) => print!("{}", render::render_overview(&overview)),
                    Err(e) => println!("Failed to load overview: {e}"),
                }
            });
        }
        DashboardCommand::Trends => {
            let dashboard = Arc::clone(dashboard);
            tokio::spawn(async move {
                match dashboard.trends().await {
                    Ok(points) => print!("{}", render::render_trends(&points)),
                    Err(e) => println!("Failed to load trends: {e}"),
                }
            });
        }
        DashboardCommand::Refresh => {
            dashboard.refresh_analytics();
            println!("Analytics will be reloaded on next request.");
        }
        DashboardCommand::Clear => {
            dashboard.clear_search();
            println!("Search cleared.");
        }
        DashboardCommand::Help => println!("{HELP}"),
        DashboardCommand::Quit => return false,
        DashboardCommand::Empty => {}
        DashboardCommand::Unknown(line) => println!("Unknown command: {line}. Type `help`."),
    }
    true
}
