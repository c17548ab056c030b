//! Interactive browse loop.
//!
//! Reads filter/keyword commands from stdin and re-runs the search after
//! every change, mirroring the search page: edit → refetch → re-render.
//! Fetches run as background tasks through [`SearchSession`], so a slow
//! response superseded by a newer command is dropped, not displayed.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use jobdeck_core::search::SearchSession;
use jobdeck_core::traits::ListingSource;

use crate::render;

const HELP: &str = "\
Commands:
  <text>            set the keyword and search
  country <value>   filter by country (all-countries to clear)
  state <value>     filter by state/region (all-states to clear)
  city <value>      filter by city (all-cities to clear)
  title <value>     filter by title category (all-titles to clear)
  date <window>     any-time | last-24-hours | last-7-days | last-30-days
  go                re-run the current search
  help              show this help
  quit              leave";

/// Run the browse loop until EOF or `quit`.
pub async fn run<S>(session: SearchSession<S>, shutdown: CancellationToken) -> Result<()>
where
    S: ListingSource + 'static,
{
    println!("{HELP}\n");

    // Initial fetch with whatever the session was seeded with.
    submit_in_background(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = shutdown.cancelled() => break,
        };
        let Some(line) = line else { break };
        let line = line.trim();

        match line.split_once(' ') {
            _ if line.is_empty() => continue,
            _ if line == "quit" || line == "exit" => break,
            _ if line == "help" => {
                println!("{HELP}");
                continue;
            }
            _ if line == "go" => {}
            Some((field @ ("country" | "state" | "city" | "title" | "date"), value)) => {
                if let Err(e) = session.set_filter(field, value.trim()) {
                    println!("{e}");
                    continue;
                }
            }
            _ => session.set_keyword(line),
        }

        submit_in_background(&session);
    }

    Ok(())
}

/// Issue one fetch for the current keyword/selection. Each change issues
/// exactly one request; stale completions return `None` and stay silent.
fn submit_in_background<S>(session: &SearchSession<S>)
where
    S: ListingSource + 'static,
{
    println!("{}", render::loading_line());

    let session = session.clone();
    tokio::spawn(async move {
        if let Some(phase) = session.submit().await {
            println!("{}", render::search_phase(&phase));
        }
    });
}
