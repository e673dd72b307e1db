//! JSON-lines driver.
//!
//! Each input line is one serialized `FlowEvent`. After every line the
//! resulting view is written as one output line. Malformed lines produce an
//! `error` line and are otherwise skipped.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, info_span, warn, Instrument};

use jm_app::app_paths::AppPaths;
use jm_app::FlowOrchestrator;
use jm_core::{AppConfig, FlowEvent};

use super::wiring::wire_with_paths;
use crate::adapters::{JsonLinesWriter, ShellOutput};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("line {line}: not a flow event")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Wires everything from `config` and drives the flow from stdin until EOF.
pub async fn run_app(config: AppConfig, paths: AppPaths) -> anyhow::Result<()> {
    let deps = wire_with_paths(&config, &paths, Arc::new(JsonLinesWriter::stdout()))?;
    let listener = deps.flow.spawn_auth_listener().await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let result = run_event_loop(&deps.flow, stdin, &deps.writer).await;

    listener.abort();
    result
}

/// Restores the session, then applies one event per input line.
pub async fn run_event_loop<R>(
    flow: &Arc<FlowOrchestrator>,
    reader: R,
    writer: &JsonLinesWriter,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let session = flow.restore().await;
    writer.write(&ShellOutput::view(session))?;

    let mut lines = reader.lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match parse_event(line_no, line) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "skipping input line");
                writer.write(&ShellOutput::error(error_chain(&err)))?;
                continue;
            }
        };

        let session = flow
            .dispatch(event)
            .instrument(info_span!("shell.line", line = line_no))
            .await;
        writer.write(&ShellOutput::view(session))?;
    }

    info!(lines = line_no, "input closed");
    Ok(())
}

fn parse_event(line_no: usize, line: &str) -> Result<FlowEvent, InputError> {
    serde_json::from_str(line).map_err(|source| InputError::InvalidEvent {
        line: line_no,
        source,
    })
}

fn error_chain(err: &InputError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
