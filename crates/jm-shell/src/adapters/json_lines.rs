//! JSON-lines output of the shell.

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use jm_core::ports::FlowEventPort;
use jm_core::{FlowView, RegistrationDraft, Role, Session};

/// One output line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShellOutput {
    View {
        at: DateTime<Utc>,
        view: &'static str,
        session: Session,
    },
    RegistrationSubmitted {
        at: DateTime<Utc>,
        role: Role,
        draft: RegistrationDraft,
    },
    Error {
        at: DateTime<Utc>,
        message: String,
    },
}

impl ShellOutput {
    pub fn view(session: Session) -> Self {
        let view = FlowView::resolve(session.current_screen, session.role);
        ShellOutput::View {
            at: Utc::now(),
            view: view.name(),
            session,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ShellOutput::Error {
            at: Utc::now(),
            message: message.into(),
        }
    }
}

/// Line-oriented JSON writer shared by the driver loop and the event port.
pub struct JsonLinesWriter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesWriter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn write(&self, output: &ShellOutput) -> anyhow::Result<()> {
        let line = serde_json::to_string(output)?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("output writer poisoned"))?;
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

/// Reports flow notifications on the JSON-lines output.
///
/// Session changes are only traced; the driver prints the view once per
/// processed line.
pub struct JsonLinesFlowEvents {
    writer: Arc<JsonLinesWriter>,
}

impl JsonLinesFlowEvents {
    pub fn new(writer: Arc<JsonLinesWriter>) -> Self {
        Self { writer }
    }
}

#[async_trait::async_trait]
impl FlowEventPort for JsonLinesFlowEvents {
    async fn emit_session_changed(&self, session: Session) {
        debug!(
            screen = %session.current_screen,
            role = ?session.role,
            "session changed"
        );
    }

    async fn emit_registration_submitted(&self, role: Role, draft: RegistrationDraft) {
        let output = ShellOutput::RegistrationSubmitted {
            at: Utc::now(),
            role,
            draft,
        };
        if let Err(err) = self.writer.write(&output) {
            tracing::error!(error = %err, "failed to write registration output");
        }
    }
}
