//! JSON output for the CLI
//!
//! One JSON object per line on stdout.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::CliResult;
use crate::failover::{Notifier, OutboundMessage, ProgressEvent};

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write any serializable value as one line
pub fn write_line<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Prints each progress event as a session would receive it
#[derive(Debug, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn broadcast(&self, event: &ProgressEvent) {
        // A closed stdout must not abort the selection
        let _ = write_line(&OutboundMessage::from(event.clone()));
    }
}
