//! Spreadsheet-facing helpers: rendering a looked-up value as cell text, and
//! the recalculation trigger a host can call to mark a sheet as changed.

use std::io;

use chrono::Local;
use serde_json::Value;

/// Cell the recalculation trigger writes to.
pub const RECALC_CELL: &str = "A1";

/// Renders a JSON value the way a spreadsheet cell shows it.
///
/// Strings are unquoted, `null` is an empty cell, numbers and booleans keep
/// their JSON spelling. Arrays and objects fall back to compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// The spreadsheet side of the recalculation trigger.
pub trait RecalcHost {
    /// Writes `text` into `cell`.
    fn write_cell(&mut self, cell: &str, text: &str) -> io::Result<()>;

    /// Commits pending writes so dependent cells recalculate.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes the current local time into [`RECALC_CELL`] and flushes.
///
/// Hosts skip recalculation of functions whose arguments did not change; a
/// cell that changes on every trigger can be passed as an extra argument to
/// force a refresh. Returns the text written, or the first host error.
pub fn trigger_recalc<H: RecalcHost + ?Sized>(host: &mut H) -> io::Result<String> {
    let stamp = Local::now().format("%H:%M:%S%.3f %:z").to_string();
    host.write_cell(RECALC_CELL, &stamp)?;
    host.flush()?;
    Ok(stamp)
}
