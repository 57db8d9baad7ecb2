//! Emitting errors as `tracing` events.

use std::error::Error as StdError;
use tracing::Level;

/// Emit `err` as an `ERROR` event.
///
/// The event carries the error text as `error` and its logging fields, as
/// JSON, as `fields`.
pub fn emit(err: &(dyn StdError + 'static)) {
    emit_at(err, Level::ERROR);
}

/// Emit `err` as an event at `level`.
pub fn emit_at(err: &(dyn StdError + 'static), level: Level) {
    let fields = crate::fields(err)
        .map(|fields| fields.to_string())
        .unwrap_or_default();

    if level == Level::ERROR {
        tracing::error!(error = %err, fields = %fields, "Error reported");
    } else if level == Level::WARN {
        tracing::warn!(error = %err, fields = %fields, "Error reported");
    } else if level == Level::INFO {
        tracing::info!(error = %err, fields = %fields, "Error reported");
    } else if level == Level::DEBUG {
        tracing::debug!(error = %err, fields = %fields, "Error reported");
    } else {
        tracing::trace!(error = %err, fields = %fields, "Error reported");
    }
}
