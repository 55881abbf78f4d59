pub mod balance;
pub mod derivatives;
pub mod market;
pub mod sentiment;
pub mod ui;

use tracing::debug;

/// The one error policy of the rendering layer: log the diagnostic, return
/// `None`, and let the table show a placeholder cell for the row.
pub(crate) fn ok_or_logged<T>(label: &str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Fetch failed for {label}: {e:#}");
            None
        }
    }
}
