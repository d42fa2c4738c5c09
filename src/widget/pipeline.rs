use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::debounce::{Debounced, Deferred};
use crate::error::AppError;
use crate::search::RepoSearch;
use crate::widget::{RefreshOutcome, SearchWidget};

pub type SharedWidget = Arc<Mutex<SearchWidget>>;

/// Runs one autocomplete refresh for `text`.
///
/// The widget lock is never held across the network call, so the saved panel
/// stays usable while a search is in flight.
pub async fn refresh_autocomplete(
    widget: &SharedWidget,
    search: &dyn RepoSearch,
    text: String,
) -> Result<()> {
    let pending = {
        let mut w = widget.lock().await;
        match w.begin_refresh(&text) {
            Some(pending) => pending,
            None => return Ok(()),
        }
    };

    let raw = match search.search(&pending.text).await {
        Ok(raw) => raw,
        Err(err) => {
            let mut w = widget.lock().await;
            if w.fail_refresh(&pending) {
                return Err(err);
            }
            return Ok(());
        }
    };

    let mut w = widget.lock().await;
    if let RefreshOutcome::Rendered(rows) = w.finish_refresh(&pending, &raw)? {
        debug!(rows, "refresh done");
    }
    Ok(())
}

/// The debounced refresh bound to one widget and one search backend.
pub fn autocomplete_trigger(
    widget: SharedWidget,
    search: Arc<dyn RepoSearch>,
    delay: Duration,
) -> Debounced<String, Result<()>> {
    Debounced::new(delay, move |text: String| {
        let widget = widget.clone();
        let search = search.clone();
        async move { refresh_autocomplete(&widget, search.as_ref(), text).await }
    })
}

/// Waits for a debounced refresh and turns known failures into notices.
///
/// Returns `Ok(true)` when the refresh ran, `Ok(false)` when it was
/// superseded. Errors outside the taxonomy are handed back to the caller.
pub async fn handle_input(deferred: Deferred<Result<()>>, widget: &SharedWidget) -> Result<bool> {
    let Some(result) = deferred.await else {
        return Ok(false);
    };
    match result {
        Ok(()) => Ok(true),
        Err(err) => match err.downcast_ref::<AppError>() {
            Some(app) => {
                let mut w = widget.lock().await;
                w.report_error(app, Instant::now());
                Ok(true)
            }
            None => Err(err),
        },
    }
}
