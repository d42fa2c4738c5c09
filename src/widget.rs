pub mod autocomplete;
pub mod controller;
pub mod notice;
pub mod pipeline;
pub mod saved;


pub use autocomplete::AutocompleteList;
pub use controller::{Focus, PipelineState, RefreshOutcome, SearchWidget, SelectOutcome};
pub use notice::{NoticeAnchor, NoticeBoard, NoticeStyle};
pub use pipeline::{SharedWidget, autocomplete_trigger, handle_input};
pub use saved::{AddOutcome, SavedList, SavedRepo};

/// Removes rows by index and returns them in their original order.
///
/// `targets` may be a single index, an `Option<usize>` (nothing to do when
/// `None`), or any sequence of indices. Out-of-range and repeated targets are
/// ignored.
pub fn clean<T>(rows: &mut Vec<T>, targets: impl IntoIterator<Item = usize>) -> Vec<T> {
    let mut idx: Vec<usize> = targets.into_iter().filter(|&i| i < rows.len()).collect();
    idx.sort_unstable_by(|a, b| b.cmp(a));
    idx.dedup();
    let mut removed: Vec<T> = idx.into_iter().map(|i| rows.remove(i)).collect();
    removed.reverse();
    removed
}
