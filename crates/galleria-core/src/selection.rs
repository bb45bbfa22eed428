//! Selection set independent of the loaded page, plus the bulk-selection
//! text parser.

use std::collections::BTreeSet;
use std::sync::Mutex;

/// The set of identifiers the user has marked.
///
/// Membership is independent of whether the identified record is currently
/// loaded; an identifier may be selected while its record is off-screen.
/// The set is mutated only by explicit user actions — a completing fetch
/// never clears or resets it.
///
/// All methods take `&self`: mutations are synchronous, in-memory, and safe
/// to call at any time, including while a fetch is in flight.
#[derive(Debug, Default)]
pub struct SelectionSet {
    ids: Mutex<BTreeSet<u64>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure membership test.
    pub fn is_selected(&self, id: u64) -> bool {
        self.lock().contains(&id)
    }

    /// Insert if absent, remove if present. Two toggles of the same id
    /// cancel out.
    pub fn toggle(&self, id: u64) {
        let mut ids = self.lock();
        if !ids.remove(&id) {
            ids.insert(id);
        }
    }

    /// Discard prior contents and install the given identifiers.
    ///
    /// Duplicates collapse on insertion (set semantics). An empty sequence
    /// clears the selection. This is full replacement, not union.
    pub fn replace_all<I>(&self, ids: I)
    where
        I: IntoIterator<Item = u64>,
    {
        *self.lock() = ids.into_iter().collect();
    }

    /// Empty the set.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Sorted snapshot of the selected identifiers, for display.
    pub fn ids(&self) -> Vec<u64> {
        self.lock().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<u64>> {
        self.ids.lock().expect("selection set mutex poisoned")
    }
}

/// Parse a comma-separated bulk-selection entry.
///
/// Tokens are trimmed and parsed as unsigned integers; tokens that fail to
/// parse (non-numeric, empty) are silently discarded — never surfaced as an
/// error. Order and duplicates of the valid tokens are preserved; the
/// selection set dedups on insertion. Empty input yields an empty sequence,
/// which clears the selection when fed to [`SelectionSet::replace_all`].
pub fn parse_bulk_spec(text: &str) -> Vec<u64> {
    text.split(',')
        .filter_map(|token| token.trim().parse::<u64>().ok())
        .collect()
}
