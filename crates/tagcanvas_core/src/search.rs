use canvas_logging::canvas_debug;

use crate::Tag;

/// Fragments shorter than this never trigger a lookup.
pub const MIN_QUERY_CHARS: usize = 2;

/// Identity of one suggestion lookup. Only the most recent one may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SearchToken(pub u64);

/// Autocomplete input and its current candidate list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    fragment: String,
    current: SearchToken,
    candidates: Vec<Tag>,
    loading: bool,
}

impl SearchState {
    /// Records a new fragment and supersedes any lookup in flight.
    ///
    /// Returns the token for the lookup to issue, or `None` when the fragment
    /// is too short to search (the candidate list is cleared immediately).
    pub fn begin(&mut self, fragment: String) -> Option<SearchToken> {
        self.current = SearchToken(self.current.0 + 1);
        let searchable = fragment.chars().count() >= MIN_QUERY_CHARS;
        self.fragment = fragment;
        if searchable {
            self.loading = true;
            Some(self.current)
        } else {
            self.loading = false;
            self.candidates.clear();
            None
        }
    }

    /// Applies lookup results if `token` still identifies the latest lookup.
    pub fn complete(&mut self, token: SearchToken, candidates: Vec<Tag>) -> bool {
        if token != self.current || !self.loading {
            canvas_debug!(
                "Discarding stale suggestions token={} current={}",
                token.0,
                self.current.0
            );
            return false;
        }
        self.candidates = candidates;
        self.loading = false;
        true
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn candidates(&self) -> &[Tag] {
        &self.candidates
    }

    pub fn candidate(&self, index: usize) -> Option<&Tag> {
        self.candidates.get(index)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
