//! Manual content selector: debounced, sequenced domain search plus the
//! ordered selection of content ids for manual carousels.
//!
//! The selector never owns the selection. Callers pass a read-only snapshot
//! and receive the updated list through a callback, which only fires when
//! the list actually changed.

use std::time::{Duration, Instant};

use crate::carousel::Domain;
use crate::content::{ContentSearchResult, LookupError, LookupRegistry};
use crate::types::ContentId;

/// Input inactivity required before a search runs.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// A search whose debounce window elapsed and that should now be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub domain: Domain,
    pub term: String,
}

/// What happened to a search response handed to [`ManualSelector::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results replaced; carries the number of results now shown.
    Applied(usize),
    /// A newer search was issued (or the search was cancelled); the response
    /// was discarded.
    Stale,
    /// The lookup failed; previous results were kept.
    Failed(LookupError),
}

#[derive(Debug)]
struct PendingSearch {
    term: String,
    deadline: Instant,
}

/// Incremental search state for one domain picker.
#[derive(Debug)]
pub struct ManualSelector {
    domain: Domain,
    window: Duration,
    pending: Option<PendingSearch>,
    last_issued: u64,
    /// Responses with a sequence at or below this value are discarded.
    invalidated_through: u64,
    results: Vec<ContentSearchResult>,
    last_error: Option<String>,
}

impl ManualSelector {
    pub fn new(domain: Domain) -> Self {
        Self::with_window(domain, DEBOUNCE_WINDOW)
    }

    /// Create a selector with a custom debounce window.
    pub fn with_window(domain: Domain, window: Duration) -> Self {
        Self {
            domain,
            window,
            pending: None,
            last_issued: 0,
            invalidated_through: 0,
            results: Vec::new(),
            last_error: None,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Switch to another domain. Results from the previous domain are
    /// cleared and in-flight searches become stale.
    pub fn set_domain(&mut self, domain: Domain) {
        if self.domain != domain {
            self.domain = domain;
            self.cancel();
        }
    }

    pub fn results(&self) -> &[ContentSearchResult] {
        &self.results
    }

    /// User-visible message of the most recent failed search, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a debounced search is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending search becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Record a keystroke. Restarts the debounce window; only the latest
    /// term survives. A blank term cancels the search.
    pub fn input(&mut self, term: &str, now: Instant) {
        if term.trim().is_empty() {
            self.cancel();
            return;
        }
        self.pending = Some(PendingSearch {
            term: term.trim().to_string(),
            deadline: now + self.window,
        });
    }

    /// Issue the pending search if its window has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let due = self.pending.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        self.last_issued += 1;
        tracing::trace!(seq = self.last_issued, term = %pending.term, "Search issued");
        Some(SearchTicket {
            seq: self.last_issued,
            domain: self.domain,
            term: pending.term,
        })
    }

    /// Apply the response for the search with sequence `seq`.
    pub fn apply(
        &mut self,
        seq: u64,
        response: Result<Vec<ContentSearchResult>, LookupError>,
    ) -> SearchOutcome {
        if seq < self.last_issued || seq <= self.invalidated_through {
            tracing::debug!(seq, latest = self.last_issued, "Discarding stale search response");
            return SearchOutcome::Stale;
        }

        match response {
            Ok(results) => {
                self.results = results;
                self.last_error = None;
                SearchOutcome::Applied(self.results.len())
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "Content search failed");
                self.last_error = Some(format!("Search failed: {err}"));
                SearchOutcome::Failed(err)
            }
        }
    }

    /// Cancel the search: drop any pending input, clear results and make
    /// every in-flight response stale.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.invalidated_through = self.last_issued;
        self.results.clear();
        self.last_error = None;
    }

    /// Wait for the pending search's window, run it against `registry`, and
    /// apply the response. Returns `None` when nothing was pending.
    ///
    /// One-shot driver for callers that own the selector exclusively: the
    /// selector is borrowed for the whole wait, so keystrokes cannot arrive
    /// in between. Interactive callers feed [`input`](Self::input) and
    /// [`poll`](Self::poll) from their own timer instead. Dropping the
    /// future before the window elapses leaves the search pending.
    pub async fn run_pending(&mut self, registry: &LookupRegistry) -> Option<SearchOutcome> {
        let deadline = self.deadline()?;
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;

        let ticket = self.poll(Instant::now().max(deadline))?;
        let response = registry.search(ticket.domain, &ticket.term).await;
        Some(self.apply(ticket.seq, response))
    }

    /// Add `id` to the selection. Fires `on_change` only when `id` was not
    /// already selected.
    pub fn select(
        &self,
        snapshot: &[ContentId],
        id: &str,
        on_change: impl FnOnce(Vec<ContentId>),
    ) {
        if let Some(updated) = with_selected(snapshot, id) {
            on_change(updated);
        }
    }

    /// Remove `id` from the selection. Fires `on_change` only when `id` was
    /// selected.
    pub fn remove(
        &self,
        snapshot: &[ContentId],
        id: &str,
        on_change: impl FnOnce(Vec<ContentId>),
    ) {
        if let Some(updated) = without(snapshot, id) {
            on_change(updated);
        }
    }

    /// Move `id` one position towards the front (`up`) or back.
    pub fn reorder(
        &self,
        snapshot: &[ContentId],
        id: &str,
        up: bool,
        on_change: impl FnOnce(Vec<ContentId>),
    ) {
        if let Some(updated) = moved(snapshot, id, up) {
            on_change(updated);
        }
    }

    pub fn move_up(
        &self,
        snapshot: &[ContentId],
        id: &str,
        on_change: impl FnOnce(Vec<ContentId>),
    ) {
        self.reorder(snapshot, id, true, on_change);
    }

    pub fn move_down(
        &self,
        snapshot: &[ContentId],
        id: &str,
        on_change: impl FnOnce(Vec<ContentId>),
    ) {
        self.reorder(snapshot, id, false, on_change);
    }
}

/// `snapshot` with `id` appended, or `None` if already present.
pub fn with_selected(snapshot: &[ContentId], id: &str) -> Option<Vec<ContentId>> {
    if snapshot.iter().any(|s| s == id) {
        return None;
    }
    let mut updated = snapshot.to_vec();
    updated.push(id.to_string());
    Some(updated)
}

/// `snapshot` without `id`, or `None` if absent.
pub fn without(snapshot: &[ContentId], id: &str) -> Option<Vec<ContentId>> {
    let position = snapshot.iter().position(|s| s == id)?;
    let mut updated = snapshot.to_vec();
    updated.remove(position);
    Some(updated)
}

/// `snapshot` with `id` swapped with its neighbour, or `None` at the edges.
pub fn moved(snapshot: &[ContentId], id: &str, up: bool) -> Option<Vec<ContentId>> {
    let position = snapshot.iter().position(|s| s == id)?;
    let target = if up {
        position.checked_sub(1)?
    } else {
        let next = position + 1;
        if next >= snapshot.len() {
            return None;
        }
        next
    };
    let mut updated = snapshot.to_vec();
    updated.swap(position, target);
    Some(updated)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::content::test_helpers::{item, FailingLookup};
    use crate::content::StaticLookup;
    use assert_matches::assert_matches;

    fn ids(values: &[&str]) -> Vec<ContentId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // -- debounce ------------------------------------------------------------

    #[test]
    fn keystrokes_within_window_issue_one_search_for_last_term() {
        let mut selector = ManualSelector::new(Domain::Team);
        let t0 = Instant::now();

        selector.input("a", t0);
        assert!(selector.poll(t0 + ms(50)).is_none());
        selector.input("ab", t0 + ms(100));
        assert!(selector.poll(t0 + ms(150)).is_none());
        selector.input("abc", t0 + ms(200));

        // 300 ms after "a" but only 100 ms after "abc".
        assert!(selector.poll(t0 + ms(300)).is_none());

        let mut issued = Vec::new();
        for step in 0..10 {
            if let Some(ticket) = selector.poll(t0 + ms(400 + step * 100)) {
                issued.push(ticket);
            }
        }
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].term, "abc");
        assert_eq!(issued[0].domain, Domain::Team);
    }

    #[test]
    fn blank_input_cancels_pending_search() {
        let mut selector = ManualSelector::new(Domain::Team);
        let t0 = Instant::now();
        selector.input("fla", t0);
        selector.input("  ", t0 + ms(10));
        assert!(!selector.is_pending());
        assert!(selector.poll(t0 + ms(1000)).is_none());
    }

    // -- sequencing ------------------------------------------------------------

    #[test]
    fn older_response_is_discarded_after_newer_issue() {
        let mut selector = ManualSelector::new(Domain::Team);
        let t0 = Instant::now();

        selector.input("fla", t0);
        let first = selector.poll(t0 + ms(300)).unwrap();
        selector.input("flu", t0 + ms(400));
        let second = selector.poll(t0 + ms(700)).unwrap();

        let newer = selector.apply(second.seq, Ok(vec![item("t2", "Fluminense", Domain::Team)]));
        assert_eq!(newer, SearchOutcome::Applied(1));

        let older = selector.apply(first.seq, Ok(vec![item("t1", "Flamengo", Domain::Team)]));
        assert_eq!(older, SearchOutcome::Stale);
        assert_eq!(selector.results()[0].id, "t2");
    }

    #[test]
    fn failure_keeps_previous_results() {
        let mut selector = ManualSelector::new(Domain::Team);
        let t0 = Instant::now();

        selector.input("fla", t0);
        let ok = selector.poll(t0 + ms(300)).unwrap();
        selector.apply(ok.seq, Ok(vec![item("t1", "Flamengo", Domain::Team)]));

        selector.input("flam", t0 + ms(400));
        let failing = selector.poll(t0 + ms(700)).unwrap();
        let outcome = selector.apply(failing.seq, Err(LookupError::Failed("timeout".into())));

        assert_matches!(outcome, SearchOutcome::Failed(_));
        assert_eq!(selector.results().len(), 1);
        assert!(selector.last_error().unwrap().contains("timeout"));
    }

    #[test]
    fn cancel_clears_results_and_invalidates_in_flight() {
        let mut selector = ManualSelector::new(Domain::Team);
        let t0 = Instant::now();

        selector.input("fla", t0);
        let first = selector.poll(t0 + ms(300)).unwrap();
        selector.apply(first.seq, Ok(vec![item("t1", "Flamengo", Domain::Team)]));

        selector.input("flu", t0 + ms(400));
        let in_flight = selector.poll(t0 + ms(700)).unwrap();
        selector.cancel();

        assert!(selector.results().is_empty());
        let late = selector.apply(in_flight.seq, Ok(vec![item("t2", "Fluminense", Domain::Team)]));
        assert_eq!(late, SearchOutcome::Stale);
        assert!(selector.results().is_empty());
    }

    #[test]
    fn switching_domain_clears_results() {
        let mut selector = ManualSelector::new(Domain::Team);
        let t0 = Instant::now();
        selector.input("fla", t0);
        let ticket = selector.poll(t0 + ms(300)).unwrap();
        selector.apply(ticket.seq, Ok(vec![item("t1", "Flamengo", Domain::Team)]));

        selector.set_domain(Domain::Player);
        assert_eq!(selector.domain(), Domain::Player);
        assert!(selector.results().is_empty());
    }

    #[tokio::test]
    async fn run_pending_waits_and_applies() {
        let registry = LookupRegistry::new().with(
            Domain::Team,
            Arc::new(StaticLookup::new(vec![
                item("t1", "Flamengo", Domain::Team),
                item("t2", "Vasco", Domain::Team),
            ])),
        );
        let mut selector = ManualSelector::with_window(Domain::Team, ms(5));
        selector.input("flam", Instant::now());

        let outcome = selector.run_pending(&registry).await;
        assert_eq!(outcome, Some(SearchOutcome::Applied(1)));
        assert!(selector.run_pending(&registry).await.is_none());
    }

    #[tokio::test]
    async fn abandoned_run_pending_keeps_search_pending() {
        let registry = LookupRegistry::new().with(
            Domain::Team,
            Arc::new(StaticLookup::new(vec![item("t1", "Flamengo", Domain::Team)])),
        );
        let mut selector = ManualSelector::with_window(Domain::Team, ms(200));
        selector.input("fla", Instant::now());

        let early = tokio::time::timeout(ms(10), selector.run_pending(&registry)).await;
        assert!(early.is_err());
        assert!(selector.deadline().is_some());

        let outcome = selector.run_pending(&registry).await;
        assert_eq!(outcome, Some(SearchOutcome::Applied(1)));
    }

    #[tokio::test]
    async fn run_pending_reports_lookup_failure() {
        let registry = LookupRegistry::new().with(Domain::Team, Arc::new(FailingLookup));
        let mut selector = ManualSelector::with_window(Domain::Team, ms(1));
        selector.input("x", Instant::now());

        let outcome = selector.run_pending(&registry).await;
        assert_matches!(outcome, Some(SearchOutcome::Failed(LookupError::Failed(_))));
    }

    // -- selection -------------------------------------------------------------

    #[test]
    fn select_is_idempotent() {
        let selector = ManualSelector::new(Domain::Team);
        let mut selection: Vec<ContentId> = Vec::new();

        selector.select(&selection.clone(), "t1", |next| selection = next);
        let once = selection.clone();
        selector.select(&selection.clone(), "t1", |next| selection = next);

        assert_eq!(selection, once);
        assert_eq!(selection, ids(&["t1"]));
    }

    #[test]
    fn select_appends_in_order() {
        let selector = ManualSelector::new(Domain::Team);
        let mut selection = ids(&["t1"]);
        selector.select(&selection.clone(), "t3", |next| selection = next);
        selector.select(&selection.clone(), "t2", |next| selection = next);
        assert_eq!(selection, ids(&["t1", "t3", "t2"]));
    }

    #[test]
    fn second_remove_is_a_no_op() {
        let selector = ManualSelector::new(Domain::Team);
        let mut selection = ids(&["t1", "t2"]);
        let mut calls = 0;

        selector.remove(&selection.clone(), "t1", |next| {
            calls += 1;
            selection = next;
        });
        selector.remove(&selection.clone(), "t1", |next| {
            calls += 1;
            selection = next;
        });

        assert_eq!(calls, 1);
        assert_eq!(selection, ids(&["t2"]));
    }

    #[test]
    fn reorder_swaps_neighbours_and_stops_at_edges() {
        let snapshot = ids(&["a", "b", "c"]);
        assert_eq!(moved(&snapshot, "b", true), Some(ids(&["b", "a", "c"])));
        assert_eq!(moved(&snapshot, "b", false), Some(ids(&["a", "c", "b"])));
        assert_eq!(moved(&snapshot, "a", true), None);
        assert_eq!(moved(&snapshot, "c", false), None);
        assert_eq!(moved(&snapshot, "z", true), None);
    }

    #[test]
    fn move_down_reports_new_order_through_callback() {
        let selector = ManualSelector::new(Domain::Player);
        let snapshot = ids(&["p1", "p2"]);

        let mut reported = None;
        selector.move_down(&snapshot, "p1", |updated| reported = Some(updated));
        assert_eq!(reported, Some(ids(&["p2", "p1"])));

        let mut called = false;
        selector.move_up(&snapshot, "p1", |_| called = true);
        assert!(!called);
    }
}
