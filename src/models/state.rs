/// Lifecycle of one price list (services or pujas).
///
/// `items` only ever holds the newest applied server response, or nothing
/// after a reset. All changes go through [`PriceListState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct PriceListState<E> {
    pub items: Vec<E>,
    /// True while at least one request for this list is outstanding.
    pub loading: bool,
    pub error: Option<String>,
    /// True while a pull-to-refresh fetch is outstanding.
    pub refreshing: bool,
    in_flight: usize,
    refreshes: usize,
    latest_fetch: u64,
    discarded_through: u64,
}

impl<E> Default for PriceListState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            refreshing: false,
            in_flight: 0,
            refreshes: 0,
            latest_fetch: 0,
            discarded_through: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceAction<E> {
    /// A fetch with sequence token `seq` was issued.
    FetchStarted { seq: u64, refresh: bool },
    FetchSucceeded { seq: u64, refresh: bool, items: Vec<E> },
    FetchFailed { seq: u64, refresh: bool, message: String },
    MutationStarted,
    MutationSucceeded,
    MutationFailed { message: String },
    ClearError,
    /// Empties the list and drops every fetch issued up to `through`.
    Reset { through: u64 },
}

impl<E> PriceListState<E> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Applies one action. Returns `false` when a fetch result was stale and
    /// its payload ignored.
    pub fn apply(&mut self, action: PriceAction<E>) -> bool {
        match action {
            PriceAction::FetchStarted { seq, refresh } => {
                self.latest_fetch = self.latest_fetch.max(seq);
                self.begin(refresh);
                true
            }
            PriceAction::FetchSucceeded { seq, refresh, items } => {
                self.finish(refresh);
                if !self.is_current(seq) {
                    return false;
                }
                self.items = items;
                true
            }
            PriceAction::FetchFailed {
                seq,
                refresh,
                message,
            } => {
                self.finish(refresh);
                if !self.is_current(seq) {
                    return false;
                }
                self.error = Some(message);
                true
            }
            PriceAction::MutationStarted => {
                self.begin(false);
                true
            }
            PriceAction::MutationSucceeded => {
                self.finish(false);
                true
            }
            PriceAction::MutationFailed { message } => {
                self.finish(false);
                self.error = Some(message);
                true
            }
            PriceAction::ClearError => {
                self.error = None;
                true
            }
            PriceAction::Reset { through } => {
                self.items.clear();
                self.error = None;
                self.discarded_through = self.discarded_through.max(through);
                true
            }
        }
    }

    fn begin(&mut self, refresh: bool) {
        self.in_flight += 1;
        self.loading = true;
        self.error = None;
        if refresh {
            self.refreshes += 1;
            self.refreshing = true;
        }
    }

    fn finish(&mut self, refresh: bool) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
        if refresh {
            self.refreshes = self.refreshes.saturating_sub(1);
            self.refreshing = self.refreshes > 0;
        }
    }

    // Only the newest issued fetch may land, and never one issued before a reset.
    fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_fetch && seq > self.discarded_through
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(seq: u64, items: Vec<u32>) -> PriceAction<u32> {
        PriceAction::FetchSucceeded {
            seq,
            refresh: false,
            items,
        }
    }

    fn started(seq: u64) -> PriceAction<u32> {
        PriceAction::FetchStarted {
            seq,
            refresh: false,
        }
    }

    #[test]
    fn successful_fetch_replaces_items() {
        let mut state = PriceListState::default();
        state.apply(started(1));
        assert!(state.loading);
        assert!(state.apply(fetched(1, vec![1, 2])));
        assert_eq!(state.items, vec![1, 2]);
        assert!(!state.loading);
    }

    #[test]
    fn failed_fetch_keeps_items() {
        let mut state = PriceListState::default();
        state.apply(started(1));
        state.apply(fetched(1, vec![5]));
        state.apply(started(2));
        state.apply(PriceAction::FetchFailed {
            seq: 2,
            refresh: false,
            message: "Failed to fetch service prices".into(),
        });
        assert_eq!(state.items, vec![5]);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch service prices"));
        assert!(!state.loading);
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut state = PriceListState::default();
        state.apply(started(1));
        state.apply(started(2));
        assert!(state.apply(fetched(2, vec![2])));
        assert!(state.loading);
        assert!(!state.apply(fetched(1, vec![1])));
        assert_eq!(state.items, vec![2]);
        assert!(!state.loading);
    }

    #[test]
    fn next_operation_clears_error() {
        let mut state: PriceListState<u32> = PriceListState::default();
        state.apply(PriceAction::MutationStarted);
        state.apply(PriceAction::MutationFailed {
            message: "Invalid price".into(),
        });
        assert_eq!(state.error.as_deref(), Some("Invalid price"));
        state.apply(started(1));
        assert_eq!(state.error, None);
    }

    #[test]
    fn reset_clears_and_drops_in_flight_fetches() {
        let mut state = PriceListState::default();
        state.apply(started(1));
        state.apply(fetched(1, vec![1]));
        state.error = Some("boom".into());
        state.apply(started(2));
        state.apply(PriceAction::Reset { through: 2 });
        assert!(state.items.is_empty());
        assert_eq!(state.error, None);
        assert!(!state.apply(fetched(2, vec![9])));
        assert!(state.items.is_empty());
        assert!(!state.loading);
    }

    #[test]
    fn refreshing_tracks_refresh_fetches_only() {
        let mut state: PriceListState<u32> = PriceListState::default();
        state.apply(PriceAction::FetchStarted {
            seq: 1,
            refresh: true,
        });
        assert!(state.refreshing && state.loading);
        state.apply(PriceAction::MutationStarted);
        state.apply(PriceAction::FetchSucceeded {
            seq: 1,
            refresh: true,
            items: vec![],
        });
        assert!(!state.refreshing);
        assert!(state.loading);
        state.apply(PriceAction::MutationSucceeded);
        assert!(!state.loading);
    }
}
