//! Dashboard state and its transition function.
//!
//! [`reduce`] maps `(state, action)` to the mutated state plus the effects
//! the caller has to run. It never does I/O and never reads the clock, so
//! every rule below is testable without a network or a runtime:
//!
//! - a blank submission only sets the input error;
//! - an accepted submission clears the previous result and every error
//!   slot, appends to history, and issues a fetch tagged with a fresh
//!   sequence number;
//! - only the fetch carrying the latest sequence number may land;
//! - the location action works once; after success it stays disabled.

use std::time::Duration;

use crate::{
    assets::{BackgroundSelection, LivestreamSelection, background_for, livestream_for},
    error::{InputError, LivestreamError, LocateError},
    format::format_local_time,
    model::WeatherSnapshot,
};

/// How long the location alert stays up.
pub const ALERT_DURATION: Duration = Duration::from_millis(2000);

/// Monotonic tag of an accepted submission.
pub type RequestSeq = u64;

pub type AlertId = u64;

/// Bottom navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Tab {
    #[default]
    History,
    /// Present in the navigation but does nothing.
    Favorites,
    Locate,
}

impl Tab {
    pub const fn all() -> &'static [Tab] {
        &[Tab::History, Tab::Favorites, Tab::Locate]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::History => "History",
            Tab::Favorites => "Favorites",
            Tab::Locate => "Get location",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocatorState {
    #[default]
    Idle,
    Locating,
    /// Terminal for the session.
    Resolved,
}

/// Every query accepted this session, oldest first. Not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory(Vec<String>);

impl SearchHistory {
    fn push(&mut self, query: String) {
        self.0.push(query);
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything derived from one successful fetch. Replaced as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub snapshot: WeatherSnapshot,
    pub local_time: String,
    pub background: BackgroundSelection,
    pub livestream: LivestreamSelection,
}

impl Conditions {
    fn derive(snapshot: WeatherSnapshot, city: &str) -> Self {
        Self {
            local_time: format_local_time(&snapshot.location.localtime),
            background: background_for(&snapshot.current.condition.text),
            livestream: livestream_for(city),
            snapshot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: AlertId,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    query: String,
    conditions: Option<Conditions>,
    history: SearchHistory,
    input_error: Option<InputError>,
    livestream_error: Option<LivestreamError>,
    location_error: Option<LocateError>,
    alert: Option<Alert>,
    tab: Tab,
    history_open: bool,
    locator: LocatorState,
    latest_seq: RequestSeq,
    pending: Option<RequestSeq>,
    last_alert_id: AlertId,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the search field.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn conditions(&self) -> Option<&Conditions> {
        self.conditions.as_ref()
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn input_error(&self) -> Option<&InputError> {
        self.input_error.as_ref()
    }

    pub fn livestream_error(&self) -> Option<&LivestreamError> {
        self.livestream_error.as_ref()
    }

    pub fn location_error(&self) -> Option<&LocateError> {
        self.location_error.as_ref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_history_open(&self) -> bool {
        self.history_open
    }

    pub fn locator(&self) -> LocatorState {
        self.locator
    }

    /// "Get location" can be triggered.
    pub fn can_locate(&self) -> bool {
        self.locator == LocatorState::Idle
    }

    /// A fetch is outstanding that is still allowed to land.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

/// Events the dashboard reacts to: user input and completed effects.
#[derive(Debug, Clone)]
pub enum Action {
    Submit(String),
    FetchResolved { seq: RequestSeq, city: String, snapshot: WeatherSnapshot },
    FetchFailed { seq: RequestSeq },
    SelectTab(Tab),
    CloseHistory,
    LocateResolved(String),
    LocateFailed(LocateError),
    AlertExpired(AlertId),
    DismissAlert,
}

/// Work the reducer asks for. The caller runs it and feeds the outcome back
/// as an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { seq: RequestSeq, city: String },
    Locate,
    ExpireAlert { id: AlertId, after: Duration },
}

pub fn reduce(state: &mut DashboardState, action: Action) -> Vec<Effect> {
    match action {
        Action::Submit(city) => submit(state, city),

        Action::FetchResolved { seq, city, snapshot } => {
            if seq != state.latest_seq {
                tracing::debug!("Dropping stale result #{seq} for {city}");
                return vec![];
            }

            state.pending = None;
            let conditions = Conditions::derive(snapshot, &city);
            if conditions.background == BackgroundSelection::NoMatch {
                state.input_error = Some(InputError::NoBackgroundVideo);
            }
            if conditions.livestream == LivestreamSelection::NoMatch {
                state.livestream_error = Some(LivestreamError::NotAvailable);
            }
            state.conditions = Some(conditions);
            vec![]
        }

        Action::FetchFailed { seq } => {
            if seq == state.latest_seq {
                state.pending = None;
                state.conditions = None;
                state.input_error = Some(InputError::LocationNotFound);
            }
            vec![]
        }

        Action::SelectTab(Tab::Locate) => {
            if state.locator != LocatorState::Idle {
                return vec![];
            }
            state.tab = Tab::Locate;
            state.locator = LocatorState::Locating;
            state.location_error = None;
            vec![Effect::Locate]
        }

        Action::SelectTab(Tab::History) => {
            state.tab = Tab::History;
            state.history_open = true;
            vec![]
        }

        Action::SelectTab(tab) => {
            state.tab = tab;
            vec![]
        }

        Action::CloseHistory => {
            state.history_open = false;
            vec![]
        }

        Action::LocateResolved(city) => {
            if state.locator != LocatorState::Locating {
                return vec![];
            }
            state.locator = LocatorState::Resolved;
            state.location_error = None;

            // Submitting clears the old alert, so the new one goes up after.
            let mut effects = submit(state, city.clone());

            state.last_alert_id += 1;
            let id = state.last_alert_id;
            state.alert = Some(Alert { id, message: format!("Your location was set to {city}!") });
            effects.push(Effect::ExpireAlert { id, after: ALERT_DURATION });
            effects
        }

        Action::LocateFailed(err) => {
            if state.locator == LocatorState::Locating {
                state.locator = LocatorState::Idle;
                state.location_error = Some(err);
            }
            vec![]
        }

        Action::AlertExpired(id) => {
            if state.alert.as_ref().is_some_and(|alert| alert.id == id) {
                state.alert = None;
            }
            vec![]
        }

        Action::DismissAlert => {
            state.alert = None;
            vec![]
        }
    }
}

fn submit(state: &mut DashboardState, city: String) -> Vec<Effect> {
    state.query = city.clone();

    let trimmed = city.trim();
    if trimmed.is_empty() {
        state.input_error = Some(InputError::EmptyQuery);
        return vec![];
    }

    let trimmed = trimmed.to_string();
    state.input_error = None;
    state.livestream_error = None;
    state.location_error = None;
    state.conditions = None;
    state.alert = None;
    state.history.push(city);

    state.latest_seq += 1;
    state.pending = Some(state.latest_seq);
    tracing::info!("Looking up weather for {trimmed} (#{})", state.latest_seq);
    vec![Effect::Fetch { seq: state.latest_seq, city: trimmed }]
}
