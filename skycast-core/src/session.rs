//! Drives a [`DashboardState`] against real (or stubbed) collaborators.
//!
//! All state changes happen on the task that owns the `Session`. Network
//! work and the alert timer run as spawned tasks whose outcome comes back as
//! an [`Action`]. Dropping the session aborts whatever is still running, so
//! no timer fires into a torn-down dashboard.

use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::{
    geo::{PositionSource, ReverseGeocoder, resolve_city},
    provider::WeatherProvider,
    state::{Action, DashboardState, Effect, Tab, reduce},
};

#[derive(Debug)]
pub struct Session {
    state: DashboardState,
    provider: Arc<dyn WeatherProvider>,
    position: Arc<dyn PositionSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
    /// Fetches and location lookups.
    work: JoinSet<Action>,
    timers: JoinSet<Action>,
}

impl Session {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        position: Arc<dyn PositionSource>,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        Self {
            state: DashboardState::new(),
            provider,
            position,
            geocoder,
            work: JoinSet::new(),
            timers: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        for effect in reduce(&mut self.state, action) {
            self.spawn(effect);
        }
    }

    pub fn submit(&mut self, city: impl Into<String>) {
        self.dispatch(Action::Submit(city.into()));
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.dispatch(Action::SelectTab(tab));
    }

    pub fn close_history(&mut self) {
        self.dispatch(Action::CloseHistory);
    }

    fn spawn(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch { seq, city } => {
                let provider = Arc::clone(&self.provider);
                self.work.spawn(async move {
                    match provider.fetch(&city).await {
                        Ok(snapshot) => Action::FetchResolved { seq, city, snapshot },
                        Err(err) => {
                            tracing::warn!("Weather lookup for {city} failed: {err:#}");
                            Action::FetchFailed { seq }
                        }
                    }
                });
            }
            Effect::Locate => {
                let position = Arc::clone(&self.position);
                let geocoder = Arc::clone(&self.geocoder);
                self.work.spawn(async move {
                    match resolve_city(position.as_ref(), geocoder.as_ref()).await {
                        Ok(city) => Action::LocateResolved(city),
                        Err(err) => {
                            tracing::warn!("Location lookup failed: {err}");
                            Action::LocateFailed(err)
                        }
                    }
                });
            }
            Effect::ExpireAlert { id, after } => {
                self.timers.spawn(async move {
                    tokio::time::sleep(after).await;
                    Action::AlertExpired(id)
                });
            }
        }
    }

    /// Wait until no fetch or location lookup is outstanding, including any
    /// follow-up work they trigger. Timers keep running.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.work.join_next().await {
            self.absorb(joined);
        }
    }

    /// Apply whatever has already completed without waiting.
    pub fn apply_ready(&mut self) {
        while let Some(joined) = self.work.try_join_next() {
            self.absorb(joined);
        }
        while let Some(joined) = self.timers.try_join_next() {
            self.absorb(joined);
        }
    }

    fn absorb(&mut self, joined: Result<Action, JoinError>) {
        match joined {
            Ok(action) => self.dispatch(action),
            Err(err) if err.is_cancelled() => {}
            Err(err) => tracing::error!("Background task failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{InputError, LocateError},
        geo::position::{FixedPosition, NoPosition},
        model::{Coordinates, WeatherSnapshot, fixtures::snapshot},
        state::{ALERT_DURATION, LocatorState},
    };
    use async_trait::async_trait;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    /// Answers every city except "Atlantis"; "Slowtown" takes a while.
    #[derive(Debug, Default)]
    struct StubProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch(&self, city: &str) -> anyhow::Result<WeatherSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match city {
                "Atlantis" => anyhow::bail!("WeatherAPI current request failed with status 400"),
                "Slowtown" => tokio::time::sleep(Duration::from_millis(500)).await,
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
            Ok(snapshot(city, "Sunny", 4))
        }
    }

    #[derive(Debug)]
    struct StubGeocoder;

    #[async_trait]
    impl ReverseGeocoder for StubGeocoder {
        async fn city_for(&self, _coords: Coordinates) -> anyhow::Result<String> {
            Ok("New York".to_string())
        }
    }

    const MANHATTAN: Coordinates = Coordinates { latitude: 40.7831, longitude: -73.9712 };

    fn session_with(position: Arc<dyn PositionSource>) -> (Session, Arc<StubProvider>) {
        let provider = Arc::new(StubProvider::default());
        let session = Session::new(provider.clone(), position, Arc::new(StubGeocoder));
        (session, provider)
    }

    fn session() -> (Session, Arc<StubProvider>) {
        session_with(Arc::new(FixedPosition::new(MANHATTAN)))
    }

    #[tokio::test(start_paused = true)]
    async fn blank_submission_never_reaches_the_network() {
        let (mut session, provider) = session();

        session.submit("   ");
        session.settle().await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.state().input_error(), Some(&InputError::EmptyQuery));
    }

    #[tokio::test(start_paused = true)]
    async fn submission_lands_a_snapshot() {
        let (mut session, provider) = session();

        session.submit("Rome");
        assert!(session.state().is_loading());
        session.settle().await;

        let conditions = session.state().conditions().expect("conditions must be set");
        assert_eq!(conditions.snapshot.location.name, "Rome");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(!session.state().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_lookup_still_records_history() {
        let (mut session, _provider) = session();

        session.submit("Atlantis");
        session.settle().await;

        assert!(session.state().conditions().is_none());
        assert_eq!(session.state().input_error(), Some(&InputError::LocationNotFound));
        assert_eq!(session.state().history().entries(), ["Atlantis"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slower_older_request_cannot_overwrite_newer_one() {
        let (mut session, provider) = session();

        session.submit("Slowtown");
        session.submit("Oslo");
        session.settle().await;

        let conditions = session.state().conditions().expect("conditions must be set");
        assert_eq!(conditions.snapshot.location.name, "Oslo");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn locate_submits_and_alert_expires_after_two_seconds() {
        let (mut session, provider) = session();

        session.select_tab(Tab::Locate);
        session.settle().await;

        let state = session.state();
        assert_eq!(state.locator(), LocatorState::Resolved);
        assert_eq!(state.query(), "New York");
        assert!(state.alert().is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(state.conditions().is_some());

        tokio::time::sleep(ALERT_DURATION - Duration::from_millis(100)).await;
        session.apply_ready();
        assert!(session.state().alert().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        session.apply_ready();
        assert!(session.state().alert().is_none());

        session.select_tab(Tab::Locate);
        session.settle().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_session_cancels_the_alert_timer() {
        let metrics = tokio::runtime::Handle::current().metrics();
        let (mut session, _provider) = session();

        session.select_tab(Tab::Locate);
        session.settle().await;
        assert!(session.state().alert().is_some());
        assert_eq!(metrics.num_alive_tasks(), 1);

        drop(session);
        tokio::time::sleep(ALERT_DURATION * 2).await;
        assert_eq!(metrics.num_alive_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_position_capability_surfaces_an_error() {
        let (mut session, provider) = session_with(Arc::new(NoPosition));

        session.select_tab(Tab::Locate);
        session.settle().await;

        let state = session.state();
        assert_eq!(state.location_error(), Some(&LocateError::Unsupported));
        assert!(state.can_locate());
        assert!(state.alert().is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
