//! Text rendering of the dashboard. A pure function of the state and the
//! wall clock; no decisions are made here.

use std::fmt::Write;

use chrono::NaiveDateTime;
use skycast_core::{
    DashboardState, Tab,
    assets::{BackgroundSelection, LivestreamSelection},
    format::{format_date, format_date_time},
    state::Conditions,
};

const RULE: &str = "────────────────────────────────────────────";

pub fn render(state: &DashboardState, now: NaiveDateTime) -> String {
    let mut out = String::new();

    if let Some(Conditions { livestream: LivestreamSelection::Stream(id), .. }) = state.conditions() {
        let _ = writeln!(out, "▶ Livestream: {}", id.embed_url());
    }

    let _ = writeln!(out, "Your location: {}", state.query());

    if let Some(err) = state.input_error() {
        let _ = writeln!(out, "! {err}");
    }
    if let Some(err) = state.location_error() {
        let _ = writeln!(out, "! {err}");
    }
    if state.is_loading() {
        let _ = writeln!(out, "Fetching weather...");
    }

    if let Some(conditions) = state.conditions() {
        render_current(&mut out, conditions, now);
    }

    if let Some(alert) = state.alert() {
        let _ = writeln!(out, "✔ {}", alert.message);
    }

    if let Some(conditions) = state.conditions() {
        render_forecast(&mut out, conditions);
    }

    if let Some(err) = state.livestream_error() {
        let _ = writeln!(out, "! {err}");
    }

    render_navigation(&mut out, state);

    if state.is_history_open() {
        render_history(&mut out, state);
    }

    out
}

fn render_current(out: &mut String, conditions: &Conditions, now: NaiveDateTime) {
    let snap = &conditions.snapshot;
    let current = &snap.current;

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Weather in {}", snap.location.full_name());
    let _ = writeln!(out, "{}", format_date_time(now));
    let _ = writeln!(out, "Local time: {}", conditions.local_time);
    if let BackgroundSelection::Video(video) = conditions.background {
        let _ = writeln!(out, "Background: {}", video.path());
    }
    let _ = writeln!(out, "{} ({})", current.condition.text, current.condition.icon_url());
    let _ = writeln!(out, "Temperature: {}°C", current.temp_c);
    let _ = writeln!(out, "Humidity: {}%", current.humidity);
    let _ = writeln!(out, "Wind speed: {} km/h", current.wind_kph);
    let _ = writeln!(out, "UV index: {}", current.uv);
    if let Some(chance) = snap.todays_chance_of_rain() {
        let _ = writeln!(out, "Chance of rain today: {chance}%");
    }
    let _ = writeln!(out, "{RULE}");
}

fn render_forecast(out: &mut String, conditions: &Conditions) {
    for day in conditions.snapshot.visible_forecast() {
        let _ = writeln!(out, "Forecast for {}", format_date(day.date));
        let _ = writeln!(out, "  {} °C", day.avgtemp_c);
        let _ = writeln!(out, "  {} ({})", day.condition.text, day.condition.icon_url());
        let _ = writeln!(out, "  Humidity: {} %", day.avghumidity);
        let _ = writeln!(out, "  Wind: {} km/h", day.maxwind_kph);
        let _ = writeln!(out, "  UV index: {}", day.uv);
        let _ = writeln!(out, "  Chance of precipitation: {} %", day.daily_chance_of_rain);
    }
}

fn render_navigation(out: &mut String, state: &DashboardState) {
    let entries: Vec<String> = Tab::all()
        .iter()
        .map(|tab| {
            let label = tab.label();
            match tab {
                Tab::Locate if !state.can_locate() => format!("({label})"),
                _ if *tab == state.tab() => format!("[{label}]"),
                _ => label.to_string(),
            }
        })
        .collect();

    let _ = writeln!(out, "{}", entries.join("  |  "));
}

fn render_history(out: &mut String, state: &DashboardState) {
    let history = state.history();
    if history.is_empty() {
        let _ = writeln!(out, "  (No history entries)");
        return;
    }
    for (i, entry) in history.entries().iter().enumerate() {
        let _ = writeln!(out, "  {}. {entry}", i + 1);
    }
}
