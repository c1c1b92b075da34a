//! Static asset lookups: background video per condition text and livestream
//! per city. Both are exact-match tables with an explicit `NoMatch` outcome.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundVideo {
    ClearSky,
    Rainy,
    Snowy,
    Cloudy,
    Sunny,
}

impl BackgroundVideo {
    pub const fn all() -> &'static [BackgroundVideo] {
        &[
            BackgroundVideo::ClearSky,
            BackgroundVideo::Rainy,
            BackgroundVideo::Snowy,
            BackgroundVideo::Cloudy,
            BackgroundVideo::Sunny,
        ]
    }

    /// Condition text this video is keyed on.
    pub fn condition(&self) -> &'static str {
        match self {
            BackgroundVideo::ClearSky => "Clear",
            BackgroundVideo::Rainy => "Light rain",
            BackgroundVideo::Snowy => "Snow",
            BackgroundVideo::Cloudy => "Overcast",
            BackgroundVideo::Sunny => "Sunny",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            BackgroundVideo::ClearSky => "/videos/clear-sky-video.mp4",
            BackgroundVideo::Rainy => "/videos/rainy-video.mp4",
            BackgroundVideo::Snowy => "/videos/snowy-video.mp4",
            BackgroundVideo::Cloudy => "/videos/cloudy-video.mp4",
            BackgroundVideo::Sunny => "/videos/sunny-video.mp4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSelection {
    Video(BackgroundVideo),
    NoMatch,
}

/// Pick the background video for a condition text. Case and whitespace matter.
pub fn background_for(condition: &str) -> BackgroundSelection {
    BackgroundVideo::all()
        .iter()
        .find(|video| video.condition() == condition)
        .map_or(BackgroundSelection::NoMatch, |video| BackgroundSelection::Video(*video))
}

const EMBED_BASE: &str = "https://www.youtube.com/embed";
const EMBED_FLAGS: &str = "autoplay=1&mute=1&controls=0&showinfo=0&modestbranding=1&rel=0";

/// Cities with a live camera feed.
const LIVESTREAMS: &[(&str, &str)] = &[("Tiflis", "_fDYKDeZC9c"), ("New York", "mOuVHSuvAbg")];

/// Video identifier on the external livestream host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivestreamId(&'static str);

impl LivestreamId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Embed URL: autoplaying, muted, no controls.
    pub fn embed_url(&self) -> String {
        format!("{EMBED_BASE}/{}?{EMBED_FLAGS}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivestreamSelection {
    Stream(LivestreamId),
    NoMatch,
}

pub fn livestream_for(city: &str) -> LivestreamSelection {
    LIVESTREAMS
        .iter()
        .find(|(name, _)| *name == city)
        .map_or(LivestreamSelection::NoMatch, |(_, id)| LivestreamSelection::Stream(LivestreamId(*id)))
}
