use chrono::NaiveDate;

/// Number of forecast cards shown next to the current-conditions card.
pub const FORECAST_CARDS: usize = 3;

/// Short weather label plus the provider's icon reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub text: String,
    /// Usually protocol-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    pub icon: String,
}

impl Condition {
    /// Icon reference as an absolute https URL.
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub uv: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationInfo {
    pub name: String,
    pub region: String,
    pub country: String,
    /// Local time at the location as reported by the provider (`YYYY-MM-DD H:MM`).
    pub localtime: String,
}

impl LocationInfo {
    /// "Rome, Lazio, Italy"; blank parts are left out.
    pub fn full_name(&self) -> String {
        [&self.name, &self.region, &self.country]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub avgtemp_c: f64,
    pub avghumidity: f64,
    pub maxwind_kph: f64,
    pub uv: f64,
    pub daily_chance_of_rain: u8,
    pub condition: Condition,
}

/// Complete result of one lookup: current conditions merged with the forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub location: LocationInfo,
    pub forecast: Vec<ForecastDay>,
}

impl WeatherSnapshot {
    /// Forecast days worth a card of their own.
    ///
    /// Day 0 is today and already covered by the current-conditions card, so
    /// this is at most days 1..=3.
    pub fn visible_forecast(&self) -> &[ForecastDay] {
        let end = self.forecast.len().min(FORECAST_CARDS + 1);
        self.forecast.get(1..end).unwrap_or(&[])
    }

    pub fn todays_chance_of_rain(&self) -> Option<u8> {
        self.forecast.first().map(|day| day.daily_chance_of_rain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn condition(text: &str) -> Condition {
        Condition {
            text: text.to_string(),
            icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
        }
    }

    pub fn forecast_day(date: &str, chance_of_rain: u8) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid fixture date"),
            avgtemp_c: 18.4,
            avghumidity: 61.0,
            maxwind_kph: 14.8,
            uv: 5.0,
            daily_chance_of_rain: chance_of_rain,
            condition: condition("Patchy rain nearby"),
        }
    }

    pub fn snapshot(name: &str, condition_text: &str, days: usize) -> WeatherSnapshot {
        let dates = ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05"];
        WeatherSnapshot {
            current: CurrentConditions {
                temp_c: 21.0,
                humidity: 48,
                wind_kph: 9.4,
                uv: 6.0,
                condition: condition(condition_text),
            },
            location: LocationInfo {
                name: name.to_string(),
                region: "Lazio".to_string(),
                country: "Italy".to_string(),
                localtime: "2024-05-01 14:30".to_string(),
            },
            forecast: dates
                .iter()
                .take(days)
                .enumerate()
                .map(|(i, d)| forecast_day(d, (i as u8) * 10))
                .collect(),
        }
    }
}
