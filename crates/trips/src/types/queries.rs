//! Query parameter types for the trip report endpoints.
//!
//! Every parameter arrives as a raw string. A value that does not parse as an
//! integer disables its filter instead of failing the request. Handlers extract
//! the query string as a list of pairs, which always decodes; when a parameter
//! repeats, its first occurrence wins.

use utoipa::IntoParams;

use crate::query_builder::DEFAULT_STATION_LIMIT;

/// Query string pairs in request order.
pub type QueryPairs = Vec<(String, String)>;

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// Parses an optional integer parameter, ignoring surrounding whitespace.
pub fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// Narrows a parsed integer to the group-key type. Values outside `i32` can never
/// match a group, so they map to a filter that matches nothing.
fn key_filter(raw: Option<&str>) -> Option<KeyFilter> {
    parse_int(raw).map(|n| match i32::try_from(n) {
        Ok(v) => KeyFilter::Equals(v),
        Err(_) => KeyFilter::Impossible,
    })
}

/// A post-aggregation equality filter on an integer group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFilter {
    Equals(i32),
    Impossible,
}

impl KeyFilter {
    pub fn matches(&self, key: Option<i32>) -> bool {
        match self {
            KeyFilter::Equals(v) => key == Some(*v),
            KeyFilter::Impossible => false,
        }
    }
}

/// Applies an optional filter; `None` matches every row.
pub fn passes(filter: Option<KeyFilter>, key: Option<i32>) -> bool {
    filter.is_none_or(|f| f.matches(key))
}

/// Parameters for trips by hour (1.2).
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HourQuery {
    /// Hour of day, 0-23.
    pub hour: Option<String>,
}

impl HourQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            hour: first_value(pairs, "hour"),
        }
    }

    pub fn hour_filter(&self) -> Option<KeyFilter> {
        key_filter(self.hour.as_deref())
    }
}

/// Parameters for top start stations (1.4).
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StationLimitQuery {
    /// Number of stations to return. Defaults to 10; values below 1 are treated as 1.
    pub limit: Option<String>,
}

impl StationLimitQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            limit: first_value(pairs, "limit"),
        }
    }

    pub fn limit(&self) -> i64 {
        parse_int(self.limit.as_deref())
            .unwrap_or(DEFAULT_STATION_LIMIT)
            .max(1)
    }
}

/// Parameters for trips by hour and weekday (1.5).
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HourWeekdayQuery {
    /// Hour of day, 0-23.
    pub hour: Option<String>,
    /// Day of week, 1 = Sunday through 7 = Saturday.
    pub day: Option<String>,
}

impl HourWeekdayQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            hour: first_value(pairs, "hour"),
            day: first_value(pairs, "day"),
        }
    }

    pub fn hour_filter(&self) -> Option<KeyFilter> {
        key_filter(self.hour.as_deref())
    }

    pub fn day_filter(&self) -> Option<KeyFilter> {
        key_filter(self.day.as_deref())
    }
}
