use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uom::si::f64::{Time, Velocity};

use crate::model::error::SearchError;
use crate::search::DEPARTURE_STEP;
use rondo_core::model::TransitMode;

/// routing parameters for one range-RAPTOR search.
///
/// `from_time` and `to_time` are seconds since midnight on `date`; the
/// engine departs once per minute in the half-open window
/// `[from_time, to_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub from_time: i32,
    pub to_time: i32,
    pub date: NaiveDate,
    /// cap on transit boardings
    pub max_rides: u32,
    pub max_trip_duration_minutes: u32,
    /// walk budget per transfer leg
    pub max_walk_time_minutes: u32,
    pub walk_speed_meters_per_second: f64,
    pub transit_modes: HashSet<TransitMode>,
    #[serde(default = "default_draws")]
    pub monte_carlo_draws_per_minute: u32,
    #[serde(default)]
    pub monte_carlo_seed: Option<u64>,
    #[serde(default)]
    pub retain_paths: bool,
}

fn default_draws() -> u32 {
    1
}

impl SearchRequest {
    /// deserializes and validates a request from a user query value.
    pub fn from_json(value: &serde_json::Value) -> Result<SearchRequest, SearchError> {
        let request: SearchRequest = serde_json::from_value(value.clone()).map_err(|e| {
            SearchError::InvalidRequest(format!("failed to deserialize search request: {e}"))
        })?;
        request.validate()?;
        Ok(request)
    }

    /// fail fast on configuration errors before any search work.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.from_time < 0 {
            return Err(SearchError::InvalidRequest(format!(
                "from_time {} is before midnight",
                self.from_time
            )));
        }
        if self.to_time <= self.from_time {
            return Err(SearchError::InvalidRequest(format!(
                "departure window [{}, {}) is empty or inverted",
                self.from_time, self.to_time
            )));
        }
        if self.to_time - self.from_time < DEPARTURE_STEP {
            return Err(SearchError::InvalidRequest(format!(
                "departure window [{}, {}) is shorter than one departure step",
                self.from_time, self.to_time
            )));
        }
        if self.monte_carlo_draws_per_minute == 0 {
            return Err(SearchError::InvalidRequest(
                "monte_carlo_draws_per_minute must be at least 1".to_string(),
            ));
        }
        if self.transit_modes.is_empty() {
            return Err(SearchError::InvalidRequest(
                "transit_modes must name at least one mode".to_string(),
            ));
        }
        if !self.walk_speed_meters_per_second.is_finite()
            || self.walk_speed_meters_per_second <= 0.0
        {
            return Err(SearchError::InvalidRequest(format!(
                "walk speed {} m/s is not a positive finite value",
                self.walk_speed_meters_per_second
            )));
        }
        Ok(())
    }

    /// number of departure minutes in the window.
    pub fn time_window_minutes(&self) -> u32 {
        ((self.to_time - self.from_time) / DEPARTURE_STEP) as u32
    }

    pub fn total_iterations(&self) -> u32 {
        self.time_window_minutes() * self.monte_carlo_draws_per_minute
    }

    pub fn max_trip_duration_seconds(&self) -> i32 {
        self.max_trip_duration_minutes as i32 * 60
    }

    /// walk budget per transfer leg as a time quantity.
    pub fn max_walk_time(&self) -> Time {
        Time::new::<uom::si::time::minute>(self.max_walk_time_minutes as f64)
    }

    /// duration cap as a time quantity.
    pub fn max_trip_duration(&self) -> Time {
        Time::new::<uom::si::time::minute>(self.max_trip_duration_minutes as f64)
    }

    pub fn walk_speed(&self) -> Velocity {
        Velocity::new::<uom::si::velocity::meter_per_second>(self.walk_speed_meters_per_second)
    }

    /// integer walk parameters consumed by the transfer relaxation hot loop.
    pub fn walk_speed_millimeters_per_second(&self) -> i32 {
        (self.walk_speed_meters_per_second * 1000.0) as i32
    }

    pub fn max_walk_millimeters(&self) -> i32 {
        (self.walk_speed_meters_per_second * self.max_walk_time_minutes as f64 * 60.0 * 1000.0)
            as i32
    }
}
