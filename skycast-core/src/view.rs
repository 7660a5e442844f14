//! Derived presentation views over a [`ForecastSet`].
//!
//! Everything here is a pure function of its input: views are recomputed
//! on demand and never cached, so calling any of them twice on the same
//! set yields identical output.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

use crate::model::{ForecastSample, ForecastSet};

/// The "now" snapshot: the nearest-term sample, i.e. the first one the
/// provider returned. No interpolation, no averaging.
pub fn current_sample(set: &ForecastSet) -> Option<&ForecastSample> {
    set.samples.first()
}

/// One representative sample per day after the first.
///
/// At the provider's fixed 3-hour cadence, sample 8 falls exactly 24 hours
/// after sample 0, at the same time of day. Selecting zero-based indices
/// `i > 0 && i % 8 == 0` therefore yields one entry per calendar day,
/// skipping sample 0 itself since it is already shown as "current".
pub fn daily_samples(set: &ForecastSet) -> Vec<&ForecastSample> {
    set.samples
        .iter()
        .enumerate()
        .filter(|(i, _)| *i > 0 && *i % 8 == 0)
        .map(|(_, sample)| sample)
        .collect()
}

/// `day/month - hour:minute` label for a sample, fields unpadded, with the
/// timestamp interpreted in the observer's local time zone.
pub fn time_label(sample: &ForecastSample) -> String {
    match DateTime::from_timestamp(sample.timestamp, 0) {
        Some(utc) => time_label_at(&utc.with_timezone(&Local)),
        None => sample.timestamp.to_string(),
    }
}

/// Same label for an already-zoned datetime, letting callers pin the zone.
pub fn time_label_at<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    format!(
        "{}/{} - {}:{}",
        datetime.day(),
        datetime.month(),
        datetime.hour(),
        datetime.minute()
    )
}

/// `day/month/year` label for the moment a forecast was fetched.
pub fn date_label<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    format!("{}/{}/{}", datetime.day(), datetime.month(), datetime.year())
}
