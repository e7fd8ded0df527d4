//! Shapes of the DataPoint `wxobs` payloads.
//!
//! The upstream collapses single-element lists into bare values, so `TS` goes
//! through [`OneOrMany`] and `Location` through `location_reports`.
//! Per-location fields stay as raw JSON values because they are written out
//! verbatim.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => vec![value],
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Capabilities {
    pub resource: Resource,
}

#[derive(Deserialize, Debug)]
pub struct Resource {
    #[serde(rename = "dataDate", default)]
    pub data_date: Option<String>,
    #[serde(rename = "TimeSteps")]
    pub time_steps: TimeSteps,
}

#[derive(Deserialize, Debug)]
pub struct TimeSteps {
    #[serde(rename = "TS")]
    pub ts: OneOrMany<String>,
}

/// Full response of the observations endpoint for one time step.
#[derive(Deserialize, Debug)]
pub struct ObservationSet {
    #[serde(rename = "SiteRep")]
    pub site_rep: SiteRep,
}

#[derive(Deserialize, Debug)]
pub struct SiteRep {
    #[serde(rename = "DV")]
    pub dv: DataValues,
}

#[derive(Deserialize, Debug)]
pub struct DataValues {
    #[serde(rename = "Location", default, deserialize_with = "location_reports")]
    pub location: Vec<LocationReport>,
}

impl ObservationSet {
    pub fn locations(&self) -> &[LocationReport] {
        &self.site_rep.dv.location
    }
}

/// Every entry of `Location` is one location, whatever its shape.
///
/// Entries are decoded one by one so a single bad entry cannot make the list
/// fall back to the bare-object form.
fn location_reports<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LocationReport>, D::Error> {
    let reports = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(entries) => entries.into_iter().map(LocationReport::from_value).collect(),
        entry => vec![LocationReport::from_value(entry)],
    };

    Ok(reports)
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LocationReport {
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lon: Value,
    #[serde(default)]
    pub country: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub elevation: Value,
    #[serde(rename = "Period", default)]
    pub period: Value,
}

/// The reading record held under `Period.Rep`, as far as it can be used.
#[derive(Debug, PartialEq)]
pub enum Reading<'a> {
    Single(&'a Map<String, Value>),
    /// `Period` or `Rep` is a list: several periods, not flattened.
    MultiPeriod,
    Missing,
}

impl LocationReport {
    /// A non-object entry becomes a location with every field missing.
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn reading(&self) -> Reading<'_> {
        match &self.period {
            Value::Object(period) => match period.get("Rep") {
                Some(Value::Object(rep)) => Reading::Single(rep),
                Some(Value::Array(_)) => Reading::MultiPeriod,
                _ => Reading::Missing,
            },
            Value::Array(_) => Reading::MultiPeriod,
            _ => Reading::Missing,
        }
    }
}
