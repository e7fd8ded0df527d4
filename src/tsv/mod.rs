//! Flattening of an [`ObservationSet`] into a tab-separated document.
//!
//! One row per location, ordered by country then location name. Values are
//! copied verbatim from the upstream payload; anything missing or unusable is
//! written as [`NA`]. A location is never dropped.

pub mod weather_type;

use std::collections::BTreeMap;
use serde_json::{Map, Value};
use crate::providers::json::{LocationReport, ObservationSet, Reading};

pub const NA: &str = "NA";

/// Short codes of one reading, in column order. `W` is the weather type code.
pub const REPORT_KEYS: [&str; 12] = ["T", "S", "D", "G", "V", "P", "Pt", "H", "U", "Pp", "F", "W"];

pub const HEADER: [&str; 18] = [
    "Latitude",
    "Longitude",
    "Country",
    "Location",
    "Temperature (C)",
    "Wind Speed (mph)",
    "Wind Direction",
    "Wind Gust (mph)",
    "Visibility (m)",
    "Pressure (hPa)",
    "Pressure Tendency",
    "Humidity",
    "UV Index",
    "Precipitation Probability (%)",
    "Feels-like Temperature",
    "Weather Type",
    "Weather Description",
    "Elevation (m)",
];

/// Case-insensitive order, raw text as tie-break.
type SortKey = (String, String);

fn sort_key(raw: String) -> SortKey {
    (raw.to_lowercase(), raw)
}

type Grouped<'a> = BTreeMap<SortKey, BTreeMap<SortKey, &'a LocationReport>>;

/// Groups locations by country then name. A repeated (country, name) pair keeps the last location.
pub fn group(observations: &ObservationSet) -> Grouped<'_> {
    let mut countries: Grouped<'_> = BTreeMap::new();

    for site in observations.locations() {
        let country = render(&site.country).unwrap_or_default();
        let name = render(&site.name).unwrap_or_default();

        countries
            .entry(sort_key(country))
            .or_default()
            .insert(sort_key(name), site);
    }

    countries
}

pub fn rows(observations: &ObservationSet) -> Vec<Vec<String>> {
    group(observations)
        .iter()
        .flat_map(|((_, country), sites)| {
            sites.iter().map(move |((_, name), site)| row(country, name, site))
        })
        .collect()
}

/// The whole document: header line then one line per location, no trailing newline.
pub fn reformat(observations: &ObservationSet) -> Vec<u8> {
    let mut lines = vec![HEADER.join("\t")];
    lines.extend(rows(observations).iter().map(|row| row.join("\t")));

    lines.join("\n").into_bytes()
}

fn row(country: &str, name: &str, site: &LocationReport) -> Vec<String> {
    let mut values = Vec::with_capacity(HEADER.len());

    values.push(render_or_na(&site.lat));
    values.push(render_or_na(&site.lon));
    values.push(title_or_na(country));
    values.push(title_or_na(name));

    match site.reading() {
        Reading::Single(rep) => values.extend(reading_values(rep)),
        Reading::MultiPeriod => {
            warn!("Multiple periods for `{}, {}` are not supported, writing NA", name, country);
            values.extend(missing_reading());
        }
        Reading::Missing => {
            debug!("No reading for `{}, {}`", name, country);
            values.extend(missing_reading());
        }
    }

    values.push(render_or_na(&site.elevation));
    values
}

fn reading_values(rep: &Map<String, Value>) -> impl Iterator<Item = String> + '_ {
    let readings = REPORT_KEYS
        .iter()
        .map(move |key| rep.get(*key).map(render_or_na).unwrap_or_else(|| NA.to_string()));

    let description = rep
        .get("W")
        .and_then(weather_type::describe_value)
        .unwrap_or(NA)
        .to_string();

    readings.chain(std::iter::once(description))
}

fn missing_reading() -> impl Iterator<Item = String> {
    std::iter::repeat(NA.to_string()).take(REPORT_KEYS.len() + 1)
}

/// Text of a scalar JSON value as it appeared upstream.
pub fn render(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn render_or_na(value: &Value) -> String {
    render(value).unwrap_or_else(|| NA.to_string())
}

fn title_or_na(raw: &str) -> String {
    if raw.is_empty() {
        NA.to_string()
    } else {
        title_case(raw)
    }
}

/// Upper-cases a letter that follows a non-letter, lower-cases every other letter.
///
/// `ST. MARY'S` becomes `St. Mary'S`, the apostrophe counting as a word break.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut after_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }

    out
}
