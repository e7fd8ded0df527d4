use serde_json::Value;

/// Met Office significant weather codes, indexed by code.
pub const WEATHER_TYPES: [&str; 31] = [
    "Clear Night",
    "Sunny Day",
    "Partly Cloudy (night)",
    "Partly Cloudy (day)",
    "Not used",
    "Mist",
    "Fog",
    "Cloudy",
    "Overcast",
    "Light Rain Shower (night)",
    "Light Rain Shower (day)",
    "Drizzle",
    "Light Rain",
    "Heavy Rain Shower (night)",
    "Heavy Rain Shower (day)",
    "Heavy Rain",
    "Sleet Shower (night)",
    "Sleet Shower (day)",
    "Sleet",
    "Hail Shower (night)",
    "Hail Shower (day)",
    "Hail",
    "Light Snow Shower (night)",
    "Light Snow Shower (day)",
    "Light Snow",
    "Heavy Show Shower (night)",
    "Heavy Snow Shower (day)",
    "Heavy Snow",
    "Thunder Shower (night)",
    "Thunder Shower (day)",
    "Thunder",
];

pub fn describe(code: usize) -> Option<&'static str> {
    WEATHER_TYPES.get(code).copied()
}

/// Decodes a `W` value, given either as `"7"` or `7`.
pub fn describe_value(value: &Value) -> Option<&'static str> {
    let code = match value {
        Value::String(s) => s.trim().parse::<usize>().ok()?,
        Value::Number(n) => usize::try_from(n.as_u64()?).ok()?,
        _ => return None,
    };

    describe(code)
}
