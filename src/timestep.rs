use std::fmt::{Display, Formatter};
use chrono::{DateTime, Utc};

/// One entry of the upstream `TimeSteps.TS` list, e.g. `2024-05-01T10:00:00Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeStep(DateTime<Utc>);

impl TimeStep {
    /// The form the observations endpoint accepts in its `time` parameter.
    pub fn query_value(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Second-to-last step of an ordered list; the last one is usually still filling up.
    pub fn previous_of(steps: &[String]) -> Result<TimeStep, TimeStepError> {
        match steps {
            [.., previous, _] => previous.as_str().try_into(),
            _ => Err(TimeStepError::NotEnoughSteps(steps.len())),
        }
    }
}

impl Display for TimeStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%MZ"))
    }
}

impl TryFrom<&str> for TimeStep {
    type Error = TimeStepError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let time = DateTime::parse_from_rfc3339(value)
            .map_err(|e| TimeStepError::ParseError(value.to_string(), e))?;

        Ok(Self(time.with_timezone(&Utc)))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TimeStepError {
    #[error("Expected at least 2 time steps, got {0}")]
    NotEnoughSteps(usize),

    #[error("Wrong time step format `{0}`: {1}")]
    ParseError(String, chrono::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn picks_second_to_last() {
        let ts = steps(&["2024-05-01T08:00:00Z", "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z"]);

        let step = TimeStep::previous_of(&ts).unwrap();

        assert_eq!(step.query_value(), "2024-05-01T09:00:00Z");
    }

    #[test]
    fn single_step_is_rejected() {
        let err = TimeStep::previous_of(&steps(&["2024-05-01T10:00:00Z"])).unwrap_err();

        assert!(matches!(err, TimeStepError::NotEnoughSteps(1)));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = TimeStep::previous_of(&steps(&["yesterday", "today"])).unwrap_err();

        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let step = TimeStep::try_from("2024-05-01T11:00:00+01:00").unwrap();

        assert_eq!(step.query_value(), "2024-05-01T10:00:00Z");
        assert_eq!(step.to_string(), "2024-05-01 10:00Z");
    }
}
