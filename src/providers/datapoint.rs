use reqwest::Client;
use serde::de::DeserializeOwned;
use crate::config::DatapointConfig;
use crate::error::{Error, Result, Stage};
use crate::providers::json::{Capabilities, ObservationSet};
use crate::retry::{self, Failure, RetryPolicy};
use crate::timestep::TimeStep;

/// Client for the Met Office DataPoint observations (`wxobs`) feed.
#[derive(Debug, Clone)]
pub struct Datapoint {
    client: Client,
    base_url: String,
    api_key: String,
    resolution: String,
    policy: RetryPolicy,
}

impl Datapoint {
    pub fn new(config: &DatapointConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("wxobs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("cannot build HTTP client : {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            resolution: config.resolution.clone(),
            policy: RetryPolicy {
                max_attempts: config.max_attempts,
                backoff: config.backoff(),
            },
        })
    }

    /// Latest-but-one complete set of observations.
    pub async fn fetch(&self) -> Result<(TimeStep, ObservationSet)> {
        let time_step = self.previous_time_step().await?;
        let observations = self.observations(&time_step).await?;

        info!("`{}` Downloaded {} location(s)", time_step, observations.locations().len());

        Ok((time_step, observations))
    }

    pub async fn previous_time_step(&self) -> Result<TimeStep> {
        let capabilities: Capabilities = self.get_json(Stage::Capabilities, "capabilities", &[]).await?;

        if let Some(data_date) = &capabilities.resource.data_date {
            debug!("Capabilities data date {}", data_date);
        }

        let steps = capabilities.resource.time_steps.ts.into_vec();
        Ok(TimeStep::previous_of(&steps)?)
    }

    pub async fn observations(&self, time_step: &TimeStep) -> Result<ObservationSet> {
        let time = time_step.query_value();
        self.get_json(Stage::Observations, "all", &[("time", time.as_str())]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, stage: Stage, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let body = retry::with_retries(self.policy, stage, |_| self.get_text(&url, params)).await?;

        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedUpstream(format!("{} : {}", stage, e)))
    }

    async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> std::result::Result<String, Failure> {
        let response = self.client.get(url)
            .query(&[("res", self.resolution.as_str())])
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.text().await?),
            status => Err(Failure::Status(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config(server: &Server) -> DatapointConfig {
        DatapointConfig {
            base_url: server.url(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    fn capabilities_body() -> String {
        json!({"Resource": {"dataDate": "2024-05-01T11:00:00Z", "res": "hourly", "TimeSteps": {"TS": [
            "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z"
        ]}}}).to_string()
    }

    #[tokio::test]
    async fn fetches_previous_time_step() {
        let mut server = Server::new_async().await;
        let caps = server.mock("GET", "/capabilities")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("res".into(), "hourly".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(capabilities_body())
            .create_async().await;
        let all = server.mock("GET", "/all")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("res".into(), "hourly".into()),
                Matcher::UrlEncoded("time".into(), "2024-05-01T10:00:00Z".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(json!({"SiteRep": {"DV": {"Location": [
                {"name": "LERWICK", "country": "SCOTLAND", "lat": "60.139", "lon": "-1.183", "elevation": "82.0"}
            ]}}}).to_string())
            .create_async().await;

        let datapoint = Datapoint::new(&config(&server)).unwrap();
        let (time_step, observations) = datapoint.fetch().await.unwrap();

        assert_eq!(time_step.query_value(), "2024-05-01T10:00:00Z");
        assert_eq!(observations.locations().len(), 1);
        caps.assert_async().await;
        all.assert_async().await;
    }

    #[tokio::test]
    async fn capabilities_failure_stops_after_five_attempts() {
        let mut server = Server::new_async().await;
        let caps = server.mock("GET", "/capabilities")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(5)
            .create_async().await;
        let all = server.mock("GET", "/all")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async().await;

        let datapoint = Datapoint::new(&config(&server)).unwrap();
        let err = datapoint.fetch().await.unwrap_err();

        assert!(matches!(err, Error::UpstreamUnavailable { stage: Stage::Capabilities, attempts: 5, .. }));
        caps.assert_async().await;
        all.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_key_is_unavailable() {
        let mut server = Server::new_async().await;
        let _caps = server.mock("GET", "/capabilities")
            .match_query(Matcher::Any)
            .with_status(403)
            .expect(5)
            .create_async().await;

        let datapoint = Datapoint::new(&config(&server)).unwrap();
        let err = datapoint.previous_time_step().await.unwrap_err();

        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn invalid_json_is_not_retried() {
        let mut server = Server::new_async().await;
        let caps = server.mock("GET", "/capabilities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .expect(1)
            .create_async().await;

        let datapoint = Datapoint::new(&config(&server)).unwrap();
        let err = datapoint.fetch().await.unwrap_err();

        assert!(matches!(err, Error::MalformedUpstream(_)));
        caps.assert_async().await;
    }
}
