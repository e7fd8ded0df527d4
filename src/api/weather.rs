use std::io::Cursor;
use rocket::{get, post, routes, Request, Response, Route, State};
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use crate::error::{Error, Result};
use crate::providers::Datapoint;
use crate::timestep::TimeStep;
use crate::tsv;

pub const FILE_NAME: &str = "met_office_weather_data.tsv";

pub(crate) fn routes() -> Vec<Route> {
  routes![download_get, download_post]
}

#[get("/weather")]
async fn download_get(datapoint: &State<Datapoint>) -> Result<TsvDownload> {
  download(datapoint).await
}

#[post("/weather")]
async fn download_post(datapoint: &State<Datapoint>) -> Result<TsvDownload> {
  download(datapoint).await
}

async fn download(datapoint: &Datapoint) -> Result<TsvDownload> {
  let (time_step, observations) = datapoint.fetch().await?;

  Ok(TsvDownload {
    time_step,
    body: tsv::reformat(&observations),
  })
}

/// Reformatted observations, sent as a file attachment.
#[derive(Debug)]
pub struct TsvDownload {
  pub time_step: TimeStep,
  pub body: Vec<u8>,
}

impl<'r> Responder<'r, 'static> for TsvDownload {
  fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
    Response::build()
      .header(ContentType::new("text", "tab-separated-values"))
      .raw_header("Content-Disposition", format!("attachment; filename={}", FILE_NAME))
      .raw_header("X-Observation-Time", self.time_step.query_value())
      .sized_body(self.body.len(), Cursor::new(self.body))
      .ok()
  }
}

impl<'r> Responder<'r, 'static> for Error {
  fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
    let status = match &self {
      Error::UpstreamTimeout { .. } => Status::GatewayTimeout,
      e if e.is_upstream() => Status::BadGateway,
      _ => Status::InternalServerError,
    };

    error!("{} {} : {}", request.uri(), status, self);

    (status, format!("Could not retrieve weather data : {}\n", self)).respond_to(request)
  }
}
