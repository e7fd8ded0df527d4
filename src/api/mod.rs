use rocket::{get, routes, Rocket, Build};
use rocket::response::content::RawHtml;
use crate::config::Config;
use crate::error::Result;
use crate::providers::Datapoint;

mod weather;

pub fn build(config: &Config) -> Result<Rocket<Build>> {
  let datapoint = Datapoint::new(&config.datapoint)?;

  let figment = rocket::Config::figment()
    .merge(("address", config.server.address))
    .merge(("port", config.server.port));

  Ok(rocket::custom(figment)
    .manage(datapoint)
    .mount("/", routes![index])
    .mount("/request", weather::routes()))
}

#[get("/")]
fn index() -> RawHtml<String> {
  RawHtml(format!(r#"<a href="/request/weather">{}</a>"#, weather::FILE_NAME))
}

#[cfg(test)]
mod tests {
  use super::*;
  use rocket::http::{ContentType, Status};
  use rocket::local::asynchronous::Client;

  #[tokio::test]
  async fn index_links_to_download() {
    let client = Client::tracked(build(&Config::default()).unwrap()).await.unwrap();

    let response = client.get("/").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));
    let body = response.into_string().await.unwrap();
    assert!(body.contains(r#"href="/request/weather""#));
    assert!(body.contains("met_office_weather_data.tsv"));
  }
}
