use std::net::IpAddr;
use std::path::PathBuf;
use anyhow::{anyhow, Context};
use structopt::StructOpt;
use wxobs::api;
use wxobs::config::Config;

#[macro_use] extern crate log;

#[derive(Debug, StructOpt)]
#[structopt(name = "wxobs", about = "Serves Met Office hourly observations as a TSV download")]
struct Cli {
    /// config file
    #[structopt(long = "config", short = "c", default_value = "config.yaml", parse(from_os_str))]
    config_file: PathBuf,

    /// listen address, overrides server.address
    #[structopt(long)]
    address: Option<IpAddr>,

    /// listen port, overrides server.port
    #[structopt(long)]
    port: Option<u16>,

    /// DataPoint key, overrides datapoint.apiKey
    #[structopt(long, env = "DATAPOINT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(address) = self.address {
            config.server.address = address;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(api_key) = &self.api_key {
            config.datapoint.api_key = api_key.clone();
        }
    }
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {

  std::env::var("RUST_LOG").map_err(|_| {
      std::env::set_var("RUST_LOG", "error,wxobs=info");
  }).unwrap_or_default();
  env_logger::init();

  let args = Cli::from_args();

  let mut config = Config::load(&args.config_file)
      .with_context(|| format!("Failed to load config {}", args.config_file.display()))?;
  args.apply(&mut config);
  config.validate()?;

  info!("Serving on {}:{}", config.server.address, config.server.port);

  match api::build(&config)?.launch().await {
    Ok(_) => Ok(()),
    Err(e) => {
      error!("Error launching server : {:?}", e);
      Err(anyhow!("Error launching server : {}", e))
    }
  }
}
