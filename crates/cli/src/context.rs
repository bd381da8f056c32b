//! Builds the client from CLI flags layered over environment config.

use std::time::Duration;

use anyhow::Context as _;
use secrecy::SecretString;
use ssrs_client::SsrsClient;
use ssrs_config::ConfigLoader;

use crate::args::Cli;

pub fn build_client(cli: &Cli) -> anyhow::Result<SsrsClient> {
    let mut loader = ConfigLoader::new();
    if let Some(url) = &cli.url {
        loader = loader.base_url(url.clone());
    }
    if let Some(username) = &cli.username {
        loader = loader.username(username.clone());
    }
    if let Some(password) = &cli.password {
        loader = loader.password(SecretString::new(password.clone().into()));
    }
    if let Some(domain) = &cli.domain {
        loader = loader.domain(domain.clone());
    }
    if let Some(root) = &cli.root_folder {
        loader = loader.root_folder(root.clone());
    }
    if let Some(secs) = cli.timeout {
        loader = loader.timeout(Duration::from_secs(secs));
    }
    if cli.skip_verify {
        loader = loader.skip_verify(true);
    }

    let config = loader.load().context("loading configuration")?;
    SsrsClient::from_config(&config).context("building client")
}
