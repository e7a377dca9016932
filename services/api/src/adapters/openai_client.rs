//! services/api/src/adapters/openai_client.rs
//!
//! Builds the one OpenAI client shared by the text and speech adapters.

use crate::config::Config;
use async_openai::{config::OpenAIConfig, Client};
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

/// Creates the client from configuration.
///
/// The request timeout is applied to every call, and the client's built-in
/// retry on 429 and 5xx answers is switched off: a failed call is mapped and
/// returned on the first attempt.
pub fn openai_client(config: &Config) -> Result<Client<OpenAIConfig>, reqwest::Error> {
    let mut openai_config = OpenAIConfig::new().with_api_key(config.openai_api_key.as_str());
    if let Some(org) = &config.openai_organization {
        openai_config = openai_config.with_org_id(org.as_str());
    }
    if let Some(base) = &config.openai_api_base {
        openai_config = openai_config.with_api_base(base.as_str());
    }

    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let no_retry = ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();

    Ok(Client::with_config(openai_config)
        .with_http_client(http_client)
        .with_backoff(no_retry))
}
