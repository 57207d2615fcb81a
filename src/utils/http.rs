// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::{AppError, Result};

/// Create a configured asynchronous HTTP client.
pub fn create_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page body, rejecting non-success statuses.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::status(url, status));
    }
    Ok(response.text().await?)
}

/// Fetch a page body with a custom request timeout.
pub async fn fetch_page_with_timeout(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<String> {
    let response = client
        .get(url)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::status(url, status));
    }
    Ok(response.text().await?)
}
