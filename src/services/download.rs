//! PDF download service.
//!
//! Streams a response body to disk chunk by chunk so large files are never
//! buffered whole in memory. The file lands at the target path only after
//! the stream completed; a mid-stream error removes the partial file.

use std::path::Path;

use futures::{Stream, StreamExt};
use reqwest::Client;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::utils::http::create_client;

/// Service fetching PDF files to local disk.
pub struct PdfDownloader {
    client: Client,
}

impl PdfDownloader {
    /// Create a new downloader with the given user agent and timeout.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: create_client(user_agent, timeout_secs)?,
        })
    }

    /// Download `url` to `path`, creating parent directories as needed.
    pub async fn download(&self, url: &str, path: &Path) -> Result<()> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(url, status));
        }

        stream_to_file(Box::pin(response.bytes_stream()), path).await?;
        log::info!("downloaded {} to {}", url, path.display());
        Ok(())
    }
}

/// Write a chunked byte stream to `path` via a `.part` sibling.
///
/// The rename happens only after every chunk was written and flushed, so
/// an aborted transfer never leaves a file at the target path.
pub async fn stream_to_file<S, B, E>(mut stream: S, path: &Path) -> Result<()>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<AppError>,
{
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("part");
    let mut file = tokio::fs::File::create(&tmp).await?;

    let written: Result<()> = async {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Into::into)?;
            file.write_all(chunk.as_ref()).await?;
        }
        file.flush().await?;
        Ok(())
    }
    .await;

    drop(file);

    match written {
        Ok(()) => {
            tokio::fs::rename(&tmp, path).await?;
            Ok(())
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&tmp).await;
            Err(e)
        }
    }
}
