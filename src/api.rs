// API client module: a small blocking HTTP client that sends one file to the
// hosting endpoint as a multipart form and reads the download link back from
// the plain-text response body.

use crate::config::Config;
use crate::error::{Result, TransferError};
use chrono::{Duration, Local, NaiveDate};
use reqwest::blocking::{multipart, Client};
use std::fs::File;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// What a successful upload hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub download_link: String,
    /// Upload day plus the retention window. Informational only: the server
    /// decides how long the file is actually kept.
    pub expires_on: NaiveDate,
}

/// Anything that can take a file and return a link for it.
#[cfg_attr(test, automock)]
pub trait Uploader {
    fn upload(&self, path: &Path) -> Result<UploadResult>;
}

/// Client for a transfer.sh-style endpoint.
#[derive(Clone)]
pub struct TransferClient {
    client: Client,
    upload_url: String,
    retention_days: i64,
    today: fn() -> NaiveDate,
}

impl TransferClient {
    /// Build a client from the runtime configuration.
    pub fn new(config: &Config) -> Result<Self> {
        // `None` has to be passed explicitly: the blocking client otherwise
        // falls back to its own 30 second default.
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(TransferClient::with_client(client, config))
    }

    /// Use an already configured reqwest client.
    pub fn with_client(client: Client, config: &Config) -> Self {
        TransferClient {
            client,
            upload_url: config.upload_url.clone(),
            retention_days: config.retention_days,
            today: local_today,
        }
    }

    /// Replace the source of the upload date.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl Uploader for TransferClient {
    fn upload(&self, path: &Path) -> Result<UploadResult> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TransferError::invalid_path(path, "has no file name"))?;
        let size = file_size(path)?;

        println!(
            "\nSending file: {} (size of the file: {:.2} MB)",
            file_name,
            megabytes(size)
        );

        // The form field is keyed by the file's base name; the server uses
        // it to name the download.
        let file = File::open(path).map_err(|e| TransferError::invalid_path(path, &e.to_string()))?;
        let part = multipart::Part::reader_with_length(file, size).file_name(file_name.clone());
        let form = multipart::Form::new().part(file_name, part);

        // Expiry counts from when the upload started, not when it finished.
        let uploaded_on = (self.today)();
        log::info!("POST {} ({} bytes)", self.upload_url, size);
        let res = self.client.post(&self.upload_url).multipart(form).send()?;

        let status = res.status();
        log::debug!("upload response status: {status}");
        if !status.is_success() {
            let txt = res.text().unwrap_or_default();
            return Err(TransferError::Upload(format!("{} - {}", status, txt.trim())));
        }

        let body = res.text()?;
        let download_link = body.trim().to_string();
        if download_link.is_empty() {
            return Err(TransferError::Upload("server returned an empty response".into()));
        }

        Ok(UploadResult {
            download_link,
            expires_on: expiry_date(uploaded_on, self.retention_days),
        })
    }
}

/// The day an upload made on `uploaded_on` is expected to disappear.
pub fn expiry_date(uploaded_on: NaiveDate, retention_days: i64) -> NaiveDate {
    uploaded_on + Duration::days(retention_days)
}

pub fn file_size(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| TransferError::invalid_path(path, &e.to_string()))
}

/// Decimal megabytes, the unit shown to the user.
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1_000_000.0
}
