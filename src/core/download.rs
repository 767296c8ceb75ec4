//! File download for the shipped-locales manifest

use std::fs;
use std::path::Path;

use crate::core::error::{BumpResult, DownloadError};

/// Fetches a URL to a local file. Trait seam so pipeline tests can inject a
/// fake instead of hitting the network.
pub trait Downloader {
  fn fetch(&self, url: &str, dest: &Path) -> BumpResult<()>;
}

/// Blocking HTTP downloader
pub struct HttpDownloader;

impl Downloader for HttpDownloader {
  fn fetch(&self, url: &str, dest: &Path) -> BumpResult<()> {
    let response = reqwest::blocking::get(url).map_err(|e| DownloadError {
      url: url.to_string(),
      reason: e.to_string(),
    })?;

    if !response.status().is_success() {
      return Err(
        DownloadError {
          url: url.to_string(),
          reason: format!("HTTP {}", response.status()),
        }
        .into(),
      );
    }

    let body = response.bytes().map_err(|e| DownloadError {
      url: url.to_string(),
      reason: e.to_string(),
    })?;

    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(dest, &body)?;

    Ok(())
  }
}
