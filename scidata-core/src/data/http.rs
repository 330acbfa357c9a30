//! HTTP and local-file block provider.
//!
//! Expands the source's URL template for the day and fetches it:
//! - `http://` / `https://` with a blocking reqwest client
//! - `file://` straight from disk
//!
//! Plain `.txt` payloads are used as-is; `.zip` payloads are unpacked and
//! their text entry read. No retries: a failed day is a fetch gap.

use super::provider::{BlockProvider, DayFile, FetchError};
use crate::domain::{DayWindow, SourceSpec};
use std::io::{Cursor, Read};
use std::time::Duration;
use zip::ZipArchive;

pub struct HttpProvider {
    client: reqwest::blocking::Client,
}

impl HttpProvider {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scidata/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let network = |e: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };
        let resp = self.client.get(url).send().map_err(network)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().map_err(network)?.to_vec())
    }
}

/// Read the raw bytes behind a URL.
fn read_url(provider: &HttpProvider, url: &str) -> Result<Vec<u8>, FetchError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        provider.get(url)
    } else if let Some(path) = url.strip_prefix("file://") {
        std::fs::read(path).map_err(|e| FetchError::Io {
            path: path.to_string(),
            source: e,
        })
    } else {
        Err(FetchError::UnsupportedScheme {
            url: url.to_string(),
        })
    }
}

/// Turn a downloaded payload into the day's text file.
///
/// `remote_name` is the last segment of the URL; archives yield their first
/// `.txt` entry (or their first entry if none ends in `.txt`).
pub fn decode_payload(remote_name: &str, bytes: Vec<u8>) -> Result<DayFile, FetchError> {
    if remote_name.ends_with(".txt") {
        return Ok(DayFile {
            file_name: remote_name.to_string(),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    let Some(stem) = remote_name.strip_suffix(".zip") else {
        return Err(FetchError::UnsupportedFormat {
            file_name: remote_name.to_string(),
        });
    };

    let zip_err = |e: zip::result::ZipError| FetchError::Zip {
        file_name: remote_name.to_string(),
        message: e.to_string(),
    };
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(zip_err)?;
    if archive.is_empty() {
        return Err(FetchError::Zip {
            file_name: remote_name.to_string(),
            message: "archive is empty".into(),
        });
    }

    let text_entry = archive
        .file_names()
        .find(|n| n.to_ascii_lowercase().ends_with(".txt"))
        .map(str::to_string);
    let mut entry = match text_entry {
        Some(name) => archive.by_name(&name),
        None => archive.by_index(0),
    }
    .map_err(zip_err)?;
    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut raw).map_err(|e| FetchError::Io {
        path: format!("{remote_name}!{}", entry.name()),
        source: e,
    })?;

    Ok(DayFile {
        file_name: format!("{stem}.txt"),
        text: String::from_utf8_lossy(&raw).into_owned(),
    })
}

impl BlockProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, source: &SourceSpec, day: &DayWindow) -> Result<DayFile, FetchError> {
        let url = source.url_for(day);
        let remote_name = url.rsplit('/').next().unwrap_or(url.as_str()).to_string();
        let bytes = read_url(self, &url)?;
        decode_payload(&remote_name, bytes)
    }
}
