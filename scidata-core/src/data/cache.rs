//! Download directory in front of a block provider.
//!
//! Layout: `{cache_dir}/{SOURCE}/{file_name}.txt`
//!
//! - A day whose text file is already present is served from disk
//! - Fresh downloads are written atomically (write to .tmp, rename into place)
//! - Offline mode never calls the inner provider
//! - Files downloaded during this run can be removed afterwards with
//!   [`CachedProvider::clear_downloads`]; files that were already present
//!   are left alone

use super::provider::{BlockProvider, DayFile, FetchError};
use crate::domain::{DayWindow, SourceSpec};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub struct CachedProvider<P> {
    inner: P,
    cache_dir: PathBuf,
    offline: bool,
    downloaded: Mutex<Vec<PathBuf>>,
}

impl<P: BlockProvider> CachedProvider<P> {
    pub fn new(inner: P, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            cache_dir: cache_dir.into(),
            offline: false,
            downloaded: Mutex::new(Vec::new()),
        }
    }

    /// Serve only what is already on disk.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of a day's text file: `{cache_dir}/{SOURCE}/{file_name}`
    pub fn day_path(&self, source: &SourceSpec, day: &DayWindow) -> PathBuf {
        self.cache_dir
            .join(&source.name)
            .join(source.file_name_for(day))
    }

    /// Files written by this provider so far.
    pub fn downloaded(&self) -> Vec<PathBuf> {
        self.downloaded
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Delete every file downloaded during this run. Returns how many were removed.
    pub fn clear_downloads(&self) -> usize {
        let paths = match self.downloaded.lock() {
            Ok(mut d) => std::mem::take(&mut *d),
            Err(_) => return 0,
        };
        let mut removed = 0;
        for path in paths {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => debug!(path = %path.display(), error = %e, "could not remove download"),
            }
        }
        removed
    }

    fn store(&self, path: &Path, file: &DayFile) -> Result<(), FetchError> {
        let io_err = |e: std::io::Error| FetchError::Io {
            path: path.display().to_string(),
            source: e,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let tmp_path = path.with_extension("txt.tmp");
        fs::write(&tmp_path, &file.text).map_err(io_err)?;
        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            io_err(e)
        })?;
        if let Ok(mut d) = self.downloaded.lock() {
            d.push(path.to_path_buf());
        }
        Ok(())
    }
}

impl<P: BlockProvider> BlockProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&self, source: &SourceSpec, day: &DayWindow) -> Result<DayFile, FetchError> {
        let path = self.day_path(source, day);
        let file_name = source.file_name_for(day);

        if path.is_file() {
            info!(source = %source.name, file = %file_name, "file has been already downloaded");
            let text = fs::read(&path).map_err(|e| FetchError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            return Ok(DayFile {
                file_name,
                text: String::from_utf8_lossy(&text).into_owned(),
            });
        }

        if self.offline {
            return Err(FetchError::NotCached { file_name });
        }

        let file = self.inner.fetch(source, day)?;
        self.store(&path, &file)?;
        Ok(file)
    }
}
