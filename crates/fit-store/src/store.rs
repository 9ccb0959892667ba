//! File-backed store over a data directory.
//!
//! Layout:
//!
//! ```text
//! <data_dir>/<user>-<YYYY-MM>.log   workout collection for one month
//! <data_dir>/<user>-weights.log     weight history
//! <data_dir>/profile.toml           last-used display name
//! ```
//!
//! Every save is a full-replace write. Loads report skipped lines through
//! [`DecodeReport`]; a file that exists but is not valid UTF-8 degrades to
//! an empty collection with a diagnostic rather than failing the load.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use fit_core::entities::{WeightRecord, Workout};
use fit_core::month::MonthKey;

use crate::codec::{self, DecodeReport};
use crate::error::StoreError;

/// Contents of `profile.toml`.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    name: String,
}

pub struct WorkoutStore {
    data_dir: PathBuf,
}

impl WorkoutStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
            path: data_dir.clone(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn month_path(&self, username: &str, month: MonthKey) -> PathBuf {
        self.data_dir
            .join(format!("{}-{month}.log", sanitize(username)))
    }

    #[must_use]
    pub fn weights_path(&self, username: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}-weights.log", sanitize(username)))
    }

    fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.toml")
    }

    /// Load one month's workout collection.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when no file exists for the period (distinct
    /// from an empty collection); `StoreError::Io` for other read failures.
    pub fn load_month(
        &self,
        username: &str,
        month: MonthKey,
    ) -> Result<(Vec<Workout>, DecodeReport), StoreError> {
        let path = self.month_path(username, month);
        let Some(text) = read_lossy(&path)? else {
            let mut report = DecodeReport::default();
            report_unreadable(&mut report, &path);
            return Ok((Vec::new(), report));
        };

        let decoded = codec::decode_month(&text, month, username);
        if let Some(stored) = decoded.username.as_deref() {
            if stored != username {
                tracing::warn!(
                    path = %path.display(),
                    stored,
                    expected = username,
                    "month file carries a different username"
                );
            }
        }
        for skipped in &decoded.report.skipped {
            tracing::warn!(
                path = %path.display(),
                line = skipped.line_no,
                reason = %skipped.reason,
                "skipped malformed record"
            );
        }
        tracing::debug!(
            path = %path.display(),
            workouts = decoded.workouts.len(),
            "loaded month collection"
        );

        Ok((decoded.workouts, decoded.report))
    }

    /// Replace one month's workout collection on disk.
    ///
    /// # Errors
    ///
    /// `StoreError::Io` if the write fails; in-memory state is the caller's
    /// to keep, so a failed save is reportable and retryable.
    pub fn save_month(
        &self,
        username: &str,
        month: MonthKey,
        workouts: &[Workout],
    ) -> Result<(), StoreError> {
        let path = self.month_path(username, month);
        let text = codec::encode_month(username, workouts);
        fs::write(&path, text).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            workouts = workouts.len(),
            "saved month collection"
        );
        Ok(())
    }

    /// Load a user's weight history.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when the user has no weight file yet;
    /// `StoreError::Io` for other read failures.
    pub fn load_weights(
        &self,
        username: &str,
    ) -> Result<(Vec<WeightRecord>, DecodeReport), StoreError> {
        let path = self.weights_path(username);
        let Some(text) = read_lossy(&path)? else {
            let mut report = DecodeReport::default();
            report_unreadable(&mut report, &path);
            return Ok((Vec::new(), report));
        };

        let (records, report) = codec::decode_weights(&text);
        for skipped in &report.skipped {
            tracing::warn!(
                path = %path.display(),
                line = skipped.line_no,
                reason = %skipped.reason,
                "skipped malformed weight record"
            );
        }
        Ok((records, report))
    }

    /// Replace a user's weight history on disk.
    ///
    /// # Errors
    ///
    /// `StoreError::Io` if the write fails.
    pub fn save_weights(
        &self,
        username: &str,
        records: &[WeightRecord],
    ) -> Result<(), StoreError> {
        let path = self.weights_path(username);
        let text = codec::encode_weights(records);
        fs::write(&path, text).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })
    }

    /// The last-used display name, if one was saved.
    ///
    /// An unreadable or malformed profile file is treated as absent (with a
    /// warning), never as a fatal error.
    ///
    /// # Errors
    ///
    /// `StoreError::Io` for read failures other than "file missing".
    pub fn load_display_name(&self) -> Result<Option<String>, StoreError> {
        let path = self.profile_path();
        let text = match read_lossy(&path) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!(path = %path.display(), "profile file is not valid UTF-8");
                return Ok(None);
            }
            Err(StoreError::NotFound { .. }) => return Ok(None),
            Err(other) => return Err(other),
        };

        match toml::from_str::<ProfileFile>(&text) {
            Ok(profile) if !profile.name.trim().is_empty() => Ok(Some(profile.name)),
            Ok(_) => Ok(None),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "unreadable profile file");
                Ok(None)
            }
        }
    }

    /// Persist the display name.
    ///
    /// # Errors
    ///
    /// `StoreError::Io` if the write fails.
    pub fn save_display_name(&self, name: &str) -> Result<(), StoreError> {
        let path = self.profile_path();
        let text = toml::to_string(&ProfileFile {
            name: name.to_string(),
        })?;
        fs::write(&path, text).map_err(|source| StoreError::Io { path, source })
    }
}

/// Read a file as UTF-8. `Ok(None)` means the file exists but is not valid
/// UTF-8 (the caller degrades to an empty collection); a missing file is
/// the typed `NotFound`.
fn read_lossy(path: &Path) -> Result<Option<String>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) if source.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => Ok(None),
    }
}

fn report_unreadable(report: &mut DecodeReport, path: &Path) {
    tracing::warn!(path = %path.display(), "file is not valid UTF-8; treating as empty");
    report.skipped.push(crate::codec::SkippedLine {
        line_no: 0,
        content: path.display().to_string(),
        reason: "file is not valid UTF-8".to_string(),
    });
}

fn sanitize(username: &str) -> String {
    username
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
