// Client-side registry of submitted jobs
use crate::error::MaipError;
use crate::file_manager::{read_json_file, write_json_file};
use crate::models::{TrackedJob, JOB_ID_PREFIX};
use crate::utils::get_job_registry_json_path;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::HashMap;
use std::path::PathBuf;

/// The service discards jobs after this long; tracking them locally
/// past that point only produces dead links.
const RETENTION_DAYS: i64 = 7;

const KEY_SEPARATOR: &str = " | ";

/// Registry keys are `<job_id> | <filename>`, percent-encoded so that
/// separator and escape characters in filenames survive the round trip.
const KEY_ESCAPE: &AsciiSet = &CONTROLS.add(b' ').add(b'%').add(b'|').add(b'"');

/// Durable string key/value storage for the job registry. Injected so
/// the tracker never touches ambient state directly.
pub trait JobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, MaipError>;
    fn set(&self, key: &str, value: &str) -> Result<(), MaipError>;
    fn entries(&self) -> Result<Vec<(String, String)>, MaipError>;
}

/// Registry persisted as a JSON object in the app data directory.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<HashMap<String, String>, MaipError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        read_json_file(&self.path)
    }
}

impl JobStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, MaipError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MaipError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        write_json_file(&self.path, &entries)
    }

    fn entries(&self) -> Result<Vec<(String, String)>, MaipError> {
        Ok(self.load()?.into_iter().collect())
    }
}

pub struct JobTracker {
    store: Box<dyn JobStore>,
}

impl JobTracker {
    pub fn new(store: Box<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Tracker over the registry file in the app data directory.
    pub fn open_default() -> Self {
        Self::new(Box::new(JsonFileStore::new(get_job_registry_json_path())))
    }

    /// Record a submission. Re-recording the same job and filename
    /// silently overwrites the previous timestamp.
    pub fn record(
        &self,
        job_id: &str,
        filename: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), MaipError> {
        let key = encode_key(job_id, filename);
        if self.store.get(&key)?.is_some() {
            debug!(
                "Re-recording job {} ({}); previous timestamp overwritten",
                job_id, filename
            );
        }
        self.store.set(&key, &submitted_at.to_rfc3339())
    }

    /// The tracked entry for a job id, if any.
    pub fn find(&self, job_id: &str) -> Result<Option<TrackedJob>, MaipError> {
        Ok(self
            .known_jobs()?
            .into_iter()
            .find(|job| job.job_id == job_id))
    }

    /// All tracked jobs still within the service retention window,
    /// newest first. Entries that do not decode to a job key are
    /// skipped, not fatal; the store may hold unrelated keys.
    pub fn known_jobs(&self) -> Result<Vec<TrackedJob>, MaipError> {
        let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);
        let mut jobs = Vec::new();

        for (key, value) in self.store.entries()? {
            let Some((job_id, filename)) = decode_key(&key) else {
                continue;
            };
            let submitted_at = match DateTime::parse_from_rfc3339(&value) {
                Ok(ts) => ts.with_timezone(&Utc),
                Err(e) => {
                    warn!("Skipping registry entry {:?} with bad timestamp: {}", key, e);
                    continue;
                }
            };
            if submitted_at < cutoff {
                continue;
            }
            jobs.push(TrackedJob {
                job_id,
                filename,
                submitted_at,
            });
        }

        jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(jobs)
    }
}

fn encode_key(job_id: &str, filename: &str) -> String {
    let raw = format!("{}{}{}", job_id, KEY_SEPARATOR, filename);
    utf8_percent_encode(&raw, KEY_ESCAPE).to_string()
}

/// Inverse of [`encode_key`]. Returns None for keys that are not
/// tracked jobs (wrong prefix, undecodable, or missing the separator).
fn decode_key(key: &str) -> Option<(String, String)> {
    let decoded = percent_decode_str(key).decode_utf8().ok()?;
    if !decoded.starts_with(JOB_ID_PREFIX) {
        return None;
    }
    let (job_id, filename) = decoded.split_once(KEY_SEPARATOR)?;
    Some((job_id.to_string(), filename.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl JobStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, MaipError> {
            Ok(self.entries.lock().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), MaipError> {
            self.entries.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn entries(&self) -> Result<Vec<(String, String)>, MaipError> {
            Ok(self.entries.lock().clone().into_iter().collect())
        }
    }

    fn tracker() -> JobTracker {
        JobTracker::new(Box::new(MemoryStore::default()))
    }

    #[test]
    fn recorded_jobs_come_back_with_their_filenames() {
        let tracker = tracker();
        let now = Utc::now();
        tracker.record("MMV-abc", "a.csv", now).unwrap();
        tracker.record("MMV-def", "b.csv", now).unwrap();

        let jobs = tracker.known_jobs().unwrap();
        assert_eq!(jobs.len(), 2);
        let mut pairs: Vec<(String, String)> = jobs
            .into_iter()
            .map(|j| (j.job_id, j.filename))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("MMV-abc".to_string(), "a.csv".to_string()),
                ("MMV-def".to_string(), "b.csv".to_string()),
            ]
        );
    }

    #[test]
    fn awkward_filenames_survive_the_key_round_trip() {
        let tracker = tracker();
        let filename = "100% pure | \"final\" batch.csv";
        tracker.record("MMV-abc", filename, Utc::now()).unwrap();

        let jobs = tracker.known_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, "MMV-abc");
        assert_eq!(jobs[0].filename, filename);
    }

    #[test]
    fn keys_without_the_job_prefix_are_ignored() {
        let store = MemoryStore::default();
        store.set("session", "xyz").unwrap();
        store
            .set("OTHER-1%20%7C%20a.csv", &Utc::now().to_rfc3339())
            .unwrap();
        let tracker = JobTracker::new(Box::new(store));
        tracker.record("MMV-abc", "a.csv", Utc::now()).unwrap();

        let jobs = tracker.known_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, "MMV-abc");
    }

    #[test]
    fn listing_is_newest_first() {
        let tracker = tracker();
        let now = Utc::now();
        tracker
            .record("MMV-old", "old.csv", now - Duration::hours(5))
            .unwrap();
        tracker.record("MMV-new", "new.csv", now).unwrap();
        tracker
            .record("MMV-mid", "mid.csv", now - Duration::hours(2))
            .unwrap();

        let ids: Vec<String> = tracker
            .known_jobs()
            .unwrap()
            .into_iter()
            .map(|j| j.job_id)
            .collect();
        assert_eq!(ids, vec!["MMV-new", "MMV-mid", "MMV-old"]);
    }

    #[test]
    fn entries_past_the_retention_window_are_dropped() {
        let tracker = tracker();
        let now = Utc::now();
        tracker
            .record("MMV-expired", "old.csv", now - Duration::days(8))
            .unwrap();
        tracker.record("MMV-live", "new.csv", now).unwrap();

        let jobs = tracker.known_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, "MMV-live");
    }

    #[test]
    fn find_returns_the_matching_entry() {
        let tracker = tracker();
        tracker.record("MMV-abc", "a.csv", Utc::now()).unwrap();
        tracker.record("MMV-def", "b.csv", Utc::now()).unwrap();

        let found = tracker.find("MMV-def").unwrap().unwrap();
        assert_eq!(found.filename, "b.csv");
        assert!(tracker.find("MMV-missing").unwrap().is_none());
    }

    #[test]
    fn re_recording_overwrites_silently() {
        let tracker = tracker();
        let first = Utc::now() - Duration::hours(1);
        let second = Utc::now();
        tracker.record("MMV-abc", "a.csv", first).unwrap();
        tracker.record("MMV-abc", "a.csv", second).unwrap();

        let jobs = tracker.known_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].submitted_at, second);
    }

    #[test]
    fn json_file_store_round_trips_on_disk() {
        let path = std::env::temp_dir().join(format!(
            "maip-registry-test-{}.json",
            uuid::Uuid::new_v4().simple()
        ));
        let store = JsonFileStore::new(path.clone());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("missing").unwrap(), None);
        let mut entries = store.entries().unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
        let _ = std::fs::remove_file(path);
    }
}
