//! Background worker running detection submissions.
//!
//! The prediction call can take tens of seconds on a slow link, so it runs
//! off the UI thread and reports stages over a channel.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::adapters::StorageError;
use crate::application::{DetectionService, SubmissionStage};
use crate::domain::{DetectionRecord, Location};
use crate::ports::{DetectionArchive, LocalStore, PredictionService};

/// Progress updates from the detection worker.
#[derive(Debug, Clone)]
pub enum DetectionProgress {
    /// Submission moved to a new stage
    Stage(SubmissionStage),
    /// Classification finished and the record is stored locally
    Complete(DetectionRecord),
    /// Archive upload finished; `true` when the archive accepted the record
    Archived(bool),
    /// Submission failed; carries a message fit for the user
    Error(String),
}

/// Handle to a running detection worker.
pub struct DetectionWorkerHandle {
    progress_rx: Receiver<DetectionProgress>,
    _handle: JoinHandle<()>,
}

impl DetectionWorkerHandle {
    /// Next progress update, if any (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<DetectionProgress> {
        self.progress_rx.try_recv().ok()
    }
}

/// Runs submissions in the background.
pub struct DetectionWorker;

impl DetectionWorker {
    /// Spawn a background submission of the image at `path`.
    pub fn spawn<P, A, S>(
        service: Arc<DetectionService<P, A, S>>,
        path: PathBuf,
        location: Location,
    ) -> DetectionWorkerHandle
    where
        P: PredictionService + 'static,
        A: DetectionArchive + 'static,
        S: LocalStore + 'static,
        S::Error: Into<StorageError>,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, &path, &location, &tx);
        });

        DetectionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<P, A, S>(
        service: &DetectionService<P, A, S>,
        path: &std::path::Path,
        location: &Location,
        tx: &Sender<DetectionProgress>,
    ) where
        P: PredictionService + 'static,
        A: DetectionArchive + 'static,
        S: LocalStore + 'static,
        S::Error: Into<StorageError>,
    {
        let mut on_stage = |stage: SubmissionStage| {
            let _ = tx.send(DetectionProgress::Stage(stage));
        };

        match service.submit_path(path, location, &mut on_stage) {
            Ok(outcome) => {
                let _ = tx.send(DetectionProgress::Complete(outcome.record));
                let archived = matches!(outcome.persistence.join(), Some(Ok(_)));
                let _ = tx.send(DetectionProgress::Archived(archived));
            }
            Err(e) => {
                let _ = tx.send(DetectionProgress::Error(e.user_message()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteLocalStore;
    use crate::application::{RecordStore, StoreLimits};
    use crate::domain::fixtures::sample_location;
    use crate::domain::{ImageUpload, RawPrediction};
    use crate::ports::{PersistReceipt, ServiceError};
    use std::time::{Duration, Instant};

    struct FixedPredictor;

    impl PredictionService for FixedPredictor {
        fn predict(&self, _image: &ImageUpload) -> Result<RawPrediction, ServiceError> {
            Ok(RawPrediction {
                result: "Parasitized".into(),
                confidence: 0.91,
            })
        }
    }

    struct OfflineArchive;

    impl DetectionArchive for OfflineArchive {
        fn persist(&self, _record: &DetectionRecord) -> Result<PersistReceipt, ServiceError> {
            Err(ServiceError::Unreachable {
                service: "archive".into(),
                message: "offline".into(),
            })
        }

        fn fetch_all(&self) -> Result<Vec<DetectionRecord>, ServiceError> {
            Ok(Vec::new())
        }
    }

    fn service() -> Arc<DetectionService<FixedPredictor, OfflineArchive, SqliteLocalStore>> {
        let backend = SqliteLocalStore::in_memory().expect("Should create db");
        Arc::new(DetectionService::new(
            Arc::new(FixedPredictor),
            Arc::new(OfflineArchive),
            RecordStore::new(Arc::new(backend), StoreLimits::default()),
        ))
    }

    fn drain(handle: &DetectionWorkerHandle) -> Vec<DetectionProgress> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            match handle.try_recv() {
                Some(p) => {
                    let done = matches!(p, DetectionProgress::Archived(_) | DetectionProgress::Error(_));
                    seen.push(p);
                    if done {
                        break;
                    }
                }
                None => std::thread::sleep(Duration::from_millis(5)),
            }
        }
        seen
    }

    #[test]
    fn test_worker_reports_stages_then_result() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let path = dir.path().join("smear.png");
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        std::fs::write(&path, bytes).expect("Should write image");

        let handle = DetectionWorker::spawn(service(), path, sample_location());
        let seen = drain(&handle);

        assert!(matches!(
            seen.first(),
            Some(DetectionProgress::Stage(SubmissionStage::Validating))
        ));
        let record = seen.iter().find_map(|p| match p {
            DetectionProgress::Complete(r) => Some(r.clone()),
            _ => None,
        });
        assert_eq!(record.map(|r| r.confidence_level), Some(91));
        assert!(matches!(seen.last(), Some(DetectionProgress::Archived(false))));
    }

    #[test]
    fn test_worker_reports_missing_file() {
        let handle = DetectionWorker::spawn(
            service(),
            PathBuf::from("/nonexistent/smear.png"),
            sample_location(),
        );
        let seen = drain(&handle);
        assert!(matches!(seen.last(), Some(DetectionProgress::Error(_))));
        assert!(!seen.iter().any(|p| matches!(p, DetectionProgress::Complete(_))));
    }
}
