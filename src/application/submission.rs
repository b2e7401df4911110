//! Detection submission: validate, classify, record, forward.
//!
//! The pipeline:
//! 1. Validate the image and location (no network before this passes)
//! 2. Send the image to the prediction service
//! 3. Normalize the label and confidence
//! 4. Store the record locally, update district aggregates, log the action
//! 5. Forward the record to the archive on a background thread
//!
//! A failure in step 5 is logged and never affects the returned record.

use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use super::RecordStore;
use crate::adapters::StorageError;
use crate::domain::{
    DetectionRecord, DistrictStatsTable, ImageUpload, Location, LogEntry, LogLevel, Prediction, ValidationError,
    PATIENT_ID_MIN_LEN,
};
use crate::ports::{DetectionArchive, LocalStore, PersistReceipt, PredictionService, ServiceError};
use crate::SafecellError;

/// Progress reported while a submission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Validating,
    Analyzing,
    Saving,
    Complete,
}

impl SubmissionStage {
    /// Completion fraction at which this stage starts.
    #[must_use]
    pub fn progress(&self) -> f64 {
        match self {
            Self::Validating => 0.0,
            Self::Analyzing => 0.1,
            Self::Saving => 0.9,
            Self::Complete => 1.0,
        }
    }

    /// Highest fraction a progress bar may show while in this stage.
    #[must_use]
    pub fn ceiling(&self) -> f64 {
        match self {
            Self::Validating => 0.1,
            Self::Analyzing => 0.9,
            Self::Saving => 0.98,
            Self::Complete => 1.0,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validating => "Validating image...",
            Self::Analyzing => "Analyzing blood smear...",
            Self::Saving => "Saving result...",
            Self::Complete => "Done",
        }
    }
}

/// Handle on the background archive upload.
///
/// Dropping it detaches the thread.
#[derive(Debug)]
pub struct PersistenceHandle {
    inner: Option<JoinHandle<Result<PersistReceipt, ServiceError>>>,
}

impl PersistenceHandle {
    /// Wait for the upload to finish.
    ///
    /// Returns `None` if the thread could not be started or panicked.
    pub fn join(self) -> Option<Result<PersistReceipt, ServiceError>> {
        self.inner.and_then(|h| h.join().ok())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

/// Result of a successful submission.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub record: DetectionRecord,
    pub persistence: PersistenceHandle,
}

/// Check that a location is complete enough to submit.
///
/// # Errors
/// Returns [`ValidationError::PatientIdTooShort`] or
/// [`ValidationError::IncompleteLocation`].
pub fn validate_location(location: &Location) -> Result<(), ValidationError> {
    if location.patient_id.chars().count() < PATIENT_ID_MIN_LEN {
        return Err(ValidationError::PatientIdTooShort);
    }
    if !location.is_complete() {
        return Err(ValidationError::IncompleteLocation);
    }
    Ok(())
}

/// Service running detection submissions.
pub struct DetectionService<P, A, S>
where
    P: PredictionService,
    A: DetectionArchive,
    S: LocalStore,
{
    predictor: Arc<P>,
    archive: Arc<A>,
    records: RecordStore<S>,
}

impl<P, A, S> DetectionService<P, A, S>
where
    P: PredictionService,
    A: DetectionArchive + 'static,
    S: LocalStore + 'static,
    S::Error: Into<StorageError>,
{
    pub fn new(predictor: Arc<P>, archive: Arc<A>, records: RecordStore<S>) -> Self {
        Self {
            predictor,
            archive,
            records,
        }
    }

    /// Load an image from disk and submit it.
    ///
    /// Oversized files are rejected from their metadata before being read.
    ///
    /// # Errors
    /// Returns a validation error for a bad image or location, or a service
    /// error if the prediction call fails.
    pub fn submit_path(
        &self,
        path: &Path,
        location: &Location,
        on_stage: &mut dyn FnMut(SubmissionStage),
    ) -> Result<SubmissionOutcome, SafecellError> {
        on_stage(SubmissionStage::Validating);
        validate_location(location)?;
        let image = ImageUpload::from_path(path)?;
        self.run(&image, location, on_stage)
    }

    /// Submit an already-loaded image.
    ///
    /// # Errors
    /// Returns a validation error for an incomplete location, or a service
    /// error if the prediction call fails.
    pub fn submit(
        &self,
        image: &ImageUpload,
        location: &Location,
    ) -> Result<SubmissionOutcome, SafecellError> {
        validate_location(location)?;
        self.run(image, location, &mut |_: SubmissionStage| {})
    }

    fn run(
        &self,
        image: &ImageUpload,
        location: &Location,
        on_stage: &mut dyn FnMut(SubmissionStage),
    ) -> Result<SubmissionOutcome, SafecellError> {
        on_stage(SubmissionStage::Analyzing);
        tracing::info!(
            "Submitting {} ({} bytes) from {} / {}",
            image.file_name(),
            image.size(),
            location.district.name,
            location.facility_name()
        );

        let started = Instant::now();
        let prediction = match self.classify(image) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                self.log(
                    LogLevel::Error,
                    "detection_failed",
                    format!("{} at {}", e.user_message(), location.facility_name()),
                );
                return Err(e.into());
            }
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        on_stage(SubmissionStage::Saving);
        let record = DetectionRecord::new(prediction, location.clone(), image.metadata(), elapsed_ms);
        self.record_locally(&record);

        let persistence = self.forward(&record);

        tracing::info!(
            "Detection complete: result={}, confidence={}%, time={}ms",
            record.result,
            record.confidence_level,
            record.processing_time_ms
        );
        on_stage(SubmissionStage::Complete);

        Ok(SubmissionOutcome {
            record,
            persistence,
        })
    }

    fn classify(&self, image: &ImageUpload) -> Result<Prediction, ServiceError> {
        let raw = self.predictor.predict(image)?;
        Prediction::from_raw(&raw).ok_or_else(|| ServiceError::InvalidResponse {
            service: self.predictor.name().to_string(),
            message: format!("unknown classification label {:?}", raw.result),
        })
    }

    /// Store the record and fold it into the district table. Storage
    /// failures are logged only.
    fn record_locally(&self, record: &DetectionRecord) {
        if let Err(e) = self.records.append_detection(record) {
            tracing::warn!("Failed to store detection locally: {}", e);
        }

        let updated = self.records.update_district_stats(|stats| {
            if stats.seeded_from_placeholder {
                *stats = DistrictStatsTable::default();
            }
            stats.ingest(record);
        });
        if let Err(e) = updated {
            tracing::warn!("Failed to update district stats: {}", e);
        }

        self.log(
            LogLevel::Info,
            "detection_submitted",
            format!(
                "{} ({}%) at {}, {}",
                record.result,
                record.confidence_level,
                record.location.facility_name(),
                record.location.district.name
            ),
        );
    }

    fn forward(&self, record: &DetectionRecord) -> PersistenceHandle {
        let archive = Arc::clone(&self.archive);
        let records = self.records.clone();
        let record = record.clone();

        let spawned = std::thread::Builder::new()
            .name("detection-persist".to_string())
            .spawn(move || {
                let result = archive.persist(&record);
                match &result {
                    Ok(receipt) => {
                        tracing::debug!("Archived detection, status={}", receipt.status);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to archive detection: {}", e);
                        let entry = LogEntry::new(
                            LogLevel::Warning,
                            "persistence_failed",
                            e.to_string(),
                            records.user_id(),
                        );
                        if let Err(e) = records.append_log(entry) {
                            tracing::warn!("Failed to write activity log: {}", e);
                        }
                    }
                }
                result
            });

        match spawned {
            Ok(handle) => PersistenceHandle {
                inner: Some(handle),
            },
            Err(e) => {
                tracing::warn!("Could not start archive upload: {}", e);
                PersistenceHandle { inner: None }
            }
        }
    }

    fn log(&self, level: LogLevel, action: &str, details: String) {
        let entry = LogEntry::new(level, action, details, self.records.user_id());
        if let Err(e) = self.records.append_log(entry) {
            tracing::warn!("Failed to write activity log: {}", e);
        }
    }
}
