//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod activity;
mod cascade;
mod export;
mod records;
mod statistics;
mod store;
mod submission;

pub use activity::ActivityService;
pub use cascade::{CascadeLevel, LocationCascade, LocationListener, Selection};
pub use export::{
    export_file_name, export_row, export_to_dir, write_csv, write_xls, ExportError, ExportFormat,
    EXPORT_HEADER,
};
pub use records::{DetectionFilter, RecordBrowser};
pub use statistics::{
    bucket_index, build_report, confidence_histogram, placeholder_district_stats,
    placeholder_records, ConfidenceBucket, DailyCount, DataSource, ProvinceBreakdown,
    StatisticsReport, StatisticsService, TimeRange, CONFIDENCE_BUCKETS,
};
pub use store::{RecordStore, StoreLimits, DEFAULT_MAX_DETECTIONS, DEFAULT_MAX_LOGS};
pub use submission::{
    validate_location, DetectionService, PersistenceHandle, SubmissionOutcome, SubmissionStage,
};
