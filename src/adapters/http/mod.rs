//! HTTP adapter: blocking clients for the prediction service and the
//! detection archive.
//!
//! Both services are external. Calls are made once with no retries.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::domain::{DetectionRecord, ImageUpload, RawPrediction};
use crate::ports::{DetectionArchive, PersistReceipt, PredictionService, ServiceError};

/// Shown when a failed response carries no readable message.
pub const GENERIC_PREDICTION_ERROR: &str = "Failed to analyze the image. Please try again.";

const PREDICT_PATH: &str = "/predict/";
const DETECTIONS_PATH: &str = "/detection-data/";

fn build_client(timeout: Duration) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::Client(e.to_string()))
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn transport_error(service: &str, base_url: &str, e: &reqwest::Error) -> ServiceError {
    let message = if e.is_connect() {
        format!("connection refused at {base_url}")
    } else if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    ServiceError::Unreachable {
        service: service.to_string(),
        message,
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `detail`, `message` and `error` in that order. A `detail` list
/// (as produced by validation errors) is reduced to its first `msg`.
#[must_use]
pub fn error_message_from_body(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;

    ["detail", "message", "error"].iter().find_map(|field| {
        match json.get(*field)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string),
            serde_json::Value::Object(obj) => obj
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        }
    })
}

fn rejected(response: Response, fallback: &str) -> ServiceError {
    let status = response.status().as_u16();
    let body = response.text().unwrap_or_default();
    let message = error_message_from_body(&body).unwrap_or_else(|| fallback.to_string());
    ServiceError::Rejected { status, message }
}

/// Client for `POST {base}/predict/`.
pub struct HttpPredictionClient {
    base_url: String,
    client: Client,
}

impl HttpPredictionClient {
    /// Create a client for the prediction service at `base_url`.
    ///
    /// # Errors
    /// Returns [`ServiceError::Client`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            base_url: trim_base(base_url),
            client: build_client(timeout)?,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PredictionService for HttpPredictionClient {
    fn predict(&self, image: &ImageUpload) -> Result<RawPrediction, ServiceError> {
        let url = format!("{}{PREDICT_PATH}", self.base_url);

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.format().mime_type())
            .map_err(|e| ServiceError::Client(format!("invalid MIME type: {e}")))?;
        let form = Form::new().part("file", part);

        tracing::debug!("Posting {} bytes to {}", image.size(), url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| transport_error(self.name(), &self.base_url, &e))?;

        if !response.status().is_success() {
            return Err(rejected(response, GENERIC_PREDICTION_ERROR));
        }

        response
            .json::<RawPrediction>()
            .map_err(|e| ServiceError::InvalidResponse {
                service: self.name().to_string(),
                message: e.to_string(),
            })
    }
}

#[derive(Deserialize)]
struct ArchiveListResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// Client for `{base}/detection-data/`.
pub struct HttpDetectionArchive {
    base_url: String,
    client: Client,
}

impl HttpDetectionArchive {
    const SERVICE: &'static str = "detection archive";

    /// Create a client for the archive at `base_url`.
    ///
    /// # Errors
    /// Returns [`ServiceError::Client`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            base_url: trim_base(base_url),
            client: build_client(timeout)?,
        })
    }
}

impl DetectionArchive for HttpDetectionArchive {
    fn persist(&self, record: &DetectionRecord) -> Result<PersistReceipt, ServiceError> {
        let url = format!("{}{DETECTIONS_PATH}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .map_err(|e| transport_error(Self::SERVICE, &self.base_url, &e))?;

        if !response.status().is_success() {
            return Err(rejected(response, "Failed to save detection data"));
        }

        response
            .json::<PersistReceipt>()
            .map_err(|e| ServiceError::InvalidResponse {
                service: Self::SERVICE.to_string(),
                message: e.to_string(),
            })
    }

    fn fetch_all(&self) -> Result<Vec<DetectionRecord>, ServiceError> {
        let url = format!("{}{DETECTIONS_PATH}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| transport_error(Self::SERVICE, &self.base_url, &e))?;

        if !response.status().is_success() {
            return Err(rejected(response, "Failed to load detection data"));
        }

        let list: ArchiveListResponse =
            response.json().map_err(|e| ServiceError::InvalidResponse {
                service: Self::SERVICE.to_string(),
                message: e.to_string(),
            })?;

        Ok(parse_records(list.data))
    }
}

/// Keep every entry that parses as a record; skip the rest.
fn parse_records(values: Vec<serde_json::Value>) -> Vec<DetectionRecord> {
    let total = values.len();
    let records: Vec<DetectionRecord> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();

    if records.len() < total {
        tracing::warn!(
            "Skipped {} malformed archive entries out of {}",
            total - records.len(),
            total
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_record;
    use crate::domain::DetectionOutcome;

    #[test]
    fn test_error_message_fields() {
        assert_eq!(
            error_message_from_body(r#"{"detail":"Invalid image format"}"#).as_deref(),
            Some("Invalid image format")
        );
        assert_eq!(
            error_message_from_body(r#"{"message":"Model not loaded"}"#).as_deref(),
            Some("Model not loaded")
        );
        assert_eq!(
            error_message_from_body(r#"{"error":"boom"}"#).as_deref(),
            Some("boom")
        );
    }

    #[test]
    fn test_error_message_detail_list() {
        let body = r#"{"detail":[{"loc":["body","file"],"msg":"field required","type":"missing"}]}"#;
        assert_eq!(error_message_from_body(body).as_deref(), Some("field required"));
    }

    #[test]
    fn test_error_message_unparseable() {
        assert_eq!(error_message_from_body("<html>502 Bad Gateway</html>"), None);
        assert_eq!(error_message_from_body(r#"{"detail":""}"#), None);
        assert_eq!(error_message_from_body(r#"{"status":"fail"}"#), None);
    }

    #[test]
    fn test_parse_records_skips_malformed() {
        let good = serde_json::to_value(sample_record(DetectionOutcome::Positive, 91))
            .expect("Should serialize");
        let values = vec![good, serde_json::json!({"id": "x", "result": "maybe"})];
        let records = parse_records(values);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].confidence_level, 91);
    }

    #[test]
    fn test_unreachable_prediction_service() {
        // Nothing listens on port 9 on loopback in CI containers
        let client = HttpPredictionClient::new("http://127.0.0.1:9/", Duration::from_secs(2))
            .expect("Should build client");
        assert_eq!(client.base_url(), "http://127.0.0.1:9");

        let upload = ImageUpload::from_bytes("smear.png", "image/png", vec![1, 2, 3])
            .expect("Should build upload");
        let err = client.predict(&upload).unwrap_err();
        assert!(matches!(err, ServiceError::Unreachable { .. }));
    }
}
