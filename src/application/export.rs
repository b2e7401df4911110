//! Export of detection records to CSV and XLS (SpreadsheetML 2003).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::DetectionRecord;

/// Column headers shared by both formats.
pub const EXPORT_HEADER: [&str; 9] = [
    "Date",
    "Timestamp",
    "Prediction Result",
    "Confidence Level",
    "Province",
    "District",
    "Sector",
    "Hospital",
    "User ID",
];

/// Errors while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No records to export")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xls,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xls => "xls",
        }
    }

    /// Parse `csv` / `xls` (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xls" | "excel" => Some(Self::Xls),
            _ => None,
        }
    }
}

/// One export row in header order.
#[must_use]
pub fn export_row(record: &DetectionRecord) -> [String; 9] {
    let location = &record.location;
    [
        record.timestamp.format("%Y-%m-%d").to_string(),
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        record.result.to_string(),
        format!("{}%", record.confidence_level),
        location.province.name.clone(),
        location.district.name.clone(),
        location.sector.name.clone(),
        location.facility_name().to_string(),
        location.patient_id.clone(),
    ]
}

/// Write records as CSV with a UTF-8 BOM so spreadsheet tools pick the
/// right encoding.
///
/// # Errors
/// Returns error if writing fails.
pub fn write_csv<W: Write>(records: &[DetectionRecord], mut writer: W) -> Result<(), ExportError> {
    writer.write_all(b"\xEF\xBB\xBF")?;

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;
    for record in records {
        wtr.write_record(export_row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn xml_row<W: Write>(writer: &mut W, cells: &[impl AsRef<str>]) -> std::io::Result<()> {
    writer.write_all(b"   <Row>\n")?;
    for cell in cells {
        writeln!(
            writer,
            "    <Cell><Data ss:Type=\"String\">{}</Data></Cell>",
            xml_escape(cell.as_ref())
        )?;
    }
    writer.write_all(b"   </Row>\n")
}

/// Write records as a SpreadsheetML 2003 workbook.
///
/// # Errors
/// Returns error if writing fails.
pub fn write_xls<W: Write>(records: &[DetectionRecord], mut writer: W) -> Result<(), ExportError> {
    writer.write_all(
        br#"<?xml version="1.0" encoding="UTF-8"?>
<?mso-application progid="Excel.Sheet"?>
<Workbook xmlns="urn:schemas-microsoft-com:office:spreadsheet"
 xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet">
 <Worksheet ss:Name="Detections">
  <Table>
"#,
    )?;

    xml_row(&mut writer, &EXPORT_HEADER)?;
    for record in records {
        xml_row(&mut writer, &export_row(record))?;
    }

    writer.write_all(b"  </Table>\n </Worksheet>\n</Workbook>\n")?;
    writer.flush()?;
    Ok(())
}

/// File name used for an export taken at `now`.
#[must_use]
pub fn export_file_name(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "safecell_detections_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Write `records` to a new file in `dir`.
///
/// # Errors
/// Returns [`ExportError::Empty`] when there is nothing to export, or an IO
/// error if the file cannot be written.
pub fn export_to_dir(
    records: &[DetectionRecord],
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(format, Utc::now()));
    let writer = BufWriter::new(File::create(&path)?);

    match format {
        ExportFormat::Csv => write_csv(records, writer)?,
        ExportFormat::Xls => write_xls(records, writer)?,
    }

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_record;
    use crate::domain::DetectionOutcome;

    #[test]
    fn test_row_layout() {
        let record = sample_record(DetectionOutcome::Positive, 87);
        let row = export_row(&record);
        assert_eq!(row[2], "Positive");
        assert_eq!(row[3], "87%");
        assert_eq!(row[4], "Kigali City");
        assert_eq!(row[7], "Kibagabaga Hospital");
        assert_eq!(row[8], "12345");
        assert!(row[1].starts_with(&row[0]));
    }

    #[test]
    fn test_csv_output() {
        let records = vec![
            sample_record(DetectionOutcome::Positive, 87),
            sample_record(DetectionOutcome::Negative, 64),
        ];
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).expect("Should write");

        let text = String::from_utf8(buf).expect("Should be utf8");
        let text = text.trim_start_matches('\u{feff}');
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Timestamp,Prediction Result,Confidence Level,Province,District,Sector,Hospital,User ID"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("Negative,64%"));
    }

    #[test]
    fn test_xls_escapes_values() {
        let mut record = sample_record(DetectionOutcome::Negative, 50);
        if let Some(facility) = record.location.facility.as_mut() {
            facility.name = "St. Mary's <Annex> & Co".into();
        }
        let mut buf = Vec::new();
        write_xls(&[record], &mut buf).expect("Should write");

        let text = String::from_utf8(buf).expect("Should be utf8");
        assert!(text.contains("<Worksheet ss:Name=\"Detections\">"));
        assert!(text.contains("St. Mary&apos;s &lt;Annex&gt; &amp; Co"));
        assert_eq!(text.matches("<Row>").count(), 2);
    }

    #[test]
    fn test_export_to_dir() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let err = export_to_dir(&[], ExportFormat::Csv, dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::Empty));

        let records = vec![sample_record(DetectionOutcome::Positive, 90)];
        let path = export_to_dir(&records, ExportFormat::Xls, &dir.path().join("out"))
            .expect("Should export");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("xls"));
        assert!(path.exists());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("excel"), Some(ExportFormat::Xls));
        assert_eq!(ExportFormat::parse("pdf"), None);
    }
}
