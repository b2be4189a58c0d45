//! Batch issuing from CSV input.
//!
//! Row 0 is the header. Required columns are matched case-insensitively after
//! trimming: `email`, `name`, `course` and `completion_date` (or `date`). An
//! optional `template_id` (or `template`) column picks a per-row template, and
//! any other column is carried into the certificate's supplementary data.
//!
//! Rows are processed independently: a bad row is reported and skipped, it
//! never aborts the batch. Failures are numbered like spreadsheet lines, so
//! the first data row is row 2.

use std::collections::BTreeMap;

use super::service::CertificateService;
use super::types::{BatchResult, CertificateError, CertificateRequest, CertificateResult};
use crate::metrics::BatchMetrics;

/// Column positions resolved from the header row
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnMap {
    email: usize,
    name: usize,
    course: usize,
    date: usize,
    template: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> CertificateResult<Self> {
        let (mut email, mut name, mut course, mut date, mut template) =
            (None, None, None, None, None);
        let mut extra = Vec::new();

        for (idx, column) in header.iter().enumerate() {
            let column = column.trim();
            match column.to_lowercase().as_str() {
                "email" => email = Some(idx),
                "name" => name = Some(idx),
                "course" => course = Some(idx),
                "completion_date" | "date" => date = Some(idx),
                "template_id" | "template" => template = Some(idx),
                "" => {}
                _ => extra.push((idx, column.to_string())),
            }
        }

        match (email, name, course, date) {
            (Some(email), Some(name), Some(course), Some(date)) => Ok(Self {
                email,
                name,
                course,
                date,
                template,
                extra,
            }),
            _ => Err(CertificateError::Structural(
                "CSV must contain email, name, course, and completion_date columns".to_string(),
            )),
        }
    }

    /// Minimum row length that covers every required column
    fn required_len(&self) -> usize {
        self.email.max(self.name).max(self.course).max(self.date) + 1
    }

    fn request_for(&self, row: &[String]) -> CertificateRequest {
        let cell = |idx: usize| row.get(idx).map(|v| v.trim()).unwrap_or_default();

        let data: BTreeMap<String, String> = self
            .extra
            .iter()
            .filter(|(idx, _)| !cell(*idx).is_empty())
            .map(|(idx, key)| (key.clone(), cell(*idx).to_string()))
            .collect();

        CertificateRequest {
            email: cell(self.email).to_string(),
            name: cell(self.name).to_string(),
            course: cell(self.course).to_string(),
            completion_date: cell(self.date).to_string(),
            template_id: self
                .template
                .map(cell)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            data,
        }
    }
}

/// Parse raw CSV bytes into rows of fields. Rows may differ in length.
pub fn parse_csv(input: &[u8]) -> CertificateResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| CertificateError::Structural(format!("failed to parse CSV: {}", e)))
        })
        .collect();
    rows
}

impl CertificateService {
    /// Issue certificates from raw CSV bytes
    pub fn create_certificates_from_csv(&self, input: &[u8]) -> CertificateResult<BatchResult> {
        let rows = parse_csv(input)?;
        self.create_certificates_from_rows(&rows)
    }

    /// Issue certificates from parsed rows, the first of which is the header
    pub fn create_certificates_from_rows(&self, rows: &[Vec<String>]) -> CertificateResult<BatchResult> {
        let (header, data_rows) = rows
            .split_first()
            .ok_or_else(|| CertificateError::Structural("CSV file is empty".to_string()))?;
        let columns = ColumnMap::from_header(header)?;
        let required_len = columns.required_len();

        let mut result = BatchResult {
            total: data_rows.len(),
            ..Default::default()
        };

        for (idx, row) in data_rows.iter().enumerate() {
            let row_number = idx + 2;

            if row.len() < required_len {
                tracing::warn!(row = row_number, "Batch row has insufficient columns");
                BatchMetrics::record_failed();
                result.record_failure(row_number, "insufficient columns".to_string());
                continue;
            }

            match self.create_certificate(&columns.request_for(row)) {
                Ok(cert) => {
                    BatchMetrics::record_success();
                    result.record_success(cert.id);
                }
                Err(e) => {
                    tracing::warn!(row = row_number, error = %e, "Batch row rejected");
                    BatchMetrics::record_failed();
                    result.record_failure(row_number, e.to_string());
                }
            }
        }

        tracing::info!(
            total = result.total,
            success = result.success,
            failed = result.failed,
            "Batch processed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::RecordStore;
    use crate::template::TemplateService;

    fn service() -> (CertificateService, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::new());
        let _templates = TemplateService::new(store.clone());
        (CertificateService::new(store.clone()), store)
    }

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_header_case_and_aliases() {
        let columns =
            ColumnMap::from_header(&header(&[" Email ", "NAME", "Course", "Date", "Template", "Hours"]))
                .unwrap();
        assert_eq!(columns.date, 3);
        assert_eq!(columns.template, Some(4));
        assert_eq!(columns.extra, vec![(5, "Hours".to_string())]);
        assert_eq!(columns.required_len(), 4);
    }

    #[test]
    fn test_header_missing_columns() {
        assert!(matches!(
            ColumnMap::from_header(&header(&["email", "name"])),
            Err(CertificateError::Structural(_))
        ));
    }

    #[test]
    fn test_csv_all_rows_succeed() {
        let (svc, store) = service();
        let csv = "email,name,course,completion_date\n\
                   a@example.com,Ana,Rust,2024-01-15\n\
                   b@example.com,Bia,Go,2024-02-01\n\
                   c@example.com,Caio,Zig,2024-03-20\n";

        let result = svc.create_certificates_from_csv(csv.as_bytes()).unwrap();
        assert_eq!((result.total, result.success, result.failed), (3, 3, 0));
        assert_eq!(result.created_ids.len(), 3);
        assert_eq!(store.certificate_count(), 3);
    }

    #[test]
    fn test_csv_missing_columns_creates_nothing() {
        let (svc, store) = service();
        let result = svc.create_certificates_from_csv(b"email,name\na@example.com,Ana\n");
        assert!(matches!(result, Err(CertificateError::Structural(_))));
        assert_eq!(store.certificate_count(), 0);
    }

    #[test]
    fn test_csv_empty() {
        let (svc, _) = service();
        assert!(matches!(
            svc.create_certificates_from_csv(b""),
            Err(CertificateError::Structural(_))
        ));
    }

    #[test]
    fn test_partial_failure() {
        let (svc, _) = service();
        let csv = "email,name,course,completion_date\n\
                   a@example.com,Ana,Rust,2024-01-15\n\
                   b@example.com,Bia,Go,15/01/2024\n\
                   c@example.com,Caio,Zig,2024-03-20\n";

        let result = svc.create_certificates_from_csv(csv.as_bytes()).unwrap();
        assert_eq!((result.total, result.success, result.failed), (3, 2, 1));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 3);
        assert!(result.errors[0].message.contains("completion_date"));
    }

    #[test]
    fn test_short_row_counted_as_failure() {
        let (svc, _) = service();
        let csv = "email,name,course,completion_date\n\
                   a@example.com,Ana\n\
                   b@example.com,Bia,Go,2024-02-01\n";

        let result = svc.create_certificates_from_csv(csv.as_bytes()).unwrap();
        assert_eq!((result.total, result.success, result.failed), (2, 1, 1));
        assert_eq!(result.errors[0].to_string(), "Row 2: insufficient columns");
    }

    #[test]
    fn test_template_column_and_extra_data() {
        let (svc, _) = service();
        let csv = "email,name,course,date,template_id,hours\n\
                   a@example.com,Ana,Rust,2024-01-15,,40\n\
                   b@example.com,Bia,Go,2024-02-01,missing,\n";

        let result = svc.create_certificates_from_csv(csv.as_bytes()).unwrap();
        assert_eq!((result.success, result.failed), (1, 1));
        assert!(result.errors[0].message.contains("missing"));

        let cert = svc.get_certificate(&result.created_ids[0]).unwrap();
        assert_eq!(cert.template_id, "default");
        assert_eq!(cert.data.get("hours").map(String::as_str), Some("40"));
    }

    #[test]
    fn test_header_only() {
        let (svc, _) = service();
        let result = svc
            .create_certificates_from_rows(&[header(&["email", "name", "course", "date"])])
            .unwrap();
        assert_eq!((result.total, result.success, result.failed), (0, 0, 0));
    }

    #[test]
    fn test_parse_csv_flexible_and_quoted() {
        let rows = parse_csv(b"a,b\n1,2,3\n\"x, y\",z\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[2][0], "x, y");
    }

    #[test]
    fn test_parse_csv_invalid_utf8_is_structural() {
        assert!(matches!(
            parse_csv(b"email,name\n\xff\xfe,Ana\n"),
            Err(CertificateError::Structural(_))
        ));
    }
}
