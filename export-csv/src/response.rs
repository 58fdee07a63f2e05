//! The rendered CSV document and its HTTP form.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Outcome of a streamed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub filename: String,
    pub header_written: bool,
    pub records_written: usize,
}

impl ExportSummary {
    /// Rows in the output, header included.
    pub fn rows(&self) -> usize {
        self.records_written + usize::from(self.header_written)
    }
}

/// A fully rendered CSV attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvResponse {
    filename: String,
    body: Vec<u8>,
}

impl CsvResponse {
    pub fn new(filename: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            body,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        CSV_CONTENT_TYPE
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename.replace('"', "\\\""))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text; CSV produced by the exporter is always UTF-8.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl IntoResponse for CsvResponse {
    fn into_response(self) -> Response {
        let disposition = match HeaderValue::from_str(&self.content_disposition()) {
            Ok(value) => value,
            Err(e) => {
                error!("Export filename {:?} is not a valid header value: {}", self.filename, e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid export filename").into_response();
            }
        };

        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE)),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition() {
        let response = CsvResponse::new("customer_list.csv", Vec::new());
        assert_eq!(
            response.content_disposition(),
            "attachment; filename=\"customer_list.csv\""
        );
        assert_eq!(response.content_type(), "text/csv");
    }

    #[test]
    fn test_summary_rows_include_header() {
        let summary = ExportSummary {
            filename: "a.csv".into(),
            header_written: true,
            records_written: 3,
        };
        assert_eq!(summary.rows(), 4);
    }

    #[tokio::test]
    async fn test_into_http_response() {
        let response = CsvResponse::new("rich_account_list.csv", b"A1B2C,Jimmie\r\n".to_vec()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"rich_account_list.csv\""
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"A1B2C,Jimmie\r\n");
    }

    #[test]
    fn test_invalid_filename_is_a_server_error() {
        let response = CsvResponse::new("bad\nname.csv", Vec::new()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
