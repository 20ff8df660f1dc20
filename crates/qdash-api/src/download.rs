use axum::{
  http::header,
  response::{IntoResponse, Response},
};

pub const CSV: &str = "text/csv; charset=utf-8";
pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF: &str = "application/pdf";

/// A file download with the given MIME type and suggested file name.
pub fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
  (
    [
      (header::CONTENT_TYPE, content_type.to_owned()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
    ],
    body,
  )
    .into_response()
}
