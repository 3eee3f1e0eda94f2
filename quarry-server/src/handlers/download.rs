use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use quarry_catalog::DatabaseEntry;
use tokio_util::io::ReaderStream;

use crate::error::ServerError;

/// `DatabaseDownload`: streams the raw database file with a
/// `Content-Disposition: attachment` header rather than materializing it.
pub async fn database_download(entry: &DatabaseEntry) -> Response {
    let file = match tokio::fs::File::open(&entry.file_path).await {
        Ok(file) => file,
        Err(err) => {
            tracing::error!(
                path = %entry.file_path.display(),
                error = %err,
                "failed to open database file for download"
            );
            return ServerError::Internal(err.to_string()).into_response();
        }
    };

    let filename = entry
        .file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.db", entry.name));

    let body = Body::from_stream(ReaderStream::new(file));
    let mut response = Response::new(body);
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
    response.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    response
}
