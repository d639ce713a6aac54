//! Undecoded responses for file downloads.

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};

use crate::error::{BacklogError, Result};

/// The transport response returned by [`Connector::get_file`].
///
/// Nothing has been read from the body yet; use [`RawResponse::chunk`] to
/// stream it or [`RawResponse::bytes`] to buffer it.
///
/// [`Connector::get_file`]: crate::Connector::get_file
#[derive(Debug)]
pub struct RawResponse {
    inner: Response,
}

impl RawResponse {
    pub(crate) fn new(inner: Response) -> Self {
        Self { inner }
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// The `Content-Type` header, if present and valid ASCII.
    pub fn content_type(&self) -> Option<&str> {
        self.headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Body length as announced by the server.
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    /// File name from the `Content-Disposition` header.
    pub fn file_name(&self) -> Option<String> {
        let value = self.headers().get(CONTENT_DISPOSITION)?;
        parse_disposition_file_name(&String::from_utf8_lossy(value.as_bytes()))
    }

    /// Read the next chunk of the body. Returns `None` at the end.
    pub async fn chunk(&mut self) -> Result<Option<bytes::Bytes>> {
        self.inner.chunk().await.map_err(BacklogError::transport)
    }

    /// Buffer the whole body.
    pub async fn bytes(self) -> Result<bytes::Bytes> {
        self.inner.bytes().await.map_err(BacklogError::transport)
    }

    /// The underlying transport response.
    pub fn into_inner(self) -> Response {
        self.inner
    }
}

/// Extract a file name, preferring the RFC 5987 `filename*` form.
fn parse_disposition_file_name(header: &str) -> Option<String> {
    let mut plain = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'language'percent-encoded
                let encoded = value.trim().splitn(3, '\'').nth(2);
                if let Some(Ok(decoded)) = encoded.map(urlencoding::decode) {
                    return Some(decoded.into_owned());
                }
            }
            "filename" => {
                plain = Some(value.trim().trim_matches('"').to_string());
            }
            _ => {}
        }
    }

    plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_name() {
        assert_eq!(
            parse_disposition_file_name("attachment; filename=\"report.pdf\""),
            Some("report.pdf".to_string())
        );
    }

    #[test]
    fn test_extended_file_name_wins() {
        let header = "attachment; filename=\"fallback.txt\"; filename*=UTF-8''%E4%BB%95%E6%A7%98.txt";
        assert_eq!(
            parse_disposition_file_name(header),
            Some("仕様.txt".to_string())
        );
    }

    #[test]
    fn test_no_file_name() {
        assert_eq!(parse_disposition_file_name("inline"), None);
    }
}
