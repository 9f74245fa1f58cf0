#![forbid(unsafe_code)]

//! Thin client for the websequencediagrams.com rendering service.
//!
//! The service takes the raw diagram text (not the AST) as a form-encoded
//! POST and answers with JSON naming an image locator; a second GET fetches
//! the image bytes. No retry or backoff: every fault surfaces as a
//! [`RenderError`] for the caller to handle.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Public endpoint of the rendering service.
pub const DEFAULT_ENDPOINT: &str = "https://www.websequencediagrams.com";

/// Style selector sent when the caller does not pick one.
pub const DEFAULT_STYLE: &str = "qsd";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Faults surfaced by the rendering service or the transport under it.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("render service returned HTTP {status}")]
    Status { status: u16 },
    #[error("render service reported errors: {}", .0.join("; "))]
    Service(Vec<String>),
    #[error("render service response was not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("render service response carried no image locator")]
    MissingImage,
}

/// Application-level response body of the render endpoint.
#[derive(Debug, Deserialize)]
struct RenderResponse {
    #[serde(default)]
    img: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

/// Client for submitting diagram text and retrieving rendered images.
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    base_url: String,
}

impl RenderClient {
    /// Client against the public endpoint.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_base_url(DEFAULT_ENDPOINT)
    }

    /// Client against a custom endpoint (tests, self-hosted instances).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RenderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Submit raw diagram text and return the image locator the service
    /// reports (a relative path such as `?png=mscABCD123`).
    pub async fn request_image(&self, diagram: &str, style: &str) -> Result<String, RenderError> {
        let form = [("message", diagram), ("style", style), ("apiVersion", "1")];
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        decode_render_response(&body)
    }

    /// Submit diagram text, then download the rendered image bytes.
    pub async fn fetch_image(&self, diagram: &str, style: &str) -> Result<Vec<u8>, RenderError> {
        let locator = self.request_image(diagram, style).await?;
        let url = format!("{}/{}", self.base_url, locator);
        debug!(%url, "fetching rendered image");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Decode the render endpoint's JSON body into an image locator.
fn decode_render_response(body: &str) -> Result<String, RenderError> {
    let decoded: RenderResponse = serde_json::from_str(body)?;
    if !decoded.errors.is_empty() {
        return Err(RenderError::Service(decoded.errors));
    }
    decoded.img.ok_or(RenderError::MissingImage)
}

#[cfg(test)]
mod tests {
    use super::{RenderError, decode_render_response};

    #[test]
    fn decodes_an_image_locator() {
        let body = r#"{"img": "?png=msc1234", "errors": []}"#;
        assert_eq!(decode_render_response(body).expect("locator"), "?png=msc1234");
    }

    #[test]
    fn missing_errors_field_defaults_to_none() {
        let body = r#"{"img": "?png=msc1234"}"#;
        assert_eq!(decode_render_response(body).expect("locator"), "?png=msc1234");
    }

    #[test]
    fn service_errors_take_precedence() {
        let body = r#"{"img": "?png=msc1234", "errors": ["line 2: bad arrow"]}"#;
        match decode_render_response(body) {
            Err(RenderError::Service(errors)) => {
                assert_eq!(errors, vec!["line 2: bad arrow".to_owned()]);
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn absent_locator_is_an_error() {
        let body = r#"{"errors": []}"#;
        assert!(matches!(
            decode_render_response(body),
            Err(RenderError::MissingImage)
        ));
    }

    #[test]
    fn undecodable_body_is_a_payload_error() {
        assert!(matches!(
            decode_render_response("<html>busy</html>"),
            Err(RenderError::Payload(_))
        ));
    }
}
