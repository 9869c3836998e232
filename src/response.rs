// jpg2png/src/response.rs
//
// JSON envelopes and request checks for whatever transport sits in front of
// the pipeline. No HTTP types here: status codes are plain numbers and
// headers plain string pairs.

use crate::core::{ConversionResult, ConvertError, Format, ProcessingOption, ProcessingOptions};
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
    ("Access-Control-Allow-Credentials", "true"),
];

/// Extra header sent on preflight responses only.
pub const PREFLIGHT_MAX_AGE: (&str, &str) = ("Access-Control-Max-Age", "3600");

/// Headers for an `OPTIONS` preflight reply.
pub fn preflight_headers() -> Vec<(&'static str, &'static str)> {
    CORS_HEADERS
        .iter()
        .copied()
        .chain(std::iter::once(PREFLIGHT_MAX_AGE))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidContentType,
    ParseError,
    NoFileFound,
    InvalidFormat,
    InternalError,
}

impl ErrorCode {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::InternalError => 500,
            _ => 400,
        }
    }
}

impl From<&ConvertError> for ErrorCode {
    fn from(error: &ConvertError) -> Self {
        match error {
            ConvertError::InvalidFormat => ErrorCode::InvalidFormat,
            ConvertError::InvalidParameter(_) => ErrorCode::ParseError,
            _ => ErrorCode::InternalError,
        }
    }
}

/// A request rejected before or during processing.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct RequestError {
    pub code: ErrorCode,
    pub message: String,
}

impl RequestError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ConvertError> for RequestError {
    fn from(error: ConvertError) -> Self {
        let code = ErrorCode::from(&error);
        let message = match code {
            ErrorCode::InternalError => format!("Internal error: {error}"),
            _ => error.to_string(),
        };
        Self { code, message }
    }
}

/// Accepts only `multipart/form-data` bodies.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), RequestError> {
    match content_type {
        Some(value) if value.to_ascii_lowercase().contains("multipart/form-data") => Ok(()),
        _ => Err(RequestError::new(
            ErrorCode::InvalidContentType,
            "Content-Type must be multipart/form-data",
        )),
    }
}

/// Parses the `options` form field: a JSON array of option identifiers.
/// A missing field means no options.
pub fn parse_options_field(field: Option<&str>) -> Result<ProcessingOptions, RequestError> {
    let Some(raw) = field else {
        return Ok(ProcessingOptions::new());
    };

    let ids: Vec<String> = serde_json::from_str(raw).map_err(|e| {
        RequestError::new(ErrorCode::ParseError, format!("Invalid options field: {e}"))
    })?;

    ProcessingOptions::parse(&ids).map_err(|e| RequestError::new(ErrorCode::ParseError, e.to_string()))
}

/// Rejects a missing or empty upload.
pub fn ensure_file_present(file: Option<Vec<u8>>) -> Result<Vec<u8>, RequestError> {
    match file {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(RequestError::new(ErrorCode::NoFileFound, "No image file found")),
    }
}

pub fn data_uri(format: Format, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        format.mime(),
        general_purpose::STANDARD.encode(bytes)
    )
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
    pub image: String,
    pub original_size: u64,
    pub processed_size: u64,
    /// Milliseconds.
    pub processing_time: u64,
    pub applied_options: Vec<ProcessingOption>,
    pub metadata: ConversionResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success(Box<SuccessResponse>),
    Failure(ErrorResponse),
}

impl Response {
    pub fn success(result: ConversionResult, elapsed: Duration) -> Self {
        Response::Success(Box::new(SuccessResponse {
            success: true,
            message: "Conversion completed successfully".to_string(),
            image: data_uri(result.final_metadata.format, &result.buffer),
            original_size: result.original_size,
            processed_size: result.final_size,
            processing_time: elapsed.as_millis() as u64,
            applied_options: result.applied_options.clone(),
            metadata: result,
        }))
    }

    pub fn failure(error: RequestError) -> Self {
        Response::Failure(ErrorResponse {
            success: false,
            error: error.message,
            code: error.code,
        })
    }

    pub fn from_outcome<E: Into<RequestError>>(
        outcome: Result<ConversionResult, E>,
        elapsed: Duration,
    ) -> Self {
        match outcome {
            Ok(result) => Self::success(result, elapsed),
            Err(error) => Self::failure(error.into()),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Response::Success(_) => 200,
            Response::Failure(failure) => failure.code.http_status(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
