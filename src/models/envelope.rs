//! Uniform response envelope

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

/// Wrapper around every successful response body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BaseResponse<T> {
    pub status: bool,
    pub message: String,
    /// Capture time in server local time, `yyyy-MM-dd HH:mm:ss`
    #[serde(with = "timestamp_format")]
    #[schema(value_type = String, example = "2024-01-31 09:15:00")]
    pub timestamp: NaiveDateTime,
    /// Payload; `null` for a lookup miss
    #[schema(value_type = Object)]
    pub data: Option<T>,
}

impl<T> BaseResponse<T> {
    pub fn new(status: bool, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            message: message.into(),
            timestamp: Local::now().naive_local(),
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self::new(true, "Created successfully.", Some(data))
    }

    pub fn updated(data: T) -> Self {
        Self::new(true, "Update successfully.", Some(data))
    }

    pub fn patched(data: T) -> Self {
        Self::new(true, "Patch successfully.", Some(data))
    }

    /// Read result; `None` is still a successful inquiry
    pub fn inquiry(data: Option<T>) -> Self {
        Self::new(true, "Inquiry successfully.", data)
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }
}
