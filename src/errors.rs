// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Custom application error with conversions from common Rust and 3rd-party errors.

use derive_more::Display;
use log::error;

/// Typed failure values returned by all client and tool operations.
///
/// Nothing in this crate panics on a failed API call: transport faults and
/// unknown device names are distinct variants so callers can branch without
/// string matching.
#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    /// Network, timeout or non-2xx response from the SwitchBot API.
    #[display("Transport failure: {_0}")]
    Transport(String),

    /// Device name is not present in the device directory.
    #[display("Device not found: {_0}")]
    DeviceNotFound(String),

    /// The device directory could not be fetched and is empty.
    #[display("Device directory is empty: {_0}")]
    DirectoryEmpty(String),

    #[display("Internal serialization error")]
    SerializationError(String),

    #[display("BadRequest: {_0}")]
    BadRequest(String),
}

impl std::error::Error for ServiceError {}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        error!("{:?}", e);
        ServiceError::SerializationError(e.to_string())
    }
}

impl From<awc::error::SendRequestError> for ServiceError {
    fn from(e: awc::error::SendRequestError) -> Self {
        ServiceError::Transport(e.to_string())
    }
}

impl From<awc::error::JsonPayloadError> for ServiceError {
    fn from(e: awc::error::JsonPayloadError) -> Self {
        ServiceError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Transport(format!("{:?}", e))
    }
}
