// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Common utility functions.

mod env;
mod network;

pub use env::*;
pub use network::*;

use crate::errors::ServiceError;

/// Parse an enum value from its string form with a helpful error message.
///
/// A BadRequest error listing all valid variants is returned for an unknown
/// value.
pub fn enum_from_str<T: std::str::FromStr + strum::VariantNames>(
    value: &str,
    what: &str,
) -> Result<T, ServiceError> {
    T::from_str(value).map_err(|_| {
        ServiceError::BadRequest(format!(
            "Invalid {what}: {value}. Valid: {}",
            T::VARIANTS.to_vec().join(",")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::enum_from_str;
    use crate::client::model::DeviceKind;
    use crate::errors::ServiceError;

    #[test]
    fn enum_from_str_parses_known_variant() {
        let kind: DeviceKind = enum_from_str("infrared", "device kind").expect("known variant");
        assert_eq!(DeviceKind::Infrared, kind);
    }

    #[test]
    fn enum_from_str_with_unknown_variant_returns_bad_request() {
        let result: Result<DeviceKind, _> = enum_from_str("hologram", "device kind");
        assert!(
            matches!(result, Err(ServiceError::BadRequest(_))),
            "Unknown variant must return BadRequest, but got: {:?}",
            result
        );
    }
}
