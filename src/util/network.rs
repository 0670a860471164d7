// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

/// Create the HTTP client for the SwitchBot cloud API.
///
/// TLS uses the rustls connector with webpki roots, selected by the awc
/// feature flags. Creating an expensive client is sufficient once per process
/// and can be used for multiple requests.
pub fn new_api_client(request_timeout: Duration) -> awc::Client {
    awc::ClientBuilder::new().timeout(request_timeout).finish()
}
