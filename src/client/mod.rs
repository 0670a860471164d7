// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! SwitchBot cloud API client: signed, throttled HTTP access to the device
//! inventory, status and command endpoints.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::client::directory::DeviceDirectory;
use crate::client::model::{CommandRequest, Device, DeviceInventory, Envelope};
use crate::client::sign::AuthHeaders;
use crate::client::throttle::Throttle;
use crate::configuration::{ENV_API_MSG_TRACING, SwitchBotSettings};
use crate::errors::ServiceError;
use crate::util::{bool_from_env, new_api_client};

pub mod directory;
pub mod model;
pub mod sign;
pub mod throttle;

/// Device-listing endpoint.
const DEVICES_PATH: &str = "/v1.1/devices";

/// SwitchBot cloud API client.
///
/// The device directory is fetched once at construction and cached for the
/// lifetime of the client; stale entries (e.g. a renamed device) require
/// calling [`SwitchBotClient::refresh_devices`] or constructing a new client.
///
/// All operations take `&mut self`: the client never issues concurrent
/// requests and the throttle state is not safe for uncoordinated concurrent
/// mutation.
pub struct SwitchBotClient {
    /// Unique client id for log correlation
    id: String,
    base_url: Url,
    token: String,
    secret: String,
    http: awc::Client,
    directory: DeviceDirectory,
    throttle: Throttle,
    msg_tracing: bool,
}

impl SwitchBotClient {
    /// Create a client and populate the device directory with one full fetch.
    ///
    /// A failed fetch is downgraded to a logged warning: the client is still
    /// usable, but every name lookup fails with `DeviceNotFound` until a
    /// [`SwitchBotClient::refresh_devices`] call succeeds.
    pub async fn connect(settings: &SwitchBotSettings) -> Result<Self, ServiceError> {
        let mut client = Self::new(settings);
        if let Err(e) = client.refresh_devices().await {
            warn!("[{}] Starting without devices: {e}", client.id);
        }
        Ok(client)
    }

    fn new(settings: &SwitchBotSettings) -> Self {
        let base_url = settings.get_url();
        let id = format!(
            "{}:{}",
            base_url.host_str().unwrap_or(base_url.as_str()),
            base_url.port_or_known_default().unwrap_or_default()
        );
        Self {
            id,
            base_url,
            token: settings.get_token(),
            secret: settings.get_secret(),
            http: new_api_client(Duration::from_secs(settings.request_timeout as u64)),
            directory: DeviceDirectory::default(),
            throttle: Throttle::new(settings.throttle),
            msg_tracing: bool_from_env(ENV_API_MSG_TRACING),
        }
    }

    /// Fetch the full device list and swap the directory wholesale.
    ///
    /// On failure the directory is left empty, never partially populated.
    pub async fn refresh_devices(&mut self) -> Result<usize, ServiceError> {
        self.directory = DeviceDirectory::default();

        let inventory: DeviceInventory = match self.get_body(DEVICES_PATH).await {
            Ok(inventory) => inventory,
            Err(e) => {
                error!("[{}] Cannot get all devices: {e}", self.id);
                return Err(ServiceError::DirectoryEmpty(e.to_string()));
            }
        };

        self.directory = DeviceDirectory::from_inventory(inventory);
        debug!("[{}] Device directory: {} devices", self.id, self.directory.len());
        Ok(self.directory.len())
    }

    /// Look up a device by its unique, case-sensitive name.
    pub fn resolve(&self, name: &str) -> Result<&Device, ServiceError> {
        self.directory.resolve(name)
    }

    /// All known devices, keyed by name.
    pub fn devices(&self) -> &HashMap<String, Device> {
        self.directory.devices()
    }

    pub fn directory(&self) -> &DeviceDirectory {
        &self.directory
    }

    /// Query the current state of a device by its vendor identifier.
    pub async fn status(&mut self, device_id: &str) -> Result<Value, ServiceError> {
        self.get_body(&status_path(device_id)).await
    }

    /// Resolve a device name and query its current state.
    pub async fn status_by_name(&mut self, name: &str) -> Result<Value, ServiceError> {
        let device_id = self.resolve(name)?.id.clone();
        self.status(&device_id).await
    }

    /// Resolve a device name and send it a command.
    ///
    /// Returns the parsed response envelope on HTTP success. A non-success
    /// status yields a `Transport` failure; the call is never retried.
    pub async fn control(
        &mut self,
        name: &str,
        command: &str,
    ) -> Result<Envelope<Value>, ServiceError> {
        let device_id = self.resolve(name)?.id.clone();
        self.send_command(&device_id, command).await
    }

    /// Send an opaque vendor command to a device by its identifier.
    pub async fn send_command(
        &mut self,
        device_id: &str,
        command: &str,
    ) -> Result<Envelope<Value>, ServiceError> {
        self.throttle.acquire().await;

        let path = commands_path(device_id);
        let headers = sign::sign(&self.token, &self.secret);
        self.trace_request("POST", &path, &headers);

        let mut response = sign_request(self.http.post(self.url_for(&path)), &headers)
            .send_json(&CommandRequest {
                command: command.to_string(),
            })
            .await?;

        debug!("[{}] <- {} POST {path}", self.id, response.status());
        if !response.status().is_success() {
            return Err(ServiceError::Transport(format!(
                "POST {path}: status {}",
                response.status()
            )));
        }

        Ok(response.json::<Envelope<Value>>().await?)
    }

    /// Signed, throttled GET returning the `body` of the response envelope.
    async fn get_body<T: DeserializeOwned + Default>(
        &mut self,
        path: &str,
    ) -> Result<T, ServiceError> {
        self.throttle.acquire().await;

        let headers = sign::sign(&self.token, &self.secret);
        self.trace_request("GET", path, &headers);

        let mut response = sign_request(self.http.get(self.url_for(path)), &headers)
            .send()
            .await?;

        debug!("[{}] <- {} GET {path}", self.id, response.status());
        if !response.status().is_success() {
            return Err(ServiceError::Transport(format!(
                "GET {path}: status {}",
                response.status()
            )));
        }

        let envelope = response.json::<Envelope<T>>().await?;
        Ok(envelope.body)
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    fn trace_request(&self, method: &str, path: &str, headers: &AuthHeaders) {
        if self.msg_tracing {
            debug!(
                "[{}] -> {method} {path} (t={}, nonce={})",
                self.id, headers.timestamp, headers.nonce
            );
        } else {
            debug!("[{}] -> {method} {path}", self.id);
        }
    }
}

/// Attach the signed header set to an outgoing request.
fn sign_request(request: awc::ClientRequest, headers: &AuthHeaders) -> awc::ClientRequest {
    request
        .insert_header(("Authorization", headers.authorization.as_str()))
        .insert_header(("sign", headers.sign.as_str()))
        .insert_header(("t", headers.timestamp.as_str()))
        .insert_header(("nonce", headers.nonce.as_str()))
}

fn status_path(device_id: &str) -> String {
    format!("{DEVICES_PATH}/{device_id}/status")
}

fn commands_path(device_id: &str) -> String {
    format!("{DEVICES_PATH}/{device_id}/commands")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_follow_the_v11_api() {
        assert_eq!("/v1.1/devices/42/status", status_path("42"));
        assert_eq!("/v1.1/devices/42/commands", commands_path("42"));
    }

    #[actix_web::test]
    async fn url_for_joins_origin_and_path_without_double_slash() {
        let client = SwitchBotClient::new(&SwitchBotSettings::default());
        assert_eq!(
            "https://api.switch-bot.com/v1.1/devices",
            client.url_for(DEVICES_PATH)
        );
    }
}
