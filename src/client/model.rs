// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! SwitchBot cloud API data structure definitions for JSON serialization & deserialization.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// Response envelope wrapping every SwitchBot API payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Default> {
    pub status_code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub body: T,
}

/// Body of the device-listing endpoint: physical devices and infrared remotes
/// in two separate sub-lists.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInventory {
    #[serde(default)]
    pub device_list: Vec<DeviceEntry>,
    #[serde(default)]
    pub infrared_remote_list: Vec<DeviceEntry>,
}

/// One entry of either device sub-list.
///
/// Physical devices carry `deviceType`, infrared remotes carry `remoteType`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceEntry {
    pub device_name: String,
    pub device_id: String,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub remote_type: Option<String>,
    #[serde(default)]
    pub hub_device_id: Option<String>,
}

/// Command payload for `POST /v1.1/devices/{id}/commands`.
///
/// The command string is opaque to this client, e.g. `turnOn`, `turnOff`,
/// `toggle`. Semantic validation is the vendor's responsibility.
#[derive(Debug, Serialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    /// A SwitchBot hardware device.
    Physical,
    /// A foreign appliance controlled through an infrared hub.
    Infrared,
}

/// A device as stored in the name-keyed directory.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub id: String,
    pub kind: DeviceKind,
    /// Vendor model name: `deviceType` for physical devices, `remoteType` for
    /// infrared remotes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_device_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_inventory_deserializes_vendor_payload() {
        let payload = json!({
            "statusCode": 100,
            "message": "success",
            "body": {
                "deviceList": [
                    {"deviceName": "A", "deviceId": "1", "deviceType": "Plug", "hubDeviceId": "H1"}
                ],
                "infraredRemoteList": [
                    {"deviceName": "B", "deviceId": "2", "remoteType": "TV"}
                ]
            }
        });

        let envelope: Envelope<DeviceInventory> =
            serde_json::from_value(payload).expect("valid payload");
        assert_eq!(100, envelope.status_code);
        assert_eq!("success", envelope.message);
        assert_eq!(1, envelope.body.device_list.len());
        assert_eq!(1, envelope.body.infrared_remote_list.len());
        assert_eq!("1", envelope.body.device_list[0].device_id);
        assert_eq!(Some("TV".into()), envelope.body.infrared_remote_list[0].remote_type);
    }

    #[test]
    fn envelope_without_body_uses_default() {
        let envelope: Envelope<DeviceInventory> =
            serde_json::from_value(json!({"statusCode": 190, "message": "rate limited"}))
                .expect("body is optional");
        assert!(envelope.body.device_list.is_empty());
        assert!(envelope.body.infrared_remote_list.is_empty());
    }

    #[test]
    fn command_request_serializes_to_vendor_shape() {
        let payload = serde_json::to_value(CommandRequest {
            command: "turnOn".into(),
        })
        .expect("serializable");
        assert_eq!(json!({"command": "turnOn"}), payload);
    }
}
