// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Name-keyed device directory.

use crate::client::model::{Device, DeviceEntry, DeviceInventory, DeviceKind};
use crate::errors::ServiceError;
use log::warn;
use std::collections::HashMap;

/// Mapping of device names to devices.
///
/// Names are unique, case-sensitive keys and may be non-ASCII. The directory
/// is built from one full inventory fetch and is never partially populated: a
/// failed fetch leaves it empty.
#[derive(Debug, Default)]
pub struct DeviceDirectory {
    devices: HashMap<String, Device>,
}

impl DeviceDirectory {
    /// Build the directory from a fetched device inventory.
    ///
    /// Physical devices are inserted first, then infrared remotes. The vendor
    /// treats device names as unique across both sub-lists; on a duplicate
    /// name the later entry wins and the overwrite is logged.
    pub fn from_inventory(inventory: DeviceInventory) -> Self {
        let mut devices = HashMap::with_capacity(
            inventory.device_list.len() + inventory.infrared_remote_list.len(),
        );
        for entry in inventory.device_list {
            insert_entry(&mut devices, entry, DeviceKind::Physical);
        }
        for entry in inventory.infrared_remote_list {
            insert_entry(&mut devices, entry, DeviceKind::Infrared);
        }

        Self { devices }
    }

    /// Look up a device by name.
    ///
    /// Returns `DeviceNotFound` for an unknown name. An empty directory
    /// (after a failed fetch) fails every lookup the same way.
    pub fn resolve(&self, name: &str) -> Result<&Device, ServiceError> {
        self.devices
            .get(name)
            .ok_or_else(|| ServiceError::DeviceNotFound(name.to_string()))
    }

    /// All devices, keyed by name.
    pub fn devices(&self) -> &HashMap<String, Device> {
        &self.devices
    }

    /// Name-keyed view filtered to one device kind.
    pub fn of_kind(&self, kind: DeviceKind) -> HashMap<&str, &Device> {
        self.devices
            .iter()
            .filter(|(_, device)| device.kind == kind)
            .map(|(name, device)| (name.as_str(), device))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

fn insert_entry(devices: &mut HashMap<String, Device>, entry: DeviceEntry, kind: DeviceKind) {
    let model = match kind {
        DeviceKind::Physical => entry.device_type,
        DeviceKind::Infrared => entry.remote_type,
    };
    let device = Device {
        id: entry.device_id,
        kind,
        model,
        hub_device_id: entry.hub_device_id,
    };

    if let Some(old) = devices.insert(entry.device_name.clone(), device) {
        // vendor quirk: names are supposed to be unique across both sub-lists
        warn!(
            "Duplicate device name '{}': {} entry replaces device {}",
            entry.device_name, kind, old.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inventory(value: serde_json::Value) -> DeviceInventory {
        serde_json::from_value(value).expect("valid inventory")
    }

    #[test]
    fn from_inventory_merges_both_sub_lists() {
        let directory = DeviceDirectory::from_inventory(inventory(json!({
            "deviceList": [{"deviceName": "A", "deviceId": "1", "deviceType": "Plug"}],
            "infraredRemoteList": [{"deviceName": "B", "deviceId": "2", "remoteType": "TV"}]
        })));

        assert_eq!(2, directory.len());
        let a = directory.resolve("A").expect("A must resolve");
        assert_eq!("1", a.id);
        assert_eq!(DeviceKind::Physical, a.kind);
        assert_eq!(Some("Plug".into()), a.model);
        let b = directory.resolve("B").expect("B must resolve");
        assert_eq!("2", b.id);
        assert_eq!(DeviceKind::Infrared, b.kind);
    }

    #[test]
    fn duplicate_name_is_last_write_wins() {
        let directory = DeviceDirectory::from_inventory(inventory(json!({
            "deviceList": [{"deviceName": "Light", "deviceId": "1"}],
            "infraredRemoteList": [{"deviceName": "Light", "deviceId": "2", "remoteType": "Light"}]
        })));

        assert_eq!(1, directory.len());
        let device = directory.resolve("Light").expect("Light must resolve");
        assert_eq!("2", device.id, "infrared entry is inserted later and wins");
        assert_eq!(DeviceKind::Infrared, device.kind);
    }

    #[test]
    fn resolve_unknown_name_returns_device_not_found() {
        let directory = DeviceDirectory::from_inventory(inventory(json!({
            "deviceList": [{"deviceName": "A", "deviceId": "1"}],
            "infraredRemoteList": []
        })));

        let result = directory.resolve("unknown");
        assert_eq!(
            Err(ServiceError::DeviceNotFound("unknown".into())),
            result.map(|d| d.id.clone())
        );
    }

    #[test]
    fn empty_directory_fails_every_lookup() {
        let directory = DeviceDirectory::default();
        assert!(directory.is_empty());
        assert!(matches!(
            directory.resolve("A"),
            Err(ServiceError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn of_kind_filters_by_device_kind() {
        let directory = DeviceDirectory::from_inventory(inventory(json!({
            "deviceList": [
                {"deviceName": "A", "deviceId": "1"},
                {"deviceName": "B", "deviceId": "2"}
            ],
            "infraredRemoteList": [{"deviceName": "C", "deviceId": "3", "remoteType": "TV"}]
        })));

        let physical = directory.of_kind(DeviceKind::Physical);
        assert_eq!(2, physical.len());
        assert!(physical.contains_key("A") && physical.contains_key("B"));

        let infrared = directory.of_kind(DeviceKind::Infrared);
        assert_eq!(1, infrared.len());
        assert_eq!("3", infrared["C"].id);
    }
}
