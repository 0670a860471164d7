// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Tool-call surface for conversational front ends.
//!
//! A chat front end invokes device operations by name with JSON-encoded
//! arguments. The mapping from names to handlers is a closed table over
//! [`ToolName`]: unknown names are rejected when the call is decoded, and a
//! front end can validate its advertised tool list against [`names`] at
//! startup instead of resolving handlers dynamically at call time.

use crate::client::SwitchBotClient;
use crate::errors::ServiceError;
use crate::util::enum_from_str;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// Operations exposed to conversational front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    ControlDeviceWithName,
    GetDeviceStatusWithName,
}

/// A decoded tool invocation with validated name and arguments.
#[derive(Debug, PartialEq)]
pub enum ToolCall {
    ControlDevice { device_name: String, command: String },
    DeviceStatus { device_name: String },
}

#[derive(Deserialize)]
struct ControlDeviceArgs {
    device_name: String,
    command: String,
}

#[derive(Deserialize)]
struct DeviceStatusArgs {
    device_name: String,
}

/// Result payload handed back to the front end.
#[derive(Debug, Serialize)]
pub struct ToolResponse {
    pub message: String,
}

/// All valid tool names, for allow-list validation at startup.
pub fn names() -> &'static [&'static str] {
    ToolName::VARIANTS
}

impl ToolCall {
    /// Decode a named tool invocation with JSON-encoded arguments.
    pub fn parse(name: &str, args: &str) -> Result<Self, ServiceError> {
        let call = match enum_from_str::<ToolName>(name, "tool")? {
            ToolName::ControlDeviceWithName => {
                let args: ControlDeviceArgs = parse_args(name, args)?;
                ToolCall::ControlDevice {
                    device_name: args.device_name,
                    command: args.command,
                }
            }
            ToolName::GetDeviceStatusWithName => {
                let args: DeviceStatusArgs = parse_args(name, args)?;
                ToolCall::DeviceStatus {
                    device_name: args.device_name,
                }
            }
        };
        Ok(call)
    }
}

fn parse_args<'a, T: Deserialize<'a>>(name: &str, args: &'a str) -> Result<T, ServiceError> {
    serde_json::from_str(args)
        .map_err(|e| ServiceError::BadRequest(format!("Invalid arguments for {name}: {e}")))
}

/// Execute a tool call against the client and render a human-readable result.
///
/// Failures stay typed: the front end can tell an unknown device name from an
/// unreachable service without string matching.
pub async fn dispatch(
    client: &mut SwitchBotClient,
    call: ToolCall,
) -> Result<ToolResponse, ServiceError> {
    match call {
        ToolCall::ControlDevice {
            device_name,
            command,
        } => {
            let response = client.control(&device_name, &command).await?;
            Ok(ToolResponse {
                message: format!("Sent '{command}' to '{device_name}': {}", response.message),
            })
        }
        ToolCall::DeviceStatus { device_name } => {
            let status = client.status_by_name(&device_name).await?;
            Ok(ToolResponse {
                message: status.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn names_lists_the_complete_allow_list() {
        assert_eq!(
            &["control_device_with_name", "get_device_status_with_name"],
            names()
        );
    }

    #[test]
    fn parse_decodes_a_control_invocation() {
        let call = ToolCall::parse(
            "control_device_with_name",
            r#"{"device_name": "ダイニングのライト", "command": "toggle"}"#,
        )
        .expect("valid call");

        assert_eq!(
            ToolCall::ControlDevice {
                device_name: "ダイニングのライト".into(),
                command: "toggle".into()
            },
            call
        );
    }

    #[test]
    fn parse_decodes_a_status_invocation() {
        let call = ToolCall::parse("get_device_status_with_name", r#"{"device_name": "A"}"#)
            .expect("valid call");
        assert_eq!(
            ToolCall::DeviceStatus {
                device_name: "A".into()
            },
            call
        );
    }

    #[test]
    fn parse_rejects_an_unknown_tool_name() {
        let result = ToolCall::parse("reboot_the_house", "{}");
        assert!(
            matches!(result, Err(ServiceError::BadRequest(_))),
            "Unknown tool must return BadRequest, but got: {:?}",
            result
        );
    }

    #[rstest]
    #[case("{}")]
    #[case(r#"{"device_name": "A"}"#)]
    #[case("not json")]
    fn parse_rejects_malformed_control_arguments(#[case] args: &str) {
        let result = ToolCall::parse("control_device_with_name", args);
        assert!(
            matches!(result, Err(ServiceError::BadRequest(_))),
            "Malformed arguments must return BadRequest, but got: {:?}",
            result
        );
    }
}
