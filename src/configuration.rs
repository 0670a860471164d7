// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Configuration file handling.

use crate::util::non_empty_from_env;
use config::Config;
use log::{info, warn};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;
use url::Url;

/// Default configuration file.
pub const DEF_CONFIG_FILE: &str = "configuration.yaml";

/// SwitchBot cloud API origin.
pub const DEF_API_URL: &str = "https://api.switch-bot.com";

/// Environment variable holding the API token.
///
/// Takes precedence over the token in the configuration file, so credentials
/// don't have to be written to disk.
pub const ENV_SWITCHBOT_TOKEN: &str = "SWITCHBOT_TOKEN";

/// Environment variable holding the request-signing secret.
///
/// Takes precedence over the secret in the configuration file.
pub const ENV_SWITCHBOT_SECRET: &str = "SWITCHBOT_SECRET";

/// Environment variable to enable SwitchBot API message tracing.
///
/// Valid values: `true` or `1`.
///
/// **Attention:** this setting is only for debugging and logs request header
/// timestamps and nonces!
pub const ENV_API_MSG_TRACING: &str = "SB_API_MSG_TRACING";

#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub switchbot: SwitchBotSettings,
}

#[serde_as]
#[derive(Clone, serde::Deserialize, serde::Serialize)]
pub struct SwitchBotSettings {
    url: Url,
    token: String,
    secret: String,
    /// HTTP request timeout in seconds.
    /// This is the total time before a response must be received, including DNS name resolution.
    // simplifies data migration: missing value in existing configuration will be set with a default!
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u8,
    /// Minimum spacing between consecutive outbound API calls.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "throttle_ms")]
    pub throttle: Duration,
}

impl Default for SwitchBotSettings {
    fn default() -> Self {
        Self {
            url: Url::parse(DEF_API_URL).unwrap(),
            token: "".to_string(),
            secret: "".to_string(),
            request_timeout: default_request_timeout(),
            throttle: Duration::from_secs(1),
        }
    }
}

impl SwitchBotSettings {
    /// Return the configured SwitchBot API origin.
    pub fn get_url(&self) -> Url {
        self.url.clone()
    }

    /// Return the configured API token.
    ///
    /// This is either the value of [`ENV_SWITCHBOT_TOKEN`], or the local
    /// configuration token.
    pub fn get_token(&self) -> String {
        non_empty_from_env(ENV_SWITCHBOT_TOKEN).unwrap_or_else(|| self.token.clone())
    }

    /// Return the configured signing secret.
    ///
    /// This is either the value of [`ENV_SWITCHBOT_SECRET`], or the local
    /// configuration secret.
    pub fn get_secret(&self) -> String {
        non_empty_from_env(ENV_SWITCHBOT_SECRET).unwrap_or_else(|| self.secret.clone())
    }

    /// Checks if a token and a secret are available from any source.
    pub fn has_credentials(&self) -> bool {
        !self.get_token().is_empty() && !self.get_secret().is_empty()
    }

    /// Update the local configuration URL.
    pub fn set_url(&mut self, url: Url) {
        self.url = url;
    }

    /// Update the local configuration token.
    pub fn set_token(&mut self, token: impl AsRef<str>) {
        self.token = token.as_ref().trim().to_string();
    }

    /// Update the local configuration secret.
    pub fn set_secret(&mut self, secret: impl AsRef<str>) {
        self.secret = secret.as_ref().trim().to_string();
    }
}

fn default_request_timeout() -> u8 {
    10
}

/// Load the configuration settings.
///
/// The application provides default values which can be overriden in the following order:
/// 1. Configuration settings in the read-only yaml configuration file specified in `filename`
/// 2. Environment variables with prefix `SB_` (works only for cfg keys not containing a `_`!)
///
/// Credentials may additionally be supplied with the dedicated
/// [`ENV_SWITCHBOT_TOKEN`] and [`ENV_SWITCHBOT_SECRET`] variables, see
/// [`SwitchBotSettings::get_token`].
pub fn get_configuration(filename: Option<&str>) -> Result<Settings, config::ConfigError> {
    // default configuration
    let mut config = Config::builder().add_source(Config::try_from(&Settings::default())?);
    // read optional configuration file to override defaults
    if let Some(filename) = filename {
        info!("Loading configuration file: {filename}");
        config = config.add_source(config::File::with_name(filename));
    }

    // Add in settings from the environment (with a prefix of SB)
    // E.g. `SB_SWITCHBOT_URL=https://api.switch-bot.com` would set the `switchbot.url` key
    // This does NOT WORK for nested configurations! https://github.com/mehcode/config-rs/issues/312
    let config = config
        .add_source(config::Environment::with_prefix("SB").separator("_"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;

    check_cfg_values(settings)
}

fn check_cfg_values(mut settings: Settings) -> Result<Settings, config::ConfigError> {
    if settings.switchbot.throttle.as_millis() < 100 {
        warn!("Invalid SwitchBot throttle setting, using default.");
        settings.switchbot.throttle = Duration::from_secs(1);
    }

    if settings.switchbot.request_timeout == 0 {
        warn!("Invalid SwitchBot request timeout, using default.");
        settings.switchbot.request_timeout = default_request_timeout();
    }

    match settings.switchbot.url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(config::ConfigError::Message(format!(
                "invalid scheme in switchbot.url: {}. Valid: [http, https]",
                scheme
            )));
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_use_vendor_origin_and_one_second_throttle() {
        let settings = SwitchBotSettings::default();
        assert_eq!(DEF_API_URL, settings.get_url().as_str().trim_end_matches('/'));
        assert_eq!(Duration::from_secs(1), settings.throttle);
        assert_eq!(10, settings.request_timeout);
        assert!(!settings.has_credentials());
    }

    #[test]
    fn set_token_and_secret_trim_whitespace() {
        let mut settings = SwitchBotSettings::default();
        settings.set_token(" abc \n");
        settings.set_secret("\tdef ");
        assert_eq!("abc", settings.get_token());
        assert_eq!("def", settings.get_secret());
        assert!(settings.has_credentials());
    }

    #[test]
    fn out_of_range_values_are_replaced_with_defaults() {
        let mut settings = Settings::default();
        settings.switchbot.throttle = Duration::from_millis(1);
        settings.switchbot.request_timeout = 0;

        let checked = check_cfg_values(settings).expect("settings must be valid");
        assert_eq!(Duration::from_secs(1), checked.switchbot.throttle);
        assert_eq!(10, checked.switchbot.request_timeout);
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let mut settings = Settings::default();
        settings
            .switchbot
            .set_url(Url::parse("ftp://api.switch-bot.com").unwrap());
        assert!(check_cfg_values(settings).is_err());
    }
}
