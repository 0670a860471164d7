// Copyright (c) 2025 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

#![forbid(non_ascii_idents)]
#![deny(unsafe_code)]

use std::path::Path;

use clap::{ArgMatches, Command, arg};
use log::info;
use url::Url;

use uc_intg_switchbot::client::model::DeviceKind;
use uc_intg_switchbot::client::SwitchBotClient;
use uc_intg_switchbot::configuration::{
    DEF_CONFIG_FILE, ENV_SWITCHBOT_SECRET, ENV_SWITCHBOT_TOKEN, get_configuration,
};
use uc_intg_switchbot::tools::ToolCall;
use uc_intg_switchbot::util::enum_from_str;
use uc_intg_switchbot::{APP_VERSION, built_info, tools};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Command::new(built_info::PKG_NAME)
        .author("Unfolded Circle ApS")
        .version(APP_VERSION)
        .about("SwitchBot cloud device control")
        .arg(arg!(-c --config <FILE> "Configuration file").required(false))
        .arg(arg!(-u --url <URL> "SwitchBot API origin (overrides configuration)").required(false))
        .arg(arg!(-t --token <TOKEN> "SwitchBot API token (overrides configuration)").required(false))
        .arg(arg!(-s --secret <SECRET> "SwitchBot signing secret (overrides configuration)").required(false))
        .subcommand_required(true)
        .subcommand(
            Command::new("devices")
                .about("List all devices by name")
                .arg(arg!(-k --kind <KIND> "Only list one device kind: physical or infrared").required(false)),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a device name to its vendor identifier")
                .arg(arg!(<NAME> "Device name")),
        )
        .subcommand(
            Command::new("status")
                .about("Query the current state of a device")
                .arg(arg!(<NAME> "Device name")),
        )
        .subcommand(
            Command::new("control")
                .about("Send a command to a device")
                .arg(arg!(<NAME> "Device name"))
                .arg(arg!(<COMMAND> "Vendor command, e.g. turnOn, turnOff, toggle")),
        )
        .subcommand(
            Command::new("tool")
                .about("Invoke a tool-call operation the way a chat front end would")
                .arg(arg!(<TOOL> "Tool name"))
                .arg(arg!([ARGS] "JSON-encoded arguments").default_value("{}")),
        )
        .get_matches();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg_file = match args.get_one::<String>("config") {
        None => {
            if Path::new(DEF_CONFIG_FILE).exists() {
                info!("Loading default configuration file: {}", DEF_CONFIG_FILE);
                Some(DEF_CONFIG_FILE)
            } else {
                None
            }
        }
        Some(c) => Some(c.as_str()),
    };
    let mut cfg = get_configuration(cfg_file).expect("Failed to read configuration");

    if let Some(url) = args.get_one::<String>("url") {
        cfg.switchbot.set_url(Url::parse(url)?);
    }
    if let Some(token) = args.get_one::<String>("token") {
        cfg.switchbot.set_token(token);
    }
    if let Some(secret) = args.get_one::<String>("secret") {
        cfg.switchbot.set_secret(secret);
    }

    if !cfg.switchbot.has_credentials() {
        eprintln!(
            "Missing SwitchBot credentials: set switchbot.token / switchbot.secret in the configuration or the {ENV_SWITCHBOT_TOKEN} / {ENV_SWITCHBOT_SECRET} environment variables"
        );
        std::process::exit(1);
    }

    let mut client = SwitchBotClient::connect(&cfg.switchbot).await?;

    match args.subcommand() {
        Some(("devices", sub)) => devices(&client, sub)?,
        Some(("resolve", sub)) => {
            let name = required_arg(sub, "NAME");
            println!("{}", client.resolve(name)?.id);
        }
        Some(("status", sub)) => {
            let name = required_arg(sub, "NAME");
            let status = client.status_by_name(name).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Some(("control", sub)) => {
            let name = required_arg(sub, "NAME");
            let command = required_arg(sub, "COMMAND");
            let response = client.control(name, command).await?;
            println!("{}", response.message);
        }
        Some(("tool", sub)) => {
            let call = ToolCall::parse(required_arg(sub, "TOOL"), required_arg(sub, "ARGS"))?;
            let response = tools::dispatch(&mut client, call).await?;
            println!("{}", response.message);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

fn devices(client: &SwitchBotClient, sub: &ArgMatches) -> anyhow::Result<()> {
    let output = match sub.get_one::<String>("kind") {
        Some(kind) => {
            let kind: DeviceKind = enum_from_str(kind, "device kind")?;
            serde_json::to_string_pretty(&client.directory().of_kind(kind))?
        }
        None => serde_json::to_string_pretty(client.devices())?,
    };
    println!("{output}");
    Ok(())
}

fn required_arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .expect("argument is required by clap")
}
