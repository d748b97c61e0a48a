//! ONT command example
//!
//! Renders a provisioning, Wi-Fi or bridge script for an ONT and prints it.
//! A JSON network profile can replace the built-in one.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example ont_commands -- provision --slot 1 --pon 2 --index 3 \
//!     --name "Ana Souza" --box cto-3-p1 --serial ALCL:B3DA95BD --vlan 2760
//! cargo run --example ont_commands -- wifi --slot 1 --pon 2 --index 3 \
//!     --ssid CASA_ANA --wifi-key segredo123
//! cargo run --example ont_commands -- bridge --slot 1 --pon 2 --index 3 \
//!     --serial ALCLB3DA95BD --name "Ana Souza" --box cto-3-p1 --kind voip --lan 2
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use ontkit::audit::LogNotifier;
use ontkit::command::{
    BridgeKind, BridgePort, BridgeRequest, NetworkProfile, OntPosition, Provisioning, WifiChange,
    WifiRequest,
};
use ontkit::console::{Clipboard, Console, OntCommand};
use ontkit::error::ClipboardError;
use secrecy::SecretString;

/// Prints instead of copying.
struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        println!("{}", text);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let profile: NetworkProfile = match &args.profile {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => NetworkProfile::default(),
    };
    let mut console = Console::new(StdoutClipboard, LogNotifier).with_profile(profile);

    let position = OntPosition::parse(&args.slot, &args.pon, &args.index)?;

    let command: Box<dyn OntCommand> = match args.command.as_str() {
        "provision" => {
            let mut request = Provisioning::new(position)
                .desc1(&args.name)
                .desc2(&args.box_port)
                .serial(&args.serial)
                .vlan(&args.vlan);
            if let Some(user) = &args.pppoe_user {
                let password = args.pppoe_password.clone().unwrap_or_default();
                request = request.pppoe(user, SecretString::from(password));
            }
            Box::new(request)
        }
        "wifi" => {
            let change = match (&args.ssid, &args.wifi_key) {
                (Some(ssid), Some(key)) => WifiChange::NameAndPassword {
                    ssid: ssid.clone(),
                    key: SecretString::from(key.clone()),
                },
                (Some(ssid), None) => WifiChange::Name { ssid: ssid.clone() },
                (None, Some(key)) => WifiChange::Password {
                    key: SecretString::from(key.clone()),
                },
                (None, None) => {
                    eprintln!("Error: wifi needs --ssid and/or --wifi-key");
                    std::process::exit(1);
                }
            };
            Box::new(WifiRequest::new(position, change))
        }
        "bridge" => {
            let kind: BridgeKind = args.kind.parse()?;
            let port = BridgePort::new(position, args.card, args.lan)?;
            Box::new(
                BridgeRequest::new(port, kind)
                    .desc1(&args.name)
                    .desc2(&args.box_port)
                    .serial(&args.serial)
                    .vlan(&args.vlan),
            )
        }
        other => {
            eprintln!("Error: unknown command '{}' (provision, wifi, bridge)", other);
            std::process::exit(1);
        }
    };

    console.issue(command.as_ref())?;
    Ok(())
}

struct Args {
    command: String,
    slot: String,
    pon: String,
    index: String,
    name: String,
    box_port: String,
    serial: String,
    vlan: String,
    pppoe_user: Option<String>,
    pppoe_password: Option<String>,
    ssid: Option<String>,
    wifi_key: Option<String>,
    kind: String,
    card: u8,
    lan: u8,
    profile: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Args {
            command: String::new(),
            slot: String::new(),
            pon: String::new(),
            index: String::new(),
            name: String::new(),
            box_port: String::new(),
            serial: String::new(),
            vlan: String::new(),
            pppoe_user: None,
            pppoe_password: None,
            ssid: None,
            wifi_key: None,
            kind: "network".to_string(),
            card: 14,
            lan: 1,
            profile: None,
        };

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args.get(i + 1).cloned().unwrap_or_default();
            let mut takes_value = true;
            match flag {
                "--slot" => parsed.slot = value,
                "--pon" => parsed.pon = value,
                "--index" => parsed.index = value,
                "--name" => parsed.name = value,
                "--box" => parsed.box_port = value,
                "--serial" => parsed.serial = value,
                "--vlan" => parsed.vlan = value,
                "--pppoe-user" => parsed.pppoe_user = Some(value),
                "--pppoe-password" => parsed.pppoe_password = Some(value),
                "--ssid" => parsed.ssid = Some(value),
                "--wifi-key" => parsed.wifi_key = Some(value),
                "--kind" => parsed.kind = value,
                "--card" => parsed.card = value.parse().unwrap_or(14),
                "--lan" => parsed.lan = value.parse().unwrap_or(1),
                "--profile" => parsed.profile = Some(PathBuf::from(value)),
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                command => {
                    parsed.command = command.to_string();
                    takes_value = false;
                }
            }
            i += if takes_value { 2 } else { 1 };
        }

        parsed
    }
}

fn print_help() {
    println!("ONT command example");
    println!();
    println!("Usage: ont_commands <provision|wifi|bridge> [OPTIONS]");
    println!();
    println!("Options:");
    println!("      --slot/--pon/--index <N>   ONT position");
    println!("      --name <TEXT>              Client name (DESC1)");
    println!("      --box <TEXT>               Box and port (DESC2)");
    println!("      --serial <ALCL>            ONT serial");
    println!("      --vlan <N>                 Service VLAN");
    println!("      --pppoe-user/--pppoe-password <TEXT>");
    println!("      --ssid/--wifi-key <TEXT>   Wi-Fi name and key");
    println!("      --kind <network|voip>      Bridge type [default: network]");
    println!("      --card <1|14>              Bridge card [default: 14]");
    println!("      --lan <1-4>                Bridge LAN port [default: 1]");
    println!("      --profile <FILE>           JSON network profile");
}
