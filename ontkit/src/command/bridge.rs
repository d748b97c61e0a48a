//! Bridge-mode re-provisioning through the OLT CLI.
//!
//! The generated script has four steps: deprovision the ONT, provision it
//! again, set up the bridge port, then turn off the TR-069 domain of the LAN
//! port over TL1.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::position::OntPosition;
use super::profile::NetworkProfile;
use super::tl1::{Param, Script, Value, set_param};
use super::validate::{Serial, normalize_desc1, normalize_desc2, require, require_numeric};
use crate::console::OntCommand;
use crate::error::CommandError;

const CARDS: &[u8] = &[1, 14];
const LAN_PORTS: std::ops::RangeInclusive<u8> = 1..=4;

/// Which service the bridge carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeKind {
    Network,
    Voip,
}

impl BridgeKind {
    /// Upstream queue of the bridged LAN port.
    pub fn upstream_queue(self) -> u8 {
        match self {
            BridgeKind::Network => 0,
            BridgeKind::Voip => 5,
        }
    }
}

impl FromStr for BridgeKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "network" | "net" => Ok(BridgeKind::Network),
            "voip" => Ok(BridgeKind::Voip),
            other => Err(CommandError::InvalidChoice {
                field: "bridge type",
                value: other.to_string(),
                allowed: "network, voip",
            }),
        }
    }
}

impl fmt::Display for BridgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeKind::Network => write!(f, "network"),
            BridgeKind::Voip => write!(f, "voip"),
        }
    }
}

/// A LAN port of an ONT card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BridgePort {
    pub position: OntPosition,
    pub card: u8,
    pub lan: u8,
}

impl BridgePort {
    /// Create a bridge port. The card must be 1 or 14 and the LAN port 1 to 4.
    pub fn new(position: OntPosition, card: u8, lan: u8) -> Result<Self, CommandError> {
        if !CARDS.contains(&card) {
            return Err(CommandError::InvalidChoice {
                field: "card",
                value: card.to_string(),
                allowed: "1, 14",
            });
        }
        if !LAN_PORTS.contains(&lan) {
            return Err(CommandError::InvalidChoice {
                field: "LAN port",
                value: lan.to_string(),
                allowed: "1, 2, 3, 4",
            });
        }
        Ok(Self {
            position,
            card,
            lan,
        })
    }

    /// Card path, e.g. `1/1/3/7/12/14`.
    pub fn card_path(&self) -> String {
        format!("{}/{}", self.position.cli_path(), self.card)
    }

    /// LAN port path, e.g. `1/1/3/7/12/14/1`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.card_path(), self.lan)
    }

    /// Command listing the MAC addresses learned on the port.
    pub fn verify_mac(&self) -> String {
        format!("show vlan bridge-port-fdb {}", self.path())
    }

    /// Command showing the bridge port configuration.
    pub fn verify_vlan(&self) -> String {
        format!("info configure bridge port {}", self.path())
    }
}

/// A bridge request as filled in the form.
#[derive(Debug, Clone)]
pub struct BridgeRequest {
    pub port: BridgePort,
    pub kind: BridgeKind,
    pub desc1: String,
    pub desc2: String,
    pub serial: String,
    /// Bridge VLAN; blank uses the first city's VLAN for `kind`.
    pub vlan: String,
}

impl BridgeRequest {
    pub fn new(port: BridgePort, kind: BridgeKind) -> Self {
        Self {
            port,
            kind,
            desc1: String::new(),
            desc2: String::new(),
            serial: String::new(),
            vlan: String::new(),
        }
    }

    pub fn desc1(mut self, value: impl Into<String>) -> Self {
        self.desc1 = value.into();
        self
    }

    pub fn desc2(mut self, value: impl Into<String>) -> Self {
        self.desc2 = value.into();
        self
    }

    pub fn serial(mut self, value: impl Into<String>) -> Self {
        self.serial = value.into();
        self
    }

    pub fn vlan(mut self, value: impl Into<String>) -> Self {
        self.vlan = value.into();
        self
    }
}

impl OntCommand for BridgeRequest {
    fn name(&self) -> &'static str {
        "bridge"
    }

    fn render(&self, profile: &NetworkProfile) -> Result<String, CommandError> {
        let serial = Serial::parse(&self.serial)?;
        let desc1 = normalize_desc1(require("Client name", &self.desc1)?);
        let desc2 = normalize_desc2(require("Box and port", &self.desc2)?);
        let vlan: u16 = if self.vlan.trim().is_empty() {
            profile.first_vlan(self.kind)
        } else {
            require_numeric("VLAN", &self.vlan)?
        };

        let ont = self.port.position.cli_path();
        let lan = self.port.path();

        let mut script = Script::new();
        script
            .push("STEP 1 -> DEPROVISION ONT:")
            .push(format!("configure equipment ont interface {ont} admin-state down"))
            .push(format!("configure equipment ont no interface {ont}"))
            .blank()
            .push("STEP 2 -> PROVISION ONT:")
            .push(format!(
                "configure equipment ont interface {ont} sw-ver-pland auto desc1 {desc1} desc2 {desc2} sernum {} subslocid WILDCARD fec-up disable optics-hist enable sw-dnload-version disabled voip-allowed veip log-auth-pwd plain:** pland-cfgfile1 auto dnload-cfgfile1 auto planned-us-rate nominal-line-rate",
                serial.cli()
            ))
            .blank()
            .push(format!("configure equipment ont interface {ont} admin-state up"))
            .blank()
            .push("STEP 3 -> BRIDGE PORT:")
            .push(format!(
                "configure equipment ont slot {} planned-card-type ethernet plndnumdataports 4 plndnumvoiceports 0 admin-state up",
                self.port.card_path()
            ))
            .blank()
            .push(format!(
                "configure qos interface {lan} upstream-queue {} bandwidth-profile name:{}",
                self.kind.upstream_queue(),
                profile.upstream_profile
            ))
            .blank()
            .push(format!("configure interface port uni:{lan} admin-up"))
            .push(format!("configure bridge port {lan} max-unicast-mac 12 max-committed-mac 1"))
            .push(format!("configure bridge port {lan} vlan-id {vlan}"))
            .push(format!("configure bridge port {lan} pvid {vlan}"))
            .blank()
            .push("STEP 4 -> TL1 COMMAND:")
            .push(set_param(
                &self.port.position,
                Param::Tr069Domain(self.port.lan),
                Value::Bare("false"),
            ));

        Ok(script.to_string())
    }
}

/// One-line checks run after a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCheck {
    Mac(BridgePort),
    Vlan(BridgePort),
}

impl OntCommand for BridgeCheck {
    fn name(&self) -> &'static str {
        match self {
            BridgeCheck::Mac(_) => "verify-mac",
            BridgeCheck::Vlan(_) => "verify-vlan",
        }
    }

    fn render(&self, _profile: &NetworkProfile) -> Result<String, CommandError> {
        Ok(match self {
            BridgeCheck::Mac(port) => port.verify_mac(),
            BridgeCheck::Vlan(port) => port.verify_vlan(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port() -> BridgePort {
        BridgePort::new(OntPosition::new(1, 8, 6), 14, 2).unwrap()
    }

    fn request(kind: BridgeKind) -> BridgeRequest {
        BridgeRequest::new(port(), kind)
            .desc1("jaqueline lima")
            .desc2("cto-39 p2")
            .serial("ALCLFC205F5D")
    }

    #[test]
    fn test_network_bridge_script() {
        let text = request(BridgeKind::Network)
            .vlan("2760")
            .render(&NetworkProfile::default())
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "STEP 1 -> DEPROVISION ONT:");
        assert_eq!(lines[1], "configure equipment ont interface 1/1/1/8/6 admin-state down");
        assert_eq!(lines[2], "configure equipment ont no interface 1/1/1/8/6");
        assert!(lines[5].starts_with(
            "configure equipment ont interface 1/1/1/8/6 sw-ver-pland auto desc1 JAQUELINE_LIMA desc2 CTO-39-P2 sernum ALCL:FC205F5D subslocid WILDCARD"
        ));
        assert!(text.contains(
            "configure equipment ont slot 1/1/1/8/6/14 planned-card-type ethernet plndnumdataports 4 plndnumvoiceports 0 admin-state up"
        ));
        assert!(text.contains(
            "configure qos interface 1/1/1/8/6/14/2 upstream-queue 0 bandwidth-profile name:HSI_1G_UP"
        ));
        assert!(text.contains("configure interface port uni:1/1/1/8/6/14/2 admin-up"));
        assert!(text.contains("configure bridge port 1/1/1/8/6/14/2 vlan-id 2760\n"));
        assert!(text.contains("configure bridge port 1/1/1/8/6/14/2 pvid 2760\n"));
        assert_eq!(
            lines.last().copied(),
            Some(
                "ENT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-1-8-6-30::::PARAMNAME=InternetGatewayDevice.X_ASB_COM_EthPort.EthPort.2.isTr069Domain,PARAMVALUE=false;"
            )
        );
    }

    #[test]
    fn test_voip_bridge_uses_queue_five_and_voip_vlan() {
        let text = request(BridgeKind::Voip)
            .render(&NetworkProfile::default())
            .unwrap();
        assert!(text.contains("upstream-queue 5 bandwidth-profile"));
        assert!(text.contains("vlan-id 300\n"));
    }

    #[test]
    fn test_serial_is_required() {
        let err = BridgeRequest::new(port(), BridgeKind::Network)
            .render(&NetworkProfile::default())
            .unwrap_err();
        assert_eq!(err, CommandError::MissingField { field: "ALCL" });
    }

    #[test]
    fn test_port_choices() {
        let pos = OntPosition::new(1, 1, 1);
        assert!(BridgePort::new(pos, 1, 4).is_ok());
        assert!(matches!(
            BridgePort::new(pos, 2, 1),
            Err(CommandError::InvalidChoice { field: "card", .. })
        ));
        assert!(matches!(
            BridgePort::new(pos, 14, 5),
            Err(CommandError::InvalidChoice { field: "LAN port", .. })
        ));
    }

    #[test]
    fn test_checks() {
        let profile = NetworkProfile::default();
        assert_eq!(
            BridgeCheck::Mac(port()).render(&profile).unwrap(),
            "show vlan bridge-port-fdb 1/1/1/8/6/14/2"
        );
        assert_eq!(
            BridgeCheck::Vlan(port()).render(&profile).unwrap(),
            "info configure bridge port 1/1/1/8/6/14/2"
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("VoIP".parse::<BridgeKind>().unwrap(), BridgeKind::Voip);
        assert_eq!("network".parse::<BridgeKind>().unwrap(), BridgeKind::Network);
        assert!("fiber".parse::<BridgeKind>().is_err());
    }
}
