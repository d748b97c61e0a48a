//! TL1 line builders.
//!
//! TR-069 parameters are pushed to the ONT through numbered `HGUTR069SPARAM`
//! slots. Each [`Param`] owns a fixed slot; overwriting a parameter means
//! deleting the slot first and entering it again.

use std::fmt;

use super::position::OntPosition;
use super::validate::PhonePort;

const WAN_CONNECTION: &str = "InternetGatewayDevice.WANDevice.1.WANConnectionDevice.1";
const WLAN: &str = "InternetGatewayDevice.LANDevice.1.WLANConfiguration";
const VOICE_PROFILE: &str = "InternetGatewayDevice.Services.VoiceService.1.VoiceProfile.1";

/// Radio band of a WLAN configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// 2.4 GHz, WLAN configuration 1.
    Ghz24,
    /// 5 GHz, WLAN configuration 5.
    Ghz5,
}

impl Band {
    fn wlan_index(self) -> u32 {
        match self {
            Band::Ghz24 => 1,
            Band::Ghz5 => 5,
        }
    }
}

/// A TR-069 parameter and its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    WanVlan,
    PppoeUsername,
    PppoePassword,
    Ssid(Band),
    PreSharedKey(Band),
    WebAccountPassword,
    AccountPassword,
    SipOutboundProxy,
    SipProxyServer,
    SipRegistrarServer,
    SipUserAgentDomain,
    LineEnable(PhonePort),
    DirectoryNumber(PhonePort),
    SipAuthUserName(PhonePort),
    SipAuthPassword(PhonePort),
    /// TR-069 domain flag of a LAN port.
    Tr069Domain(u8),
}

impl Param {
    /// Slot number of the parameter.
    pub fn slot(self) -> u32 {
        match self {
            Param::WanVlan => 1,
            Param::PppoeUsername => 2,
            Param::PppoePassword => 3,
            Param::Ssid(Band::Ghz24) => 4,
            Param::PreSharedKey(Band::Ghz24) => 5,
            Param::Ssid(Band::Ghz5) => 6,
            Param::PreSharedKey(Band::Ghz5) => 7,
            Param::WebAccountPassword => 8,
            Param::AccountPassword => 9,
            Param::SipOutboundProxy => 10,
            Param::SipProxyServer => 11,
            Param::SipRegistrarServer => 12,
            Param::SipUserAgentDomain => 13,
            Param::LineEnable(_) => 14,
            Param::DirectoryNumber(_) => 15,
            Param::SipAuthUserName(_) => 16,
            Param::SipAuthPassword(_) => 17,
            Param::Tr069Domain(_) => 30,
        }
    }

    /// Full TR-069 parameter name.
    pub fn name(self) -> String {
        match self {
            Param::WanVlan => format!("{WAN_CONNECTION}.X_CT-COM_WANGponLinkConfig.VLANIDMark"),
            Param::PppoeUsername => format!("{WAN_CONNECTION}.WANPPPConnection.1.Username"),
            Param::PppoePassword => format!("{WAN_CONNECTION}.WANPPPConnection.1.Password"),
            Param::Ssid(band) => format!("{WLAN}.{}.SSID", band.wlan_index()),
            Param::PreSharedKey(band) => {
                format!("{WLAN}.{}.PreSharedKey.1.PreSharedKey", band.wlan_index())
            }
            Param::WebAccountPassword => {
                "InternetGatewayDevice.X_Authentication.WebAccount.Password".to_string()
            }
            Param::AccountPassword => {
                "InternetGatewayDevice.X_Authentication.Account.Password".to_string()
            }
            Param::SipOutboundProxy => format!("{VOICE_PROFILE}.SIP.OutboundProxy"),
            Param::SipProxyServer => format!("{VOICE_PROFILE}.SIP.ProxyServer"),
            Param::SipRegistrarServer => format!("{VOICE_PROFILE}.SIP.RegistrarServer"),
            Param::SipUserAgentDomain => format!("{VOICE_PROFILE}.SIP.UserAgentDomain"),
            Param::LineEnable(port) => format!("{VOICE_PROFILE}.Line.{port}.Enable"),
            Param::DirectoryNumber(port) => format!("{VOICE_PROFILE}.Line.{port}.DirectoryNumber"),
            Param::SipAuthUserName(port) => {
                format!("{VOICE_PROFILE}.Line.{port}.SIP.AuthUserName")
            }
            Param::SipAuthPassword(port) => {
                format!("{VOICE_PROFILE}.Line.{port}.SIP.AuthPassword")
            }
            Param::Tr069Domain(lan) => {
                format!("InternetGatewayDevice.X_ASB_COM_EthPort.EthPort.{lan}.isTr069Domain")
            }
        }
    }
}

/// A parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// Free text, written as a TL1 quoted string.
    Text(&'a str),
    /// Numbers, addresses and keywords, written as-is.
    Bare(&'a str),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "\"{}\"", text.replace('"', "\\\"")),
            Value::Bare(raw) => f.write_str(raw),
        }
    }
}

fn sparam_aid(position: &OntPosition, param: Param) -> String {
    format!("HGUTR069SPARAM-{}-{}", position.tl1_aid(), param.slot())
}

/// `DLT-HGUTR069-SPARAM` for the slot of `param`.
pub fn delete_param(position: &OntPosition, param: Param) -> String {
    format!("DLT-HGUTR069-SPARAM::{};", sparam_aid(position, param))
}

/// `ENT-HGUTR069-SPARAM` setting `param` to `value`.
pub fn set_param(position: &OntPosition, param: Param, value: Value<'_>) -> String {
    format!(
        "ENT-HGUTR069-SPARAM::{}::::PARAMNAME={},PARAMVALUE={};",
        sparam_aid(position, param),
        param.name(),
        value
    )
}

/// Logical UNI port of the VEIP card, e.g. `ONTL2UNI-1-1-3-7-12-14-1`.
pub fn l2_uni(position: &OntPosition) -> String {
    format!("ONTL2UNI-{}-14-1", position.tl1_aid())
}

/// `SET-QOS-USQUEUE` binding an upstream queue of the VEIP UNI to a
/// bandwidth profile.
pub fn upstream_queue(position: &OntPosition, queue: u8, profile: &str) -> String {
    format!(
        "SET-QOS-USQUEUE::ONTL2UNIQ-{}-14-1-{}::::USBWPROFNAME={};",
        position.tl1_aid(),
        queue,
        profile
    )
}

/// `ENT-VLANEGPORT` adding `vlan` as single-tagged egress of the VEIP UNI.
pub fn vlan_egress(position: &OntPosition, vlan: u16) -> String {
    format!(
        "ENT-VLANEGPORT::{}:::0,{}:PORTTRANSMODE=SINGLETAGGED;",
        l2_uni(position),
        vlan
    )
}

/// A script of TL1/CLI lines, rendered one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Append an empty separator line.
    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}
