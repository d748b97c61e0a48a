//! Full TL1 provisioning of a new ONT.

use log::debug;
use secrecy::{ExposeSecret, SecretString};

use super::position::OntPosition;
use super::profile::NetworkProfile;
use super::tl1::{Param, Script, Value, l2_uni, set_param, upstream_queue, vlan_egress};
use super::validate::{Serial, normalize_desc1, normalize_desc2, require, require_numeric};
use crate::console::OntCommand;
use crate::error::CommandError;

/// Upstream queue for data traffic.
pub const DATA_QUEUE: u8 = 0;

/// Validated PPPoE credentials.
pub(crate) struct Pppoe<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

/// Check that PPPoE user and password are both given or both blank.
pub(crate) fn optional_pppoe<'a>(
    user: &'a str,
    password: &'a SecretString,
) -> Result<Option<Pppoe<'a>>, CommandError> {
    let user = user.trim();
    let password = password.expose_secret();
    match (user.is_empty(), password.trim().is_empty()) {
        (true, true) => Ok(None),
        (false, false) => Ok(Some(Pppoe { user, password })),
        _ => Err(CommandError::IncompletePppoe),
    }
}

/// Push the WAN VLAN and PPPoE credentials slots.
pub(crate) fn push_wan(
    script: &mut Script,
    pos: &OntPosition,
    vlan: u16,
    pppoe: Option<&Pppoe<'_>>,
) {
    let vlan = vlan.to_string();
    script.push(set_param(pos, Param::WanVlan, Value::Bare(&vlan)));
    if let Some(pppoe) = pppoe {
        script
            .push(set_param(pos, Param::PppoeUsername, Value::Text(pppoe.user)))
            .push(set_param(pos, Param::PppoePassword, Value::Text(pppoe.password)));
    }
}

/// Push the web and account password slots, both set to the serial.
pub(crate) fn push_web_password(script: &mut Script, pos: &OntPosition, serial: &Serial) {
    script
        .push(set_param(pos, Param::WebAccountPassword, Value::Text(serial.tl1())))
        .push(set_param(pos, Param::AccountPassword, Value::Text(serial.tl1())));
}

/// A new ONT as filled in the provisioning form.
#[derive(Debug)]
pub struct Provisioning {
    pub position: OntPosition,
    /// Client name.
    pub desc1: String,
    /// Box and port, or the PPPoE user when there is no box.
    pub desc2: String,
    pub serial: String,
    pub pppoe_user: String,
    pub pppoe_password: SecretString,
    /// Service VLAN; blank uses the profile default.
    pub vlan: String,
}

impl Provisioning {
    /// Create a request without PPPoE and with the default VLAN.
    pub fn new(position: OntPosition) -> Self {
        Self {
            position,
            desc1: String::new(),
            desc2: String::new(),
            serial: String::new(),
            pppoe_user: String::new(),
            pppoe_password: SecretString::from(String::new()),
            vlan: String::new(),
        }
    }

    /// Set the client name.
    pub fn desc1(mut self, value: impl Into<String>) -> Self {
        self.desc1 = value.into();
        self
    }

    /// Set the box and port.
    pub fn desc2(mut self, value: impl Into<String>) -> Self {
        self.desc2 = value.into();
        self
    }

    /// Set the ONT serial.
    pub fn serial(mut self, value: impl Into<String>) -> Self {
        self.serial = value.into();
        self
    }

    /// Set PPPoE credentials.
    pub fn pppoe(mut self, user: impl Into<String>, password: SecretString) -> Self {
        self.pppoe_user = user.into();
        self.pppoe_password = password;
        self
    }

    /// Set the service VLAN.
    pub fn vlan(mut self, value: impl Into<String>) -> Self {
        self.vlan = value.into();
        self
    }
}

impl OntCommand for Provisioning {
    fn name(&self) -> &'static str {
        "provision"
    }

    fn render(&self, profile: &NetworkProfile) -> Result<String, CommandError> {
        let desc1 = normalize_desc1(require("Client name", &self.desc1)?);
        let desc2 = normalize_desc2(require("Box and port", &self.desc2)?);
        let serial = Serial::parse(&self.serial)?;
        let vlan: u16 = if self.vlan.trim().is_empty() {
            profile.default_vlan
        } else {
            require_numeric("VLAN", &self.vlan)?
        };
        let pppoe = optional_pppoe(&self.pppoe_user, &self.pppoe_password)?;

        let pos = &self.position;
        let aid = pos.tl1_aid();
        let uni = l2_uni(pos);

        let mut script = Script::new();
        script
            .push(format!(
                "ENT-ONT::ONT-{aid}::::DESC1={},DESC2={},SERNUM={},SWVERPLND=AUTO,OPTICSHIST=ENABLE,PLNDCFGFILE1=AUTO,DLCFGFILE1=AUTO,VOIPALLOWED=VEIP;",
                Value::Text(&desc1),
                Value::Text(&desc2),
                serial.tl1()
            ))
            .push(format!("ED-ONT::ONT-{aid}:::::IS;"))
            .push(format!("ENT-ONTCARD::ONTCARD-{aid}-14:::VEIP,1,0::IS;"))
            .push(format!("ENT-LOGPORT::{uni}:::;"))
            .push(format!("ED-ONTVEIP::ONTVEIP-{aid}-14-1:::::IS;"))
            .push(upstream_queue(pos, DATA_QUEUE, &profile.upstream_profile))
            .push(format!("SET-VLANPORT::{uni}:::MAXNUCMACADR=4,CMITMAXNUMMACADDR=1;"))
            .push(vlan_egress(pos, vlan))
            .push(vlan_egress(pos, profile.management_vlan));
        push_wan(&mut script, pos, vlan, pppoe.as_ref());
        push_web_password(&mut script, pos, &serial);

        debug!("provisioning {} on {} (vlan {})", serial, pos, vlan);
        Ok(script.to_string())
    }
}
