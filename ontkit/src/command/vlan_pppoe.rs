//! WAN VLAN and PPPoE credentials change.

use secrecy::SecretString;

use super::position::OntPosition;
use super::profile::NetworkProfile;
use super::provision::{optional_pppoe, push_wan};
use super::tl1::{Param, Script, delete_param};
use super::validate::{require, require_numeric};
use crate::console::OntCommand;
use crate::error::CommandError;

/// Re-enter the WAN VLAN and PPPoE slots of a provisioned ONT.
#[derive(Debug)]
pub struct VlanPppoeChange {
    pub position: OntPosition,
    pub vlan: String,
    pub pppoe_user: String,
    pub pppoe_password: SecretString,
}

impl VlanPppoeChange {
    pub fn new(
        position: OntPosition,
        vlan: impl Into<String>,
        pppoe_user: impl Into<String>,
        pppoe_password: SecretString,
    ) -> Self {
        Self {
            position,
            vlan: vlan.into(),
            pppoe_user: pppoe_user.into(),
            pppoe_password,
        }
    }
}

impl OntCommand for VlanPppoeChange {
    fn name(&self) -> &'static str {
        "vlan-pppoe"
    }

    fn render(&self, _profile: &NetworkProfile) -> Result<String, CommandError> {
        require("PPPoE user", &self.pppoe_user)?;
        let pppoe = optional_pppoe(&self.pppoe_user, &self.pppoe_password)?
            .ok_or(CommandError::MissingField { field: "PPPoE password" })?;
        let vlan: u16 = require_numeric("VLAN", &self.vlan)?;

        let pos = &self.position;
        let mut script = Script::new();
        for param in [Param::WanVlan, Param::PppoeUsername, Param::PppoePassword] {
            script.push(delete_param(pos, param));
        }
        push_wan(&mut script, pos, vlan, Some(&pppoe));

        Ok(script.to_string())
    }
}
