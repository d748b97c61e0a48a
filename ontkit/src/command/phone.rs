//! SIP phone line setup on an ONT FXS port.

use secrecy::{ExposeSecret, SecretString};

use super::position::OntPosition;
use super::profile::NetworkProfile;
use super::tl1::{Param, Script, Value, set_param, upstream_queue, vlan_egress};
use super::validate::{PhonePort, require};
use crate::console::OntCommand;
use crate::error::CommandError;

/// Upstream queue reserved for voice.
pub const VOICE_QUEUE: u8 = 5;

/// A phone line request as filled in the form.
#[derive(Debug)]
pub struct PhoneLine {
    pub position: OntPosition,
    /// FXS port, `1` or `2`.
    pub port: String,
    pub sip_user: String,
    pub sip_password: SecretString,
}

impl PhoneLine {
    pub fn new(
        position: OntPosition,
        port: impl Into<String>,
        sip_user: impl Into<String>,
        sip_password: SecretString,
    ) -> Self {
        Self {
            position,
            port: port.into(),
            sip_user: sip_user.into(),
            sip_password,
        }
    }
}

impl OntCommand for PhoneLine {
    fn name(&self) -> &'static str {
        "phone-line"
    }

    fn render(&self, profile: &NetworkProfile) -> Result<String, CommandError> {
        let user = require("SIP user", &self.sip_user)?;
        let password = self.sip_password.expose_secret();
        require("SIP password", password)?;
        let port = PhonePort::parse(&self.port)?;

        let pos = &self.position;
        let server = profile.sip_server.as_str();

        let mut script = Script::new();
        script
            .push(upstream_queue(pos, VOICE_QUEUE, &profile.upstream_profile))
            .push(vlan_egress(pos, profile.voip_vlan))
            .push(set_param(pos, Param::SipOutboundProxy, Value::Bare(server)))
            .push(set_param(pos, Param::SipProxyServer, Value::Bare(server)))
            .push(set_param(pos, Param::SipRegistrarServer, Value::Bare(server)))
            .push(set_param(
                pos,
                Param::SipUserAgentDomain,
                Value::Text(&profile.sip_domain),
            ))
            .push(set_param(pos, Param::LineEnable(port), Value::Bare("Enabled")))
            .push(set_param(pos, Param::DirectoryNumber(port), Value::Text(user)))
            .push(set_param(pos, Param::SipAuthUserName(port), Value::Text(user)))
            .push(set_param(pos, Param::SipAuthPassword(port), Value::Text(password)));

        Ok(script.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(port: &str) -> PhoneLine {
        PhoneLine::new(
            OntPosition::new(2, 4, 9),
            port,
            "4430001234",
            SecretString::from("sip-pass"),
        )
    }

    #[test]
    fn test_phone_line_script() {
        let text = line("2").render(&NetworkProfile::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(
            lines[0],
            "SET-QOS-USQUEUE::ONTL2UNIQ-1-1-2-4-9-14-1-5::::USBWPROFNAME=HSI_1G_UP;"
        );
        assert_eq!(
            lines[1],
            "ENT-VLANEGPORT::ONTL2UNI-1-1-2-4-9-14-1:::0,300:PORTTRANSMODE=SINGLETAGGED;"
        );
        assert_eq!(
            lines[2],
            "ENT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-2-4-9-10::::PARAMNAME=InternetGatewayDevice.Services.VoiceService.1.VoiceProfile.1.SIP.OutboundProxy,PARAMVALUE=10.255.0.1;"
        );
        assert!(lines[5].ends_with("SIP.UserAgentDomain,PARAMVALUE=\"sip.solucaonetwork.com\";"));
        assert!(lines[6].ends_with("Line.2.Enable,PARAMVALUE=Enabled;"));
        assert!(lines[7].contains("-15::::"));
        assert!(lines[8].ends_with("Line.2.SIP.AuthUserName,PARAMVALUE=\"4430001234\";"));
        assert!(lines[9].ends_with("Line.2.SIP.AuthPassword,PARAMVALUE=\"sip-pass\";"));
    }

    #[test]
    fn test_profile_drives_addresses() {
        let profile = NetworkProfile::default()
            .with_sip_server("192.0.2.1")
            .with_voip_vlan(201);
        let text = line("1").render(&profile).unwrap();
        assert!(text.contains(":::0,201:"));
        assert_eq!(text.matches("PARAMVALUE=192.0.2.1;").count(), 3);
    }

    #[test]
    fn test_invalid_port() {
        let err = line("3").render(&NetworkProfile::default()).unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidPhonePort {
                value: "3".to_string()
            }
        );
    }

    #[test]
    fn test_required_fields_before_port() {
        let mut request = line("9");
        request.sip_user.clear();
        let err = request.render(&NetworkProfile::default()).unwrap_err();
        assert_eq!(err, CommandError::MissingField { field: "SIP user" });
    }
}
