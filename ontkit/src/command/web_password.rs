//! Reset of the ONT web interface passwords to the serial.

use super::position::OntPosition;
use super::profile::NetworkProfile;
use super::provision::push_web_password;
use super::tl1::{Param, Script, delete_param};
use super::validate::Serial;
use crate::console::OntCommand;
use crate::error::CommandError;

#[derive(Debug, Clone)]
pub struct WebPasswordChange {
    pub position: OntPosition,
    pub serial: String,
}

impl WebPasswordChange {
    pub fn new(position: OntPosition, serial: impl Into<String>) -> Self {
        Self {
            position,
            serial: serial.into(),
        }
    }
}

impl OntCommand for WebPasswordChange {
    fn name(&self) -> &'static str {
        "web-password"
    }

    fn render(&self, _profile: &NetworkProfile) -> Result<String, CommandError> {
        let serial = Serial::parse(&self.serial)?;

        let mut script = Script::new();
        script
            .push(delete_param(&self.position, Param::WebAccountPassword))
            .push(delete_param(&self.position, Param::AccountPassword));
        push_web_password(&mut script, &self.position, &serial);

        Ok(script.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_password_script() {
        let text = WebPasswordChange::new(OntPosition::new(5, 6, 7), "alclfc205f5d")
            .render(&NetworkProfile::default())
            .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "DLT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-5-6-7-8;");
        assert_eq!(lines[1], "DLT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-5-6-7-9;");
        assert_eq!(
            lines[2],
            "ENT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-5-6-7-8::::PARAMNAME=InternetGatewayDevice.X_Authentication.WebAccount.Password,PARAMVALUE=\"ALCLFC205F5D\";"
        );
        assert!(lines[3].ends_with("Account.Password,PARAMVALUE=\"ALCLFC205F5D\";"));
    }

    #[test]
    fn test_serial_length_is_checked() {
        let err = WebPasswordChange::new(OntPosition::new(1, 1, 1), "ALCLFC20")
            .render(&NetworkProfile::default())
            .unwrap_err();
        assert_eq!(err, CommandError::InvalidSerial { length: 8 });
    }
}
