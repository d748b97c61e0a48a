//! Wi-Fi name and key changes.

use secrecy::{ExposeSecret, SecretString};

use super::position::OntPosition;
use super::profile::NetworkProfile;
use super::tl1::{Band, Param, Script, Value, delete_param, set_param};
use super::validate::{require, validate_wifi_password};
use crate::console::OntCommand;
use crate::error::CommandError;

/// Suffix appended to the SSID of the 5 GHz radio.
pub const SSID_5G_SUFFIX: &str = "_5G";

/// What to change on both radios.
#[derive(Debug)]
pub enum WifiChange {
    Name { ssid: String },
    Password { key: SecretString },
    NameAndPassword { ssid: String, key: SecretString },
}

/// A Wi-Fi change for one ONT.
#[derive(Debug)]
pub struct WifiRequest {
    pub position: OntPosition,
    pub change: WifiChange,
}

impl WifiRequest {
    pub fn new(position: OntPosition, change: WifiChange) -> Self {
        Self { position, change }
    }

    fn render_script(&self) -> Result<Script, CommandError> {
        let (ssid, key) = match &self.change {
            WifiChange::Name { ssid } => (Some(ssid.as_str()), None),
            WifiChange::Password { key } => (None, Some(key.expose_secret())),
            WifiChange::NameAndPassword { ssid, key } => {
                (Some(ssid.as_str()), Some(key.expose_secret()))
            }
        };

        let ssid = ssid.map(|s| require("Network name", s)).transpose()?;
        // Keys are used verbatim, surrounding spaces included.
        let key = key
            .map(|k| require("Network password", k).map(|_| k))
            .transpose()?;
        if let Some(key) = key {
            validate_wifi_password(key)?;
        }

        let ssid_5g = ssid.map(|s| format!("{}{}", s, SSID_5G_SUFFIX));
        let mut entries: Vec<(Param, &str)> = Vec::with_capacity(4);
        if let Some(ssid) = ssid {
            entries.push((Param::Ssid(Band::Ghz24), ssid));
        }
        if let Some(key) = key {
            entries.push((Param::PreSharedKey(Band::Ghz24), key));
        }
        if let Some(ssid_5g) = ssid_5g.as_deref() {
            entries.push((Param::Ssid(Band::Ghz5), ssid_5g));
        }
        if let Some(key) = key {
            entries.push((Param::PreSharedKey(Band::Ghz5), key));
        }

        let mut script = Script::new();
        for (param, _) in &entries {
            script.push(delete_param(&self.position, *param));
        }
        for (param, value) in &entries {
            script.push(set_param(&self.position, *param, Value::Text(value)));
        }
        Ok(script)
    }
}

impl OntCommand for WifiRequest {
    fn name(&self) -> &'static str {
        match self.change {
            WifiChange::Name { .. } => "wifi-name",
            WifiChange::Password { .. } => "wifi-password",
            WifiChange::NameAndPassword { .. } => "wifi-name-and-password",
        }
    }

    fn render(&self, _profile: &NetworkProfile) -> Result<String, CommandError> {
        Ok(self.render_script()?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(change: WifiChange) -> Result<String, CommandError> {
        WifiRequest::new(OntPosition::new(1, 1, 1), change).render(&NetworkProfile::default())
    }

    #[test]
    fn test_name_change() {
        let text = render(WifiChange::Name {
            ssid: "CASA ANA".to_string(),
        })
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "DLT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-1-1-1-4;",
                "DLT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-1-1-1-6;",
                "ENT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-1-1-1-4::::PARAMNAME=InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.SSID,PARAMVALUE=\"CASA ANA\";",
                "ENT-HGUTR069-SPARAM::HGUTR069SPARAM-1-1-1-1-1-6::::PARAMNAME=InternetGatewayDevice.LANDevice.1.WLANConfiguration.5.SSID,PARAMVALUE=\"CASA ANA_5G\";",
            ]
        );
    }

    #[test]
    fn test_password_change_uses_key_slots() {
        let text = render(WifiChange::Password {
            key: SecretString::from("segredo123"),
        })
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("-5;"));
        assert!(lines[1].ends_with("-7;"));
        assert!(lines[3].contains("WLANConfiguration.5.PreSharedKey.1.PreSharedKey,PARAMVALUE=\"segredo123\""));
        // Same key on both radios.
        assert!(!text.contains("_5G"));
    }

    #[test]
    fn test_name_and_password_deletes_first() {
        let text = render(WifiChange::NameAndPassword {
            ssid: "NET".to_string(),
            key: SecretString::from("12345678"),
        })
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[..4].iter().all(|l| l.starts_with("DLT-")));
        assert!(lines[4..].iter().all(|l| l.starts_with("ENT-")));
        let slots: Vec<&str> = lines[..4].iter().map(|l| &l[l.len() - 2..l.len() - 1]).collect();
        assert_eq!(slots, vec!["4", "5", "6", "7"]);
    }

    #[test]
    fn test_short_password_is_rejected() {
        let err = render(WifiChange::Password {
            key: SecretString::from("1234567"),
        })
        .unwrap_err();
        assert_eq!(err, CommandError::WeakPassword { minimum: 8 });
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let err = render(WifiChange::Name {
            ssid: "   ".to_string(),
        })
        .unwrap_err();
        assert_eq!(err, CommandError::MissingField { field: "Network name" });
    }

    #[test]
    fn test_secret_is_not_debug_printed() {
        let request = WifiRequest::new(
            OntPosition::new(1, 1, 1),
            WifiChange::Password {
                key: SecretString::from("supersecret"),
            },
        );
        assert!(!format!("{:?}", request).contains("supersecret"));
    }
}
