//! Network profile: addresses, VLANs and bandwidth profiles of the ISP.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::bridge::BridgeKind;
use crate::error::CommandError;

/// Network and VoIP VLANs of a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityVlans {
    pub network: u16,
    pub voip: u16,
}

impl CityVlans {
    pub fn new(network: u16, voip: u16) -> Self {
        Self { network, voip }
    }

    /// VLAN carrying the given bridge service.
    pub fn vlan(&self, kind: BridgeKind) -> u16 {
        match kind {
            BridgeKind::Network => self.network,
            BridgeKind::Voip => self.voip,
        }
    }
}

const BUILTIN_CITIES: &[(&str, u16, u16)] = &[
    ("NOVA ANDRADINA - MS", 2800, 300),
    ("MANDAGUAÇU - PR", 2710, 300),
    ("NOVA ESPERANÇA - PR", 2820, 300),
    ("TERRA RICA - PR", 2714, 300),
    ("PAIÇANDU - PR", 2821, 300),
    ("PARANAVAÍ - PR", 2700, 300),
    ("MARINGÁ - PR", 2760, 300),
    ("NOVA ALIANÇA - PR", 3050, 201),
    ("DOURADOS - MS", 2750, 300),
    ("IVINHEMA - MS", 2869, 300),
    ("BAYTAPORÃ - MS", 2825, 300),
];

/// Everything the command generators take from the ISP's network design.
///
/// `Default` carries the production values, so a profile loaded from JSON
/// only needs the fields it overrides.
///
/// # Example
///
/// ```rust
/// use ontkit::command::{CityVlans, NetworkProfile};
///
/// let profile = NetworkProfile::new()
///     .with_sip_server("10.0.0.5")
///     .with_city("LONDRINA - PR", CityVlans::new(2900, 300));
/// assert_eq!(profile.city("LONDRINA - PR").unwrap().network, 2900);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkProfile {
    /// SIP outbound proxy, proxy and registrar address.
    pub sip_server: String,

    /// SIP user-agent domain.
    pub sip_domain: String,

    /// Upstream bandwidth profile for data and voice queues.
    pub upstream_profile: String,

    /// Management VLAN added to every provisioned ONT.
    pub management_vlan: u16,

    /// Service VLAN used when the form leaves it blank.
    pub default_vlan: u16,

    /// VoIP VLAN for phone lines.
    pub voip_vlan: u16,

    /// VLANs per city, in menu order.
    pub cities: IndexMap<String, CityVlans>,
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            sip_server: "10.255.0.1".to_string(),
            sip_domain: "sip.solucaonetwork.com".to_string(),
            upstream_profile: "HSI_1G_UP".to_string(),
            management_vlan: 777,
            default_vlan: 2800,
            voip_vlan: 300,
            cities: BUILTIN_CITIES
                .iter()
                .map(|&(name, network, voip)| (name.to_string(), CityVlans::new(network, voip)))
                .collect(),
        }
    }
}

impl NetworkProfile {
    /// Profile with the built-in production values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SIP server address.
    pub fn with_sip_server(mut self, address: impl Into<String>) -> Self {
        self.sip_server = address.into();
        self
    }

    /// Set the SIP user-agent domain.
    pub fn with_sip_domain(mut self, domain: impl Into<String>) -> Self {
        self.sip_domain = domain.into();
        self
    }

    /// Set the upstream bandwidth profile name.
    pub fn with_upstream_profile(mut self, name: impl Into<String>) -> Self {
        self.upstream_profile = name.into();
        self
    }

    /// Set the management VLAN.
    pub fn with_management_vlan(mut self, vlan: u16) -> Self {
        self.management_vlan = vlan;
        self
    }

    /// Set the default service VLAN.
    pub fn with_default_vlan(mut self, vlan: u16) -> Self {
        self.default_vlan = vlan;
        self
    }

    /// Set the VoIP VLAN for phone lines.
    pub fn with_voip_vlan(mut self, vlan: u16) -> Self {
        self.voip_vlan = vlan;
        self
    }

    /// Add or replace a city.
    pub fn with_city(mut self, name: impl Into<String>, vlans: CityVlans) -> Self {
        self.cities.insert(name.into(), vlans);
        self
    }

    /// Look up a city by name.
    pub fn city(&self, name: &str) -> Result<&CityVlans, CommandError> {
        self.cities.get(name).ok_or_else(|| CommandError::UnknownCity {
            city: name.to_string(),
        })
    }

    /// The first city's VLAN for `kind`, or the default VLAN.
    pub fn first_vlan(&self, kind: BridgeKind) -> u16 {
        self.cities
            .values()
            .next()
            .map(|vlans| vlans.vlan(kind))
            .unwrap_or(self.default_vlan)
    }
}
