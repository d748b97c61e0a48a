//! Command generators for Nokia ONTs.
//!
//! Each request type validates its form fields and renders the TL1 or CLI
//! text a technician pastes into the OLT session. Nothing here talks to the
//! OLT; see [`crate::console::Console`] for delivery.

pub mod bridge;
pub mod phone;
pub mod position;
pub mod profile;
pub mod provision;
pub mod tl1;
pub mod validate;
pub mod vlan_pppoe;
pub mod web_password;
pub mod wifi;

pub use bridge::{BridgeCheck, BridgeKind, BridgePort, BridgeRequest};
pub use phone::PhoneLine;
pub use position::OntPosition;
pub use profile::{CityVlans, NetworkProfile};
pub use provision::Provisioning;
pub use tl1::{Band, Param, Script, Value};
pub use validate::{PhonePort, Serial};
pub use vlan_pppoe::VlanPppoeChange;
pub use web_password::WebPasswordChange;
pub use wifi::{WifiChange, WifiRequest};
