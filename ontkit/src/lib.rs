//! # ontkit
//!
//! Field tooling for Nokia GPON ONTs: splitter-box audits and TL1/CLI
//! command generation.
//!
//! ## Features
//!
//! - Box audit: diff two ONT listings, one port at a time, with a ledger,
//!   undo and renumbering
//! - Lenient row parsing (quoted and bare client names)
//! - Offline (down) client tracking across comparisons
//! - TL1 provisioning, Wi-Fi, phone line, VLAN/PPPoE and web password scripts
//! - CLI bridge scripts with verification commands
//! - Serde-friendly network profile with per-city VLANs
//!
//! ## Quick Start
//!
//! ```rust
//! use ontkit::audit::{AuditSession, Comparison, RecordingNotifier};
//! use ontkit::command::{OntPosition, Provisioning};
//! use ontkit::console::{Console, MemoryClipboard};
//!
//! fn main() -> Result<(), ontkit::Error> {
//!     let mut audit = AuditSession::new(RecordingNotifier::new());
//!     let ana = r#"1/1/1/1 1/1/1/1/1 ALCL:AAA up up -20 5 "ANA" cto-3"#;
//!     let bia = r#"1/1/1/1 1/1/1/1/2 ALCL:BBB up up -21 4 "BIA" cto-3"#;
//!     audit.set_before_table(format!("{ana}\n{bia}"))?;
//!     audit.set_after_table(format!("\n{bia}"));
//!     assert_eq!(audit.compare_tables()?, Comparison::Difference(1));
//!
//!     let mut console = Console::new(MemoryClipboard::new(), RecordingNotifier::new());
//!     let request = Provisioning::new(OntPosition::parse("1", "2", "3")?)
//!         .desc1("Ana Souza")
//!         .desc2("cto-3 p1")
//!         .serial("ALCL:B3DA95BD");
//!     let script = console.issue(&request)?;
//!     assert!(script.starts_with("ENT-ONT::ONT-1-1-1-2-3::::"));
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod command;
pub mod console;
pub mod error;

// Re-export main types for convenience
pub use audit::{AuditSession, AuditSessionBuilder, Comparison, Notifier, PortLedger};
pub use command::{NetworkProfile, OntPosition};
pub use console::{Clipboard, Console, MemoryClipboard, OntCommand};
pub use error::{AuditError, ClipboardError, CommandError, Error, Result};
