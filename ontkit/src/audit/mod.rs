//! Splitter-box audit.
//!
//! A technician snapshots the OLT's ONT listing for a box before and after
//! disconnecting one drop cable, pastes both into an [`AuditSession`], and
//! the session works out which client sat on the current port.
//!
//! # Example
//!
//! ```rust
//! use ontkit::audit::{AuditSession, Comparison, RecordingNotifier};
//!
//! let john = r#"1/1/1/1 1/1/1/1/1 ALCL:AAA up up -20 5 "JOHN DOE" cto-7"#;
//! let mary = r#"1/1/1/1 1/1/1/1/2 ALCL:BBB up up -21 4 "MARY ANN" cto-7"#;
//!
//! let mut session = AuditSession::new(RecordingNotifier::new());
//! session.set_before_table(format!("{john}\n{mary}")).unwrap();
//! session.set_after_table(format!("\n{mary}"));
//!
//! assert_eq!(session.compare_tables().unwrap(), Comparison::Difference(1));
//! session.mark_confirmed(1).unwrap();
//! assert_eq!(session.ledger().current_port(), 2);
//! ```

pub mod differ;
pub mod ledger;
pub mod notify;
pub mod parser;
pub mod render;
pub mod session;

pub use differ::{DiffResult, OfflineClient, RawDifference, RowResult, RowStatus, diff_tables};
pub use ledger::{
    DEFAULT_PORT_COUNT, Difference, Disposition, HistoryEntry, MarkOutcome, PortLedger,
    PortStatus, UndoOutcome,
};
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier};
pub use parser::{ClientIdentity, NameMatcher, ParsedIdentity, display_text, parse_line};
pub use render::{Action, LedgerRow, LedgerView, OfflineView};
pub use session::{AuditConfig, AuditSession, AuditSessionBuilder, Comparison, SessionState};
