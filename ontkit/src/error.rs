//! Error types for ontkit.

use thiserror::Error;

/// Main error type for ontkit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Box-audit errors
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    /// Command generation errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Invalid configuration in a builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Which of the two audit tables is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingTable {
    /// The snapshot taken before the field visit.
    Before,
    /// The snapshot taken after the field visit.
    After,
    /// Neither table was filled.
    Both,
}

impl std::fmt::Display for MissingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingTable::Before => write!(f, "the \"before\" table is empty"),
            MissingTable::After => write!(f, "the \"after\" table is empty"),
            MissingTable::Both => write!(f, "both tables are empty, fill the \"before\" and \"after\" tables"),
        }
    }
}

/// Box-audit errors. All are recoverable and leave the ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// One or both tables were blank.
    #[error("Input incomplete: {missing}")]
    InputIncomplete { missing: MissingTable },

    /// More than one row changed in a single comparison.
    #[error(
        "{} differences detected on port {port}; only one client may be removed per comparison:\n{}",
        .differences.len(),
        .differences.join("\n")
    )]
    AmbiguousComparison { port: u32, differences: Vec<String> },

    /// The changed client is already stored on another port.
    #[error("Client \"{client}\" was already registered on port {port}")]
    DuplicateRegistration { client: String, port: u32 },

    /// Identical tables whose content already belongs to an earlier port.
    #[error(
        "Tables are identical but their content was already registered on port {port}; check the tables for port {current_port}"
    )]
    DuplicateContent { port: u32, current_port: u32 },

    /// The requested operation is not allowed in the current state.
    #[error("Illegal transition: {message}")]
    IllegalTransition { message: String },

    /// Undo was requested with an empty history.
    #[error("Nothing to undo")]
    NothingToUndo,
}

/// Command generation (form validation) errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A required field was left blank.
    #[error("Field '{field}' is required")]
    MissingField { field: &'static str },

    /// A field that must be numeric was not.
    #[error("Field '{field}' must contain only digits, got '{value}'")]
    NotNumeric { field: &'static str, value: String },

    /// The ONT serial number is malformed.
    #[error("ALCL serial must have exactly 12 characters, got {length}")]
    InvalidSerial { length: usize },

    /// The ONT serial number contains a non-alphanumeric character.
    #[error("ALCL serial must be alphanumeric, found '{found}'")]
    SerialCharacter { found: char },

    /// A field only accepts a fixed set of values.
    #[error("Invalid {field} '{value}', expected one of: {allowed}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    /// The Wi-Fi password is too short.
    #[error("Wi-Fi password must have at least {minimum} characters")]
    WeakPassword { minimum: usize },

    /// The phone port is not one of the FXS ports.
    #[error("Invalid phone port '{value}', must be 1 or 2")]
    InvalidPhonePort { value: String },

    /// Only one of the PPPoE username/password pair was supplied.
    #[error("PPPoE username and password must be given together")]
    IncompletePppoe,

    /// The city has no VLAN entry in the network profile.
    #[error("Unknown city '{city}'")]
    UnknownCity { city: String },
}

/// Clipboard errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The clipboard refused the write.
    #[error("Failed to write to clipboard: {message}")]
    WriteFailed { message: String },
}

/// Result type alias using ontkit's Error.
pub type Result<T> = std::result::Result<T, Error>;
