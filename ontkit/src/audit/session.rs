//! Audit session controller.
//!
//! Drives one box audit: parse → diff → ledger per comparison, with the
//! "one pending port at a time" gate between comparisons.
//!
//! # State machine
//!
//! ```text
//! ┌──────┐ compare_tables() ┌─────────────────────┐
//! │ Idle ├──────────────────► AwaitingDisposition │
//! │      │  mark_*() / undo │                     │
//! └──────┘◄─────────────────┴─────────────────────┘
//!    │ mark_*() past the last port
//!    ▼
//! ┌──────────┐ compare_tables() → start_new_audit()
//! │ Complete ├──────────────────────────────────────► Idle
//! └──────────┘
//! ```
//!
//! Every failure leaves the ledger untouched, is reported through the
//! session's [`Notifier`] and is also returned as `Err`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::differ::{OfflineClient, RowResult, diff_tables, is_blank_table, offline_clients};
use super::ledger::{DEFAULT_PORT_COUNT, Difference, Disposition, MarkOutcome, PortLedger, UndoOutcome};
use super::notify::{LogNotifier, Notifier};
use super::parser::{ClientIdentity, display_text, parse_line};
use super::render::{LedgerView, OfflineView};
use crate::error::{AuditError, Error, MissingTable, Result};

/// Rows longer than this are truncated in error listings.
const SUMMARY_WIDTH: usize = 60;

/// Where the session stands between user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for the next comparison.
    Idle,
    /// A port must be marked before comparing again.
    AwaitingDisposition,
    /// Every port was judged; the next comparison starts a new audit.
    Complete,
}

/// Successful outcome of [`AuditSession::compare_tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// The previous audit was complete and a new one was started.
    NewAuditStarted,
    /// No client changed; the port was recorded as vacant.
    VacantPort(u32),
    /// One client changed; the port awaits confirmation.
    Difference(u32),
}

/// Audit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Number of ports in the box.
    pub port_count: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            port_count: DEFAULT_PORT_COUNT,
        }
    }
}

/// Builder for [`AuditSession`].
///
/// # Example
///
/// ```rust
/// use ontkit::audit::{AuditSessionBuilder, RecordingNotifier};
///
/// # fn example() -> Result<(), ontkit::Error> {
/// let session = AuditSessionBuilder::new()
///     .port_count(8)
///     .build(RecordingNotifier::new())?;
/// assert_eq!(session.ledger().port_count(), 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuditSessionBuilder {
    config: AuditConfig,
}

impl AuditSessionBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a whole configuration.
    pub fn config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of ports in the box (default: 16).
    pub fn port_count(mut self, port_count: u32) -> Self {
        self.config.port_count = port_count;
        self
    }

    /// Build the session.
    pub fn build<N: Notifier>(self, notifier: N) -> Result<AuditSession<N>> {
        if self.config.port_count == 0 {
            return Err(Error::InvalidConfig {
                message: "port count must be at least 1".to_string(),
            });
        }

        Ok(AuditSession::with_ledger(
            PortLedger::new(self.config.port_count),
            notifier,
        ))
    }
}

/// One box audit, from port 1 to the last port.
#[derive(Debug)]
pub struct AuditSession<N: Notifier = LogNotifier> {
    before: String,
    after: String,
    ledger: PortLedger,
    rows: Vec<RowResult>,
    offline: Vec<OfflineClient>,
    offline_visible: bool,
    before_locked: bool,
    message: String,
    notifier: N,
}

impl Default for AuditSession<LogNotifier> {
    fn default() -> Self {
        Self::new(LogNotifier)
    }
}

impl<N: Notifier> AuditSession<N> {
    /// Create a 16-port session reporting to `notifier`.
    pub fn new(notifier: N) -> Self {
        Self::with_ledger(PortLedger::default(), notifier)
    }

    fn with_ledger(ledger: PortLedger, notifier: N) -> Self {
        Self {
            before: String::new(),
            after: String::new(),
            ledger,
            rows: Vec::new(),
            offline: Vec::new(),
            offline_visible: false,
            before_locked: false,
            message: String::new(),
            notifier,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current state of the session.
    pub fn state(&self) -> SessionState {
        if self.ledger.has_pending() {
            SessionState::AwaitingDisposition
        } else if self.ledger.is_complete() {
            SessionState::Complete
        } else {
            SessionState::Idle
        }
    }

    /// The port ledger.
    pub fn ledger(&self) -> &PortLedger {
        &self.ledger
    }

    /// The latest status message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The "before" table text.
    pub fn before(&self) -> &str {
        &self.before
    }

    /// The "after" table text.
    pub fn after(&self) -> &str {
        &self.after
    }

    /// Row classification of the latest comparison.
    pub fn rows(&self) -> &[RowResult] {
        &self.rows
    }

    /// Offline clients of the latest comparison or analysis.
    pub fn offline_clients(&self) -> &[OfflineClient] {
        &self.offline
    }

    /// Check if the offline-clients view is shown.
    pub fn is_offline_visible(&self) -> bool {
        self.offline_visible
    }

    /// Check if the "before" table is locked against edits.
    pub fn is_before_locked(&self) -> bool {
        self.before_locked
    }

    /// The notification sink.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The notification sink, mutably.
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Render the ledger table.
    pub fn view(&self) -> LedgerView {
        LedgerView::new(&self.ledger, &self.message)
    }

    /// Render the offline-clients table.
    pub fn offline_view(&self) -> OfflineView {
        OfflineView::new(&self.offline, self.offline_visible)
    }

    // =========================================================================
    // Table input
    // =========================================================================

    /// Replace the "before" table. Fails while the table is locked.
    pub fn set_before_table(
        &mut self,
        text: impl Into<String>,
    ) -> std::result::Result<(), AuditError> {
        if self.before_locked {
            return self.fail(AuditError::IllegalTransition {
                message: "the \"before\" table is locked".to_string(),
            });
        }
        self.before = text.into();
        Ok(())
    }

    /// Replace the "after" table.
    pub fn set_after_table(&mut self, text: impl Into<String>) {
        self.after = text.into();
    }

    /// Lock or unlock the "before" table. Returns the new lock state.
    pub fn toggle_lock(&mut self) -> bool {
        self.before_locked = !self.before_locked;
        debug!("before table locked: {}", self.before_locked);
        self.before_locked
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Compare the two tables for the current port.
    pub fn compare_tables(&mut self) -> std::result::Result<Comparison, AuditError> {
        self.try_compare().or_else(|err| self.fail(err))
    }

    fn try_compare(&mut self) -> std::result::Result<Comparison, AuditError> {
        if let Some(&pending) = self.ledger.pending().first() {
            return Err(AuditError::IllegalTransition {
                message: format!(
                    "mark port {} as confirmed or vacant before comparing again",
                    pending
                ),
            });
        }

        if self.ledger.is_complete() {
            self.start_new_audit();
            return Ok(Comparison::NewAuditStarted);
        }

        let port = self.ledger.current_port();
        let missing = match (is_blank_table(&self.before), is_blank_table(&self.after)) {
            (true, true) => Some(MissingTable::Both),
            (true, false) => Some(MissingTable::Before),
            (false, true) => Some(MissingTable::After),
            (false, false) => None,
        };
        if let Some(missing) = missing {
            return Err(AuditError::InputIncomplete { missing });
        }

        let result = diff_tables(&self.before, &self.after, self.ledger.seen_down());

        // The diff view is refreshed even when the comparison is rejected;
        // acknowledged down clients are only committed on success.
        self.rows = result.rows;
        let mut acknowledged: Vec<ClientIdentity> = Vec::new();
        if !self.offline_visible {
            acknowledged.extend(result.down_clients.iter().map(OfflineClient::identity));
            self.offline = result.down_clients;
        }
        acknowledged.extend(
            result
                .differences
                .iter()
                .filter(|d| d.was_down())
                .map(|d| ClientIdentity::from_line(&d.before)),
        );

        let differences = result.differences;
        let comparison = match differences.as_slice() {
            [] => {
                if let Some(earlier) = self.identical_content_port() {
                    return Err(AuditError::DuplicateContent {
                        port: earlier,
                        current_port: port,
                    });
                }

                self.ledger.open(Difference::vacant(port));
                self.message = format!("Port {}: vacant, mark it as vacant to continue", port);
                Comparison::VacantPort(port)
            }
            [diff] => {
                let removed = diff.removed_line();
                if let Some(key) = parse_line(removed).key() {
                    if let Some(existing) = self.ledger.find_by_key(key) {
                        return Err(AuditError::DuplicateRegistration {
                            client: key.to_string(),
                            port: existing.port,
                        });
                    }
                }

                let difference = Difference {
                    before: diff.before.clone(),
                    after: diff.after.clone(),
                    port,
                    is_port_vacant: false,
                    display_text: display_text(removed),
                };
                self.ledger.open(difference);
                self.message = format!(
                    "Port {}: difference detected, mark it as confirmed after checking",
                    port
                );
                Comparison::Difference(port)
            }
            many => {
                return Err(AuditError::AmbiguousComparison {
                    port,
                    differences: many
                        .iter()
                        .enumerate()
                        .map(|(i, d)| summarize(i + 1, d.removed_line()))
                        .collect(),
                });
            }
        };

        self.ledger.acknowledge_down(acknowledged);
        self.notifier.show_info(&self.message);
        debug!("compared port {}: {:?}", port, comparison);
        Ok(comparison)
    }

    /// Port already holding a client of the (identical) tables, if any.
    fn identical_content_port(&self) -> Option<u32> {
        let before = self.before.trim();
        if before != self.after.trim() {
            return None;
        }

        before
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find_map(|line| {
                let identity = parse_line(line);
                let key = identity.key()?;
                self.ledger.find_by_key(key).map(|d| d.port)
            })
    }

    // =========================================================================
    // Dispositions
    // =========================================================================

    /// Mark a pending port as confirmed (its client was removed).
    pub fn mark_confirmed(&mut self, port: u32) -> std::result::Result<MarkOutcome, AuditError> {
        self.mark(port, Disposition::Confirmed)
    }

    /// Mark a pending port as vacant.
    pub fn mark_vacant(&mut self, port: u32) -> std::result::Result<MarkOutcome, AuditError> {
        self.mark(port, Disposition::Vacant)
    }

    fn mark(
        &mut self,
        port: u32,
        kind: Disposition,
    ) -> std::result::Result<MarkOutcome, AuditError> {
        let outcome = match self.ledger.mark(port, kind) {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(err),
        };

        let done = match kind {
            Disposition::Confirmed => format!("Port {} confirmed!", port),
            Disposition::Vacant => format!("Port {} marked as vacant!", port),
        };

        self.message = match outcome.advanced_to {
            Some(next) if next > self.ledger.port_count() => {
                let message = format!(
                    "{} Box audit complete ({} ports). Compare again to start a new audit.",
                    done,
                    self.ledger.port_count()
                );
                self.notifier.show_success(Some(&message));
                message
            }
            Some(next) => format!("{} Ready for port {}", done, next),
            None => format!("{} {} port(s) still pending", done, outcome.remaining),
        };

        Ok(outcome)
    }

    /// Remove the difference at `port`, renumbering every later port.
    pub fn remove_difference(&mut self, port: u32) -> std::result::Result<(), AuditError> {
        let was_awaiting = self.ledger.has_pending();
        if let Err(err) = self.ledger.remove(port) {
            return self.fail(err);
        }

        let remaining = self.ledger.pending().len();
        self.message = if remaining > 0 {
            format!(
                "Port {} removed! Ports renumbered. {} port(s) still pending",
                port, remaining
            )
        } else if was_awaiting {
            format!("Port {} removed! Ports renumbered. Ready for a new comparison", port)
        } else {
            format!("Port {} removed! All ports were renumbered", port)
        };
        Ok(())
    }

    /// Roll back the last confirmed/vacant mark.
    pub fn undo_last_disposition(&mut self) -> std::result::Result<UndoOutcome, AuditError> {
        let outcome = match self.ledger.undo() {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(err),
        };

        self.rows.clear();
        self.offline.clear();
        self.message = format!(
            "Back to port {}. Status removed, port ready for a new comparison.",
            outcome.entry.port
        );
        Ok(outcome)
    }

    /// Discard everything and start again at port 1.
    pub fn start_new_audit(&mut self) {
        self.before.clear();
        self.after.clear();
        self.ledger.reset();
        self.rows.clear();
        self.offline.clear();
        self.message = "New audit started! Ready for port 1.".to_string();
        self.notifier.show_info(&self.message);
        debug!("new audit started");
    }

    // =========================================================================
    // Offline clients
    // =========================================================================

    /// List down clients of the "before" table not acknowledged yet, then
    /// acknowledge them.
    pub fn analyze_offline_clients(&mut self) -> std::result::Result<&[OfflineClient], AuditError> {
        if self.before.trim().is_empty() {
            return self.fail(AuditError::InputIncomplete {
                missing: MissingTable::Before,
            });
        }

        let found = offline_clients(&self.before, self.ledger.seen_down());
        self.ledger
            .acknowledge_down(found.iter().map(OfflineClient::identity));
        self.offline = found;

        self.message = if self.offline.is_empty() {
            "No offline client found in the \"before\" table.".to_string()
        } else {
            format!(
                "{} offline client(s) found in the \"before\" table.",
                self.offline.len()
            )
        };
        self.notifier.show_info(&self.message);

        Ok(&self.offline)
    }

    /// Hide the offline-clients view, or analyze and show it. Returns the
    /// new visibility.
    pub fn toggle_offline_clients(&mut self) -> std::result::Result<bool, AuditError> {
        if self.offline_visible {
            self.offline_visible = false;
            return Ok(false);
        }

        self.analyze_offline_clients()?;
        self.offline_visible = true;
        Ok(true)
    }

    fn fail<T>(&mut self, err: AuditError) -> std::result::Result<T, AuditError> {
        warn!("audit action rejected: {}", err);
        self.message = format!("Error: {}", err);
        self.notifier.show_error(&err.to_string());
        Err(err)
    }
}

/// One line of an ambiguous-comparison listing.
fn summarize(index: usize, line: &str) -> String {
    let identity = parse_line(line);
    match (identity.position.is_empty(), identity.name.is_empty()) {
        (false, false) => format!("{}. {} - \"{}\"", index, identity.position, identity.name),
        (true, false) => format!("{}. \"{}\"", index, identity.name),
        (false, true) => format!("{}. {}", index, identity.position),
        (true, true) => {
            if line.chars().count() > SUMMARY_WIDTH {
                let short: String = line.chars().take(SUMMARY_WIDTH).collect();
                format!("{}. {}...", index, short)
            } else {
                format!("{}. {}", index, line)
            }
        }
    }
}
