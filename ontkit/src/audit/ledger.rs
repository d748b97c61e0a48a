//! Port ledger: the per-audit record of which box ports were judged.
//!
//! Ports are numbered `1..=port_count`. A comparison puts exactly one port
//! into `pending`; the technician then marks it confirmed (a client was
//! removed from it) or vacant. The ledger advances `current_port` once
//! nothing is pending.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parser::{ClientIdentity, parse_line};
use crate::error::AuditError;

/// Default number of ports in a splitter box.
pub const DEFAULT_PORT_COUNT: u32 = 16;

/// A detected change bound to a port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    pub before: String,
    pub after: String,

    /// 1-based port this difference was assigned to.
    pub port: u32,

    /// No client changed: the port is empty.
    pub is_port_vacant: bool,

    /// Text shown in the ledger's client column.
    pub display_text: String,
}

impl Difference {
    /// A "port vacant" entry for a comparison without changes.
    pub fn vacant(port: u32) -> Self {
        Self {
            before: String::new(),
            after: String::new(),
            port,
            is_port_vacant: true,
            display_text: "PORT VACANT".to_string(),
        }
    }

    /// The stored row describing the client (`before`, else `after`).
    pub fn client_line(&self) -> &str {
        if self.before.is_empty() {
            &self.after
        } else {
            &self.before
        }
    }
}

/// How a pending port was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Confirmed,
    Vacant,
}

impl Disposition {
    fn opposite(self) -> Self {
        match self {
            Disposition::Confirmed => Disposition::Vacant,
            Disposition::Vacant => Disposition::Confirmed,
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Confirmed => write!(f, "confirmed"),
            Disposition::Vacant => write!(f, "vacant"),
        }
    }
}

/// One step of the undo stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub port: u32,
    pub kind: Disposition,
    pub timestamp: DateTime<Utc>,
}

/// Status of a port in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStatus {
    Pending,
    Confirmed,
    Vacant,
}

/// Outcome of [`PortLedger::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkOutcome {
    /// The port that was marked.
    pub port: u32,

    /// The port the ledger moved to, if nothing is pending anymore.
    pub advanced_to: Option<u32>,

    /// Ports still pending.
    pub remaining: usize,
}

/// Outcome of [`PortLedger::undo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOutcome {
    /// The entry that was rolled back.
    pub entry: HistoryEntry,

    /// `current_port` before the undo.
    pub previous_port: u32,
}

/// Sequential port state for one box audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortLedger {
    differences: IndexMap<u32, Difference>,
    confirmed: BTreeSet<u32>,
    vacant: BTreeSet<u32>,
    pending: Vec<u32>,
    history: Vec<HistoryEntry>,
    current_port: u32,
    seen_down: HashSet<ClientIdentity>,
    port_count: u32,
}

impl Default for PortLedger {
    fn default() -> Self {
        Self::new(DEFAULT_PORT_COUNT)
    }
}

impl PortLedger {
    /// Create an empty ledger for a box with `port_count` ports.
    pub fn new(port_count: u32) -> Self {
        Self {
            differences: IndexMap::new(),
            confirmed: BTreeSet::new(),
            vacant: BTreeSet::new(),
            pending: Vec::new(),
            history: Vec::new(),
            current_port: 1,
            seen_down: HashSet::new(),
            port_count,
        }
    }

    /// Clear all state and return to port 1.
    pub fn reset(&mut self) {
        *self = Self::new(self.port_count);
    }

    /// The next port to compare (1-based).
    pub fn current_port(&self) -> u32 {
        self.current_port
    }

    /// Number of ports in the box.
    pub fn port_count(&self) -> u32 {
        self.port_count
    }

    /// Check if every port has been judged.
    pub fn is_complete(&self) -> bool {
        self.current_port > self.port_count
    }

    /// Check if a port awaits a disposition.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Ports awaiting a disposition.
    pub fn pending(&self) -> &[u32] {
        &self.pending
    }

    /// The undo stack, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Confirmed ports.
    pub fn confirmed(&self) -> &BTreeSet<u32> {
        &self.confirmed
    }

    /// Vacant ports.
    pub fn vacant(&self) -> &BTreeSet<u32> {
        &self.vacant
    }

    /// Stored differences, in insertion order.
    pub fn differences(&self) -> impl Iterator<Item = &Difference> {
        self.differences.values()
    }

    /// Stored differences sorted by port.
    pub fn differences_by_port(&self) -> Vec<&Difference> {
        let mut sorted: Vec<&Difference> = self.differences.values().collect();
        sorted.sort_by_key(|d| d.port);
        sorted
    }

    /// Get the difference stored for a port.
    pub fn difference(&self, port: u32) -> Option<&Difference> {
        self.differences.get(&port)
    }

    /// The first stored difference whose client row has `key` as its
    /// position-or-name key.
    pub fn find_by_key(&self, key: &str) -> Option<&Difference> {
        self.differences
            .values()
            .find(|d| parse_line(d.client_line()).key() == Some(key))
    }

    /// Number of stored differences.
    pub fn len(&self) -> usize {
        self.differences.len()
    }

    /// Check if no difference is stored.
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Down clients already acknowledged in this audit.
    pub fn seen_down(&self) -> &HashSet<ClientIdentity> {
        &self.seen_down
    }

    /// Acknowledge down clients so they are not reported again.
    pub fn acknowledge_down(&mut self, ids: impl IntoIterator<Item = ClientIdentity>) {
        self.seen_down.extend(ids);
    }

    /// Status of a port.
    pub fn status(&self, port: u32) -> PortStatus {
        if self.vacant.contains(&port) {
            PortStatus::Vacant
        } else if self.confirmed.contains(&port) {
            PortStatus::Confirmed
        } else {
            PortStatus::Pending
        }
    }

    /// Store a difference, replacing any entry for the same port.
    pub fn store(&mut self, difference: Difference) {
        // Replacing moves the entry to the end, like a fresh insert.
        self.differences.shift_remove(&difference.port);
        self.differences.insert(difference.port, difference);
    }

    /// Store a difference and mark its port pending.
    ///
    /// A pending port is unjudged, so any earlier disposition is dropped.
    pub fn open(&mut self, difference: Difference) {
        let port = difference.port;
        self.store(difference);
        self.confirmed.remove(&port);
        self.vacant.remove(&port);
        if !self.pending.contains(&port) {
            self.pending.push(port);
        }
    }

    fn set_mut(&mut self, kind: Disposition) -> &mut BTreeSet<u32> {
        match kind {
            Disposition::Confirmed => &mut self.confirmed,
            Disposition::Vacant => &mut self.vacant,
        }
    }

    /// Resolve a pending port.
    ///
    /// The port must be pending and not already carry `kind`. When this
    /// empties `pending`, `current_port` moves past the highest port that was
    /// pending.
    pub fn mark(&mut self, port: u32, kind: Disposition) -> Result<MarkOutcome, AuditError> {
        if !self.pending.contains(&port) {
            return Err(AuditError::IllegalTransition {
                message: format!("port {} is not pending", port),
            });
        }
        if self.set_mut(kind).contains(&port) {
            return Err(AuditError::IllegalTransition {
                message: format!("port {} is already {}", port, kind),
            });
        }

        self.set_mut(kind.opposite()).remove(&port);
        self.set_mut(kind).insert(port);
        self.history.push(HistoryEntry {
            port,
            kind,
            timestamp: Utc::now(),
        });

        let highest = self.pending.iter().copied().max().unwrap_or(port);
        self.pending.retain(|&p| p != port);

        let advanced_to = if self.pending.is_empty() {
            self.current_port = highest + 1;
            Some(self.current_port)
        } else {
            None
        };

        log::debug!("port {} marked {}, current port {}", port, kind, self.current_port);

        Ok(MarkOutcome {
            port,
            advanced_to,
            remaining: self.pending.len(),
        })
    }

    /// A copy of this ledger with `removed` dropped and every later port
    /// shifted down by one.
    ///
    /// Applies to differences, history, confirmed, vacant and pending at
    /// once. `current_port` becomes the highest remaining difference port,
    /// or 1 when none remain.
    pub fn renumber_after_removal(&self, removed: u32) -> PortLedger {
        let shift = |p: u32| if p > removed { p - 1 } else { p };

        let differences: IndexMap<u32, Difference> = self
            .differences
            .values()
            .filter(|d| d.port != removed)
            .map(|d| {
                let port = shift(d.port);
                (port, Difference { port, ..d.clone() })
            })
            .collect();

        let history = self
            .history
            .iter()
            .filter(|h| h.port != removed)
            .map(|h| HistoryEntry {
                port: shift(h.port),
                ..h.clone()
            })
            .collect();

        let renumber_set = |set: &BTreeSet<u32>| {
            set.iter()
                .filter(|&&p| p != removed)
                .map(|&p| shift(p))
                .collect::<BTreeSet<u32>>()
        };

        let pending = self
            .pending
            .iter()
            .filter(|&&p| p != removed)
            .map(|&p| shift(p))
            .collect();

        let current_port = differences.keys().copied().max().unwrap_or(1);

        PortLedger {
            differences,
            confirmed: renumber_set(&self.confirmed),
            vacant: renumber_set(&self.vacant),
            pending,
            history,
            current_port,
            seen_down: self.seen_down.clone(),
            port_count: self.port_count,
        }
    }

    /// Remove the difference at `port` and renumber everything after it.
    ///
    /// Fails without touching the ledger when `port` is outside
    /// `1..=port_count` or holds no difference.
    pub fn remove(&mut self, port: u32) -> Result<(), AuditError> {
        if !(1..=self.port_count).contains(&port) || !self.differences.contains_key(&port) {
            return Err(AuditError::IllegalTransition {
                message: format!("port {} has no registered difference", port),
            });
        }

        *self = self.renumber_after_removal(port);
        log::debug!("port {} removed, current port {}", port, self.current_port);
        Ok(())
    }

    /// Roll back the last disposition.
    pub fn undo(&mut self) -> Result<UndoOutcome, AuditError> {
        let entry = self.history.pop().ok_or(AuditError::NothingToUndo)?;
        let previous_port = self.current_port;

        self.current_port = entry.port;
        self.set_mut(entry.kind).remove(&entry.port);
        self.differences
            .retain(|&port, _| port != entry.port && port != previous_port);
        self.pending.clear();

        log::debug!(
            "undid {} on port {}, back from port {}",
            entry.kind,
            entry.port,
            previous_port
        );

        Ok(UndoOutcome {
            entry,
            previous_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(port: u32) -> Difference {
        Difference {
            before: format!("row {}", port),
            after: String::new(),
            port,
            is_port_vacant: false,
            display_text: format!("row {}", port),
        }
    }

    /// Ledger with ports 1..=n stored and confirmed.
    fn filled(n: u32) -> PortLedger {
        let mut ledger = PortLedger::default();
        for port in 1..=n {
            ledger.open(client(port));
            ledger.mark(port, Disposition::Confirmed).unwrap();
        }
        ledger
    }

    #[test]
    fn test_new_ledger() {
        let ledger = PortLedger::default();
        assert_eq!(ledger.current_port(), 1);
        assert_eq!(ledger.port_count(), 16);
        assert!(ledger.is_empty());
        assert!(!ledger.has_pending());
        assert!(!ledger.is_complete());
    }

    #[test]
    fn test_store_replaces_same_port() {
        let mut ledger = PortLedger::default();
        ledger.store(client(1));
        ledger.store(Difference::vacant(1));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.difference(1).unwrap().is_port_vacant);
    }

    #[test]
    fn test_mark_vacant_advances() {
        let mut ledger = PortLedger::default();
        ledger.open(Difference::vacant(1));
        let outcome = ledger.mark(1, Disposition::Vacant).unwrap();
        assert_eq!(outcome.advanced_to, Some(2));
        assert_eq!(ledger.current_port(), 2);
        assert!(!ledger.has_pending());
        assert_eq!(ledger.status(1), PortStatus::Vacant);
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_mark_requires_pending() {
        let mut ledger = PortLedger::default();
        ledger.store(client(1));
        let err = ledger.mark(1, Disposition::Confirmed).unwrap_err();
        assert!(matches!(err, AuditError::IllegalTransition { .. }));
        assert!(ledger.confirmed().is_empty());
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_mark_keeps_sets_disjoint() {
        let mut ledger = PortLedger::default();
        ledger.open(client(1));
        ledger.vacant.insert(1);
        ledger.mark(1, Disposition::Confirmed).unwrap();
        assert!(ledger.confirmed().contains(&1));
        assert!(!ledger.vacant().contains(&1));
    }

    #[test]
    fn test_mark_advances_past_highest_pending() {
        let mut ledger = PortLedger::default();
        ledger.open(client(3));
        ledger.open(client(5));
        let first = ledger.mark(5, Disposition::Confirmed).unwrap();
        assert_eq!(first.advanced_to, None);
        assert_eq!(first.remaining, 1);
        // Only port 3 was pending when it was marked.
        let second = ledger.mark(3, Disposition::Confirmed).unwrap();
        assert_eq!(second.advanced_to, Some(4));
    }

    #[test]
    fn test_reopen_clears_earlier_disposition() {
        let mut ledger = filled(3);
        ledger.remove(2).unwrap();
        assert_eq!(ledger.current_port(), 2);
        assert_eq!(ledger.status(2), PortStatus::Confirmed);

        ledger.open(client(2));
        assert_eq!(ledger.status(2), PortStatus::Pending);
        let outcome = ledger.mark(2, Disposition::Confirmed).unwrap();
        assert_eq!(outcome.advanced_to, Some(3));
        assert!(ledger.confirmed().contains(&2));
    }

    #[test]
    fn test_complete_after_last_port() {
        let ledger = filled(16);
        assert_eq!(ledger.current_port(), 17);
        assert!(ledger.is_complete());
    }

    #[test]
    fn test_renumber_after_removal() {
        let ledger = filled(3);
        let renumbered = ledger.renumber_after_removal(2);

        let ports: Vec<u32> = renumbered.differences_by_port().iter().map(|d| d.port).collect();
        assert_eq!(ports, vec![1, 2]);
        assert_eq!(renumbered.difference(2).unwrap().before, "row 3");
        assert_eq!(renumbered.current_port(), 2);
        assert_eq!(renumbered.confirmed().iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        let history: Vec<u32> = renumbered.history().iter().map(|h| h.port).collect();
        assert_eq!(history, vec![1, 2]);

        // The original is untouched.
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_remove_last_resets_to_port_one() {
        let mut ledger = filled(1);
        ledger.remove(1).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.current_port(), 1);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_remove_renumbers_pending() {
        let mut ledger = filled(2);
        ledger.open(client(3));
        ledger.remove(1).unwrap();
        assert_eq!(ledger.pending(), &[2]);
        ledger.remove(2).unwrap();
        assert!(!ledger.has_pending());
    }

    #[test]
    fn test_remove_rejects_unknown_port() {
        let mut ledger = filled(1);
        let before = ledger.clone();

        for port in [0, 2, 17] {
            let err = ledger.remove(port).unwrap_err();
            assert!(matches!(err, AuditError::IllegalTransition { .. }));
        }
        assert_eq!(ledger, before);
        assert_eq!(ledger.current_port(), 2);
    }

    #[test]
    fn test_undo() {
        let mut ledger = filled(2);
        ledger.open(client(3));

        let outcome = ledger.undo().unwrap();
        assert_eq!(outcome.entry.port, 2);
        assert_eq!(outcome.previous_port, 3);
        assert_eq!(ledger.current_port(), 2);
        assert_eq!(ledger.status(2), PortStatus::Pending);
        assert!(ledger.difference(2).is_none());
        assert!(ledger.difference(3).is_none());
        assert!(ledger.difference(1).is_some());
        assert!(!ledger.has_pending());
    }

    #[test]
    fn test_find_by_key() {
        let mut ledger = PortLedger::default();
        ledger.store(Difference {
            before: r#"1/1/1/1 1/1/1/1/4 ALCL:A up up -20 5 "ANA" cto"#.to_string(),
            after: String::new(),
            port: 2,
            is_port_vacant: false,
            display_text: String::new(),
        });
        ledger.store(Difference::vacant(3));

        assert_eq!(ledger.find_by_key("1/1/1/1/4").map(|d| d.port), Some(2));
        assert!(ledger.find_by_key("ANA").is_none());
        assert!(ledger.find_by_key("").is_none());
    }

    #[test]
    fn test_undo_empty_history() {
        let mut ledger = PortLedger::default();
        assert_eq!(ledger.undo().unwrap_err(), AuditError::NothingToUndo);
    }

    #[test]
    fn test_reset_keeps_port_count() {
        let mut ledger = PortLedger::new(8);
        ledger.open(client(1));
        ledger.acknowledge_down([ClientIdentity::from_line("x down")]);
        ledger.reset();
        assert_eq!(ledger.port_count(), 8);
        assert!(ledger.is_empty());
        assert!(ledger.seen_down().is_empty());
    }

    #[test]
    fn test_ledger_serializes() {
        let ledger = filled(1);
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["current_port"], 2);
        assert_eq!(json["history"][0]["kind"], "confirmed");
    }
}
