//! Plain-text and JSON views of the ledger.

use std::fmt;

use serde::Serialize;

use super::differ::OfflineClient;
use super::ledger::{PortLedger, PortStatus};

/// An action offered for a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Confirm,
    MarkVacant,
    Remove,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Confirm => write!(f, "confirm"),
            Action::MarkVacant => write!(f, "vacant"),
            Action::Remove => write!(f, "remove"),
        }
    }
}

/// One row of the ledger table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    pub port: u32,
    pub client: String,
    pub status: PortStatus,
    pub is_port_vacant: bool,
    pub actions: Vec<Action>,
}

/// Snapshot of the ledger for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    pub current_port: u32,
    /// Ports marked confirmed or vacant.
    pub judged: usize,
    pub port_count: u32,
    pub message: String,
    pub rows: Vec<LedgerRow>,
}

impl LedgerView {
    /// Build the view of `ledger`, sorted by port.
    pub fn new(ledger: &PortLedger, message: &str) -> Self {
        let rows = ledger
            .differences_by_port()
            .into_iter()
            .map(|d| {
                let status = ledger.status(d.port);
                let mut actions = Vec::with_capacity(2);
                if ledger.pending().contains(&d.port) {
                    actions.push(if d.is_port_vacant {
                        Action::MarkVacant
                    } else {
                        Action::Confirm
                    });
                }
                actions.push(Action::Remove);

                LedgerRow {
                    port: d.port,
                    client: d.display_text.clone(),
                    status,
                    is_port_vacant: d.is_port_vacant,
                    actions,
                }
            })
            .collect();

        Self {
            current_port: ledger.current_port(),
            judged: ledger.confirmed().len() + ledger.vacant().len(),
            port_count: ledger.port_count(),
            message: message.to_string(),
            rows,
        }
    }
}

fn status_label(row: &LedgerRow) -> &'static str {
    match row.status {
        PortStatus::Confirmed => "confirmed",
        PortStatus::Vacant => "vacant",
        PortStatus::Pending => "pending",
    }
}

impl fmt::Display for LedgerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Current port: {} ({}/{})",
            self.current_port, self.judged, self.port_count
        )?;
        if !self.message.is_empty() {
            writeln!(f, "{}", self.message)?;
        }

        if self.rows.is_empty() {
            return writeln!(f, "No difference registered yet.");
        }

        let cells: Vec<(String, String, String)> = self
            .rows
            .iter()
            .map(|row| {
                let actions: Vec<String> = row.actions.iter().map(Action::to_string).collect();
                (
                    row.port.to_string(),
                    format!("{} [{}]", row.client, status_label(row)),
                    actions.join(" "),
                )
            })
            .collect();

        let port_w = cells.iter().map(|c| c.0.len()).max().unwrap_or(0).max("Port".len());
        let client_w = cells
            .iter()
            .map(|c| c.1.chars().count())
            .max()
            .unwrap_or(0)
            .max("Client / Status".len());

        writeln!(f, "{:<port_w$} | {:<client_w$} | Actions", "Port", "Client / Status")?;
        writeln!(f, "{}-+-{}-+-{}", "-".repeat(port_w), "-".repeat(client_w), "-".repeat(7))?;
        for (port, client, actions) in &cells {
            writeln!(f, "{:<port_w$} | {:<client_w$} | {}", port, client, actions)?;
        }
        Ok(())
    }
}

/// Snapshot of the offline-clients table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfflineView {
    pub visible: bool,
    pub clients: Vec<OfflineClient>,
}

impl OfflineView {
    pub fn new(clients: &[OfflineClient], visible: bool) -> Self {
        Self {
            visible,
            clients: clients.to_vec(),
        }
    }
}

impl fmt::Display for OfflineView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clients.is_empty() {
            return writeln!(f, "No offline clients.");
        }

        writeln!(f, "Offline clients ({}):", self.clients.len())?;
        for client in &self.clients {
            writeln!(f, "{:>4}  {}", client.line, client.content)?;
        }
        Ok(())
    }
}
