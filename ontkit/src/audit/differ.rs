//! Positional diff of two port-occupancy snapshots.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::parser::ClientIdentity;

/// How a row pair was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// The compared columns match.
    Same,
    /// The compared columns differ and the change counts.
    Different,
    /// A client that was down came back up; not a difference.
    Reconnected,
    /// A down client that was already acknowledged; not a difference.
    AcknowledgedDown,
}

/// One row pair of the diff view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowResult {
    /// 1-based line number.
    pub line: usize,
    pub before: String,
    pub after: String,
    pub status: RowStatus,
}

impl RowResult {
    /// Check if this row counts as a difference.
    pub fn is_different(&self) -> bool {
        self.status == RowStatus::Different
    }
}

/// A row pair whose compared columns differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDifference {
    /// 1-based line number.
    pub line: usize,
    pub before: String,
    pub after: String,
}

impl RawDifference {
    /// The row that describes the removed client.
    ///
    /// `before` when only `before` is filled, `after` when only `after` is
    /// filled, otherwise `before`.
    pub fn removed_line(&self) -> &str {
        match (self.before.is_empty(), self.after.is_empty()) {
            (true, false) => &self.after,
            _ => &self.before,
        }
    }

    /// Check if the `before` row reports the client as down.
    pub fn was_down(&self) -> bool {
        is_down(&self.before)
    }
}

/// A client reported as down in the `before` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineClient {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
}

impl OfflineClient {
    /// Identity of the offline client.
    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity::from_line(&self.content)
    }
}

/// Result of [`diff_tables`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Every row pair, in table order.
    pub rows: Vec<RowResult>,

    /// Down clients not acknowledged before this pass.
    pub down_clients: Vec<OfflineClient>,

    /// Every unsuppressed difference.
    pub differences: Vec<RawDifference>,
}

/// Check if a row mentions `down` (case-insensitive).
pub fn is_down(row: &str) -> bool {
    row.to_lowercase().contains("down")
}

/// Check if a table has no non-blank line.
pub fn is_blank_table(text: &str) -> bool {
    text.lines().all(|line| line.trim().is_empty())
}

/// Split a table into trimmed rows.
pub fn table_rows(text: &str) -> Vec<&str> {
    text.split('\n').map(str::trim).collect()
}

/// Tokenize a trimmed row; an empty row is a single empty token.
fn tokens(row: &str) -> Vec<&str> {
    if row.is_empty() {
        vec![""]
    } else {
        row.split_whitespace().collect()
    }
}

/// Number of leading tokens to compare: everything before the signal column.
fn window(tokens: &[&str]) -> usize {
    tokens
        .iter()
        .position(|t| t.starts_with('-'))
        .unwrap_or(tokens.len())
}

fn classify(before: &str, after: &str, seen_down: &HashSet<ClientIdentity>) -> RowStatus {
    let cols_before = tokens(before);
    let cols_after = tokens(after);
    let len = window(&cols_before).min(window(&cols_after));

    let mismatch = cols_before[..len]
        .iter()
        .zip(&cols_after[..len])
        .any(|(a, b)| a != b);
    if !mismatch {
        return RowStatus::Same;
    }

    if is_down(before) {
        if !after.is_empty() && !is_down(after) {
            return RowStatus::Reconnected;
        }
        if seen_down.contains(&ClientIdentity::from_line(before)) {
            return RowStatus::AcknowledgedDown;
        }
    }

    RowStatus::Different
}

/// Align two tables line by line and classify each row pair.
///
/// Blank tables are not rejected here; callers check [`is_blank_table`]
/// first.
pub fn diff_tables(before: &str, after: &str, seen_down: &HashSet<ClientIdentity>) -> DiffResult {
    let rows_before = table_rows(before);
    let rows_after = table_rows(after);
    let n = rows_before.len().max(rows_after.len());

    let mut result = DiffResult::default();
    let mut reported: HashSet<ClientIdentity> = HashSet::new();

    for i in 0..n {
        let row_before = rows_before.get(i).copied().unwrap_or("");
        let row_after = rows_after.get(i).copied().unwrap_or("");
        let status = classify(row_before, row_after, seen_down);

        if status == RowStatus::Different {
            result.differences.push(RawDifference {
                line: i + 1,
                before: row_before.to_string(),
                after: row_after.to_string(),
            });
        }

        if is_down(row_before) {
            let id = ClientIdentity::from_line(row_before);
            if !seen_down.contains(&id) && reported.insert(id) {
                result.down_clients.push(OfflineClient {
                    line: i + 1,
                    content: row_before.to_string(),
                });
            }
        }

        result.rows.push(RowResult {
            line: i + 1,
            before: row_before.to_string(),
            after: row_after.to_string(),
            status,
        });
    }

    log::debug!(
        "diffed {} rows: {} differences, {} new down clients",
        n,
        result.differences.len(),
        result.down_clients.len()
    );

    result
}

/// List the down clients of a single table that were not acknowledged yet.
pub fn offline_clients(table: &str, seen_down: &HashSet<ClientIdentity>) -> Vec<OfflineClient> {
    let mut reported: HashSet<ClientIdentity> = HashSet::new();
    table_rows(table)
        .into_iter()
        .enumerate()
        .filter(|(_, row)| is_down(row))
        .filter_map(|(i, row)| {
            let id = ClientIdentity::from_line(row);
            (!seen_down.contains(&id) && reported.insert(id)).then(|| OfflineClient {
                line: i + 1,
                content: row.to_string(),
            })
        })
        .collect()
}
