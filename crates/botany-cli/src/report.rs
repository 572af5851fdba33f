//! What the binary prints: the run's outcomes and, with `--audit`, the audit.

use botany_core::audit::{AuditRecord, AuditReport};
use botany_core::outcome::Outcome;
use botany_reconcile::RunReport;
use serde::Serialize;

use crate::output::{Table, Tabulate};

const UNKNOWN: &str = "—";

#[derive(Debug, Serialize)]
pub struct CliReport {
    pub dry_run: bool,
    pub run: RunReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditReport>,
}

impl CliReport {
    /// The process should exit non-zero when the audit found a mismatch.
    #[must_use]
    pub fn has_mismatch(&self) -> bool {
        self.audit.as_ref().is_some_and(AuditReport::has_mismatch)
    }
}

impl Tabulate for CliReport {
    fn tables(&self) -> Vec<Table> {
        let summary = self.run.summary;
        let mut tables = vec![Table {
            title: Some("Reconcile".into()),
            headers: vec!["user", "status", "detail", "trigger"],
            rows: self.run.outcomes.iter().map(outcome_row).collect(),
            footer: Some(format!(
                "processed={} fixed={} errors={} dry_run={}",
                summary.processed, summary.fixed, summary.errors, self.dry_run
            )),
        }];

        if let Some(audit) = &self.audit {
            let mismatches = audit.records.iter().filter(|r| r.mismatch).count();
            tables.push(Table {
                title: Some(format!(
                    "Audit (water interval {}h)",
                    audit.water_interval_hours
                )),
                headers: vec![
                    "user",
                    "source",
                    "page alive",
                    "plant alive",
                    "thirsty",
                    "page watered",
                    "plant watered",
                    "note",
                ],
                rows: audit.records.iter().map(audit_row).collect(),
                footer: Some(format!("mismatches={mismatches}")),
            });
        }

        tables
    }
}

fn outcome_row(outcome: &Outcome) -> Vec<String> {
    vec![
        outcome.user.to_string(),
        outcome.status.as_str().to_string(),
        outcome.detail.clone(),
        outcome
            .trigger
            .as_ref()
            .map_or_else(|| UNKNOWN.to_string(), |failure| failure.kind.to_string()),
    ]
}

fn audit_row(record: &AuditRecord) -> Vec<String> {
    vec![
        record.user.to_string(),
        record.page.source.as_str().to_string(),
        yes_no(record.page.alive),
        yes_no(record.live.alive()),
        yes_no(record.page.thirsty),
        record
            .page_last_watered_ago
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        record
            .plant_last_watered_ago
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        record.note().unwrap_or_default(),
    ]
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => UNKNOWN.to_string(),
    }
}
