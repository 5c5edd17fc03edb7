//! Session state: the single owned object every operation works on.
//!
//! Each state-changing operation is all-or-nothing and appends exactly one
//! audit entry on success. Bar ingestion additionally records whether swap
//! was accrued for the date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::audit::AuditLog;
use super::bar::{Bar, BarSeries, UpsertOutcome};
use super::decision::{self, Decision};
use super::error::{AddRejection, CarryError};
use super::layer::Layers;
use super::ledger::{AbAdd, LotChange};
use super::metrics::{MetricsSnapshot, latest_metrics};
use super::params::{Params, RawParams};
use super::pools::{Accrual, Pools};
use super::report::{self, Kpi, LayerRow};
use super::sizing::max_lots_ab;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub params: Params,
    pub layers: Layers,
    pub pools: Pools,
    #[serde(default)]
    pub bars: BarSeries,
    #[serde(default)]
    pub logs: AuditLog,
}

/// Ledger operations a user can request for the latest bar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerCommand {
    AllClose,
    Half,
    AddAb,
    AcknowledgeC,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedgerOutcome {
    Closed(LotChange),
    Halved(LotChange),
    Added(AbAdd),
    Acknowledged(NaiveDate),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub replaced: usize,
    pub rejected: usize,
}

impl ImportSummary {
    pub fn processed(&self) -> usize {
        self.inserted + self.replaced
    }
}

fn date_label(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "N/A".to_string())
}

impl State {
    pub fn last_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        latest_metrics(self.bars.as_slice())
    }

    pub fn decide(&self) -> Decision {
        decision::evaluate(&self.params, &self.layers, &self.pools, &self.snapshot())
    }

    pub fn layer_rows(&self, decision: &Decision) -> Vec<LayerRow> {
        report::layer_rows(&self.layers, self.last_bar(), decision)
    }

    pub fn kpi(&self, decision: &Decision) -> Kpi {
        report::kpi(&self.params, &self.layers, self.last_bar(), decision)
    }

    pub fn log_tail(&self, n: usize) -> &[String] {
        self.logs.tail(n)
    }

    // ---- bars and accrual ----

    /// Validates and inserts or replaces the bar for its date. Does not accrue.
    pub fn upsert_bar(&mut self, bar: Bar) -> Result<UpsertOutcome, CarryError> {
        bar.validate()?;
        let date = bar.date;
        let fields = format!(
            "O={} H={} L={} C={} SW={}",
            bar.open, bar.high, bar.low, bar.close, bar.swap_per_10k
        );
        let outcome = self.bars.upsert(bar);
        let verb = match outcome {
            UpsertOutcome::Inserted => "ADD",
            UpsertOutcome::Replaced => "UPDATE",
        };
        log::debug!("bar {verb} for {date}, series now {} bars", self.bars.len());
        self.logs.push(format!("[{date}] BAR {verb}: {fields}"));
        Ok(outcome)
    }

    /// Accrues swap for `date` using the lots held right now, i.e. before any
    /// ledger operation for that date. Only a new date accrues; an overwrite
    /// is logged as skipped so pools are never double counted.
    pub fn accrue_swap(&mut self, date: NaiveDate, is_new_date: bool) -> Option<Accrual> {
        if !is_new_date {
            self.logs.push(format!(
                "[{date}] SWAP_ACCRUE skipped (date overwrite); adjust pools via export/import if needed"
            ));
            return None;
        }
        let Some(swap_per_10k) = self.bars.get(date).map(|b| b.swap_per_10k) else {
            log::warn!("no bar for {date}, swap accrual skipped");
            return None;
        };

        let accrual = self.pools.accrue(self.layers.total_lots(), swap_per_10k);
        log::info!(
            "accrued {:.0} JPY swap for {date} on {} lots",
            accrual.daily,
            accrual.total_lots
        );
        self.logs.push(format!(
            "[{date}] SWAP_ACCRUE: total={:.0} / defense+={:.0} / attack+={:.0} (lots={}, swap/10k={})",
            accrual.daily, accrual.defense, accrual.attack, accrual.total_lots, accrual.swap_per_10k
        ));
        Some(accrual)
    }

    /// Upserts a bar and accrues swap only if its date was new.
    pub fn ingest_bar(&mut self, bar: Bar) -> Result<UpsertOutcome, CarryError> {
        let date = bar.date;
        let outcome = self.upsert_bar(bar)?;
        self.accrue_swap(date, outcome.is_new_date());
        Ok(outcome)
    }

    /// Bulk ingestion. Invalid bars are skipped; overwrites never accrue.
    pub fn import_bars(&mut self, bars: impl IntoIterator<Item = Bar>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for bar in bars {
            if let Err(e) = bar.validate() {
                log::warn!("skipping imported bar: {e}");
                summary.rejected += 1;
                continue;
            }
            let date = bar.date;
            let outcome = self.bars.upsert(bar);
            match outcome {
                UpsertOutcome::Inserted => {
                    summary.inserted += 1;
                    self.logs.push(format!("[{date}] BAR ADD (bulk)"));
                    self.accrue_swap(date, true);
                }
                UpsertOutcome::Replaced => {
                    summary.replaced += 1;
                    self.logs.push(format!("[{date}] BAR UPDATE (bulk)"));
                }
            }
        }
        self.logs.push(format!(
            "[UI] bar import: {} lines processed",
            summary.processed()
        ));
        summary
    }

    // ---- parameters ----

    pub fn save_params(&mut self, raw: &RawParams) -> Result<(), CarryError> {
        self.params = raw.validate()?;
        self.logs.push("[UI] params saved");
        Ok(())
    }

    // ---- ledger ----

    pub fn apply_all_close(&mut self, date: Option<NaiveDate>) -> LotChange {
        let change = self.layers.close_all();
        self.logs.push(format!(
            "[{}] ALL_CLOSE: {} -> 0",
            date_label(date),
            change.before
        ));
        change
    }

    pub fn apply_half(&mut self, date: Option<NaiveDate>) -> LotChange {
        let change = self.layers.halve();
        let (b, a) = (change.before, change.after);
        self.logs.push(format!(
            "[{}] HALF: A {}->{}, B {}->{}, C {}->{}",
            date_label(date),
            b.a,
            a.a,
            b.b,
            a.b,
            b.c,
            a.c
        ));
        change
    }

    /// Sizes against the latest close; rejects without mutating when metrics
    /// are invalid or A+B capacity is exhausted.
    pub fn apply_add_ab(&mut self, date: NaiveDate) -> Result<AbAdd, AddRejection> {
        let snapshot = self.snapshot();
        let Some(m) = snapshot.metrics() else {
            return Err(AddRejection::DataInsufficient {
                reason: snapshot.message(),
            });
        };
        let max_lots = max_lots_ab(&self.params, m.close);
        let add = self.layers.add_ab(max_lots, date)?;
        self.logs.push(format!(
            "[{date}] ADD_AB: +A={}, +B={} (maxLots={}, before={})",
            add.add_a, add.add_b, add.max_lots, add.before
        ));
        Ok(add)
    }

    pub fn acknowledge_c_signal(&mut self, date: NaiveDate) {
        self.layers.acknowledge_c(date);
        self.logs.push(format!(
            "[{date}] SIGNAL_C acknowledged (manual trade execution outside app)"
        ));
    }

    /// Runs a ledger command dated at the latest bar. Adds are only allowed
    /// when today's decision flags them; close-all and halve are manual
    /// overrides and always allowed.
    pub fn execute(&mut self, command: LedgerCommand) -> Result<LedgerOutcome, CarryError> {
        let date = self.last_date();
        match command {
            LedgerCommand::AllClose => Ok(LedgerOutcome::Closed(self.apply_all_close(date))),
            LedgerCommand::Half => Ok(LedgerOutcome::Halved(self.apply_half(date))),
            LedgerCommand::AddAb => {
                let decision = self.decide();
                let date = match (decision.flags.add_ab, date) {
                    (true, Some(d)) => d,
                    _ => {
                        return Err(CarryError::NotSignalled {
                            action: "A/B add".to_string(),
                        });
                    }
                };
                Ok(LedgerOutcome::Added(self.apply_add_ab(date)?))
            }
            LedgerCommand::AcknowledgeC => {
                let decision = self.decide();
                let date = match (decision.flags.signal_c, date) {
                    (true, Some(d)) => d,
                    _ => {
                        return Err(CarryError::NotSignalled {
                            action: "C add".to_string(),
                        });
                    }
                };
                self.acknowledge_c_signal(date);
                Ok(LedgerOutcome::Acknowledged(date))
            }
        }
    }

    /// Explicit full reset to defaults.
    pub fn reset(&mut self) {
        *self = State::default();
        self.logs.push("[UI] state reset");
    }

    /// Restores invariants that a hand-edited or imported blob may violate.
    pub fn normalize(&mut self) {
        self.bars.normalize();
        self.layers.normalize();
        self.logs.enforce_capacity();
    }
}
