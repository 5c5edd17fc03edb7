//! CLI definition and dispatch.
//!
//! Every invocation loads the session state, performs one action and saves
//! the state again if the action changed it.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::bar_text_adapter::BarTextAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_state_adapter::{JsonStateAdapter, export_state, import_state};
use crate::domain::bar::{Bar, parse_bar_date};
use crate::domain::config_validation::{params_from_config, parse_number};
use crate::domain::decision::Decision;
use crate::domain::error::CarryError;
use crate::domain::ledger::LotChange;
use crate::domain::params::{PARAM_KEYS, RawParams};
use crate::domain::money::{fmt_jpy, fmt_opt_jpy};
use crate::domain::session::{LedgerCommand, LedgerOutcome, State};
use crate::ports::bar_source::BarSource;
use crate::ports::state_port::StatePort;

pub const DEFAULT_STATE_PATH: &str = "carrytrader_state.json";

#[derive(Parser, Debug)]
#[command(
    name = "carrytrader",
    about = "Daily decision support for a three-layer carry position"
)]
pub struct Cli {
    /// JSON file holding the session state
    #[arg(long, global = true, default_value = DEFAULT_STATE_PATH)]
    pub state: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a daily bar, or overwrite the bar already stored for that date
    AddBar {
        /// YYYY-MM-DD, YYYY/MM/DD or YYYYMMDD
        date: String,
        open: String,
        high: String,
        low: String,
        close: String,
        /// Swap per 10k-unit lot (negative for a cost)
        #[arg(allow_hyphen_values = true)]
        swap: String,
    },
    /// Import bars from a tab, comma or whitespace separated file
    ImportBars { file: PathBuf },
    /// Show today's decision
    Decide,
    /// Show layers, pools and projected swap income
    Status,
    /// Close every layer
    AllClose,
    /// Halve every layer
    Half,
    /// Apply the signalled A/B add
    AddAb,
    /// Acknowledge the C add signal
    AckC,
    /// Show parameters, or update them from an INI file and/or key=value pairs
    Params {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Show the most recent audit log entries
    Log {
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,
    },
    /// Write the session state to a JSON file
    Export { path: PathBuf },
    /// Replace the session state with a previously exported JSON file
    Import { path: PathBuf },
    /// Reset bars, layers, pools, params and log to defaults
    Reset {
        #[arg(long, required = true)]
        yes: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let store = JsonStateAdapter::new(cli.state);
    let mut state = match store.load() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let dirty = match dispatch(cli.command, &mut state) {
        Ok(dirty) => dirty,
        Err(e) => return fail(&e),
    };

    if dirty {
        if let Err(e) = store.save(&state) {
            return fail(&e);
        }
    }
    ExitCode::SUCCESS
}

fn fail(err: &CarryError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

/// Runs one command against the in-memory state. Returns whether the state
/// changed and must be saved.
pub fn dispatch(command: Command, state: &mut State) -> Result<bool, CarryError> {
    match command {
        Command::AddBar {
            date,
            open,
            high,
            low,
            close,
            swap,
        } => {
            let bar = bar_from_args(&date, [&open, &high, &low, &close, &swap])?;
            run_add_bar(state, bar)?;
            Ok(true)
        }
        Command::ImportBars { file } => {
            run_import_bars(state, file)?;
            Ok(true)
        }
        Command::Decide => {
            print_decision(&state.decide());
            Ok(false)
        }
        Command::Status => {
            print_status(state);
            Ok(false)
        }
        Command::AllClose => run_ledger(state, LedgerCommand::AllClose),
        Command::Half => run_ledger(state, LedgerCommand::Half),
        Command::AddAb => run_ledger(state, LedgerCommand::AddAb),
        Command::AckC => run_ledger(state, LedgerCommand::AcknowledgeC),
        Command::Params { config, set } => run_params(state, config.as_deref(), &set),
        Command::Log { lines } => {
            for entry in state.log_tail(lines) {
                println!("{entry}");
            }
            Ok(false)
        }
        Command::Export { path } => {
            export_state(&path, state)?;
            eprintln!("State exported to {}", path.display());
            Ok(false)
        }
        Command::Import { path } => {
            *state = import_state(&path)?;
            state.logs.push(format!("[UI] state imported from {}", path.display()));
            eprintln!(
                "Imported {} bars, lots {}",
                state.bars.len(),
                state.layers.counts()
            );
            Ok(true)
        }
        Command::Reset { yes } => {
            if yes {
                state.reset();
                eprintln!("State reset to defaults");
            }
            Ok(yes)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CarryError> {
    FileConfigAdapter::from_file(path).map_err(|e| CarryError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Builds a bar from raw command line fields, naming the first bad field.
/// Fields are `[open, high, low, close, swap]`.
pub fn bar_from_args(date: &str, fields: [&str; 5]) -> Result<Bar, CarryError> {
    let date = parse_bar_date(date)?;
    let names = ["open", "high", "low", "close", "swap_per_10k"];
    let mut values = [0.0; 5];
    for ((slot, text), name) in values.iter_mut().zip(fields).zip(names) {
        *slot = parse_number(text).ok_or_else(|| CarryError::InvalidBar {
            date,
            field: name.to_string(),
            reason: format!("{text:?} is not a number"),
        })?;
    }
    let [open, high, low, close, swap_per_10k] = values;
    Ok(Bar {
        date,
        open,
        high,
        low,
        close,
        swap_per_10k,
    })
}

/// Parses a `key=value` parameter override.
pub fn parse_set(assignment: &str) -> Result<(String, f64), CarryError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| CarryError::InvalidParam {
            key: assignment.to_string(),
            reason: "expected key=value".to_string(),
        })?;
    let key = key.trim();
    if !PARAM_KEYS.contains(&key) {
        return Err(CarryError::InvalidParam {
            key: key.to_string(),
            reason: "unknown parameter".to_string(),
        });
    }
    let value = parse_number(value).ok_or_else(|| CarryError::InvalidParam {
        key: key.to_string(),
        reason: format!("{:?} is not a number", value.trim()),
    })?;
    Ok((key.to_string(), value))
}

fn run_add_bar(state: &mut State, bar: Bar) -> Result<(), CarryError> {
    let date = bar.date;
    let outcome = state.ingest_bar(bar)?;
    if outcome.is_new_date() {
        eprintln!(
            "Added bar {date}; attack pool now {}",
            fmt_jpy(state.pools.attack_jpy)
        );
    } else {
        eprintln!("Updated bar {date}; swap not accrued again");
    }
    let decision = state.decide();
    println!("{} {}", decision.action, decision.title);
    Ok(())
}

fn run_import_bars(state: &mut State, file: PathBuf) -> Result<(), CarryError> {
    eprintln!("Importing bars from {}", file.display());
    let batch = BarTextAdapter::from_file(file).read_bars()?;
    let summary = state.import_bars(batch.bars);
    eprintln!(
        "{} new, {} updated, {} invalid, {} unparseable lines",
        summary.inserted, summary.replaced, summary.rejected, batch.skipped
    );
    let decision = state.decide();
    println!("{} {}", decision.action, decision.title);
    Ok(())
}

fn run_ledger(state: &mut State, command: LedgerCommand) -> Result<bool, CarryError> {
    match state.execute(command)? {
        LedgerOutcome::Closed(change) => print_change("All closed", &change),
        LedgerOutcome::Halved(change) => print_change("Halved", &change),
        LedgerOutcome::Added(add) => println!(
            "Added A +{}, B +{} (A+B {} -> {}, max {})",
            add.add_a,
            add.add_b,
            add.before,
            add.after(),
            add.max_lots
        ),
        LedgerOutcome::Acknowledged(date) => {
            println!("C add signal acknowledged for {date}; execute the trade manually")
        }
    }
    Ok(true)
}

fn print_change(verb: &str, change: &LotChange) {
    println!("{verb}: {} -> {}", change.before, change.after);
}

fn run_params(
    state: &mut State,
    config: Option<&Path>,
    set: &[String],
) -> Result<bool, CarryError> {
    let mut raw = match config {
        Some(path) => {
            eprintln!("Loading params from {}", path.display());
            let adapter = load_config(path)?;
            params_from_config(&adapter, &state.params)?
        }
        None => RawParams::from(&state.params),
    };
    for assignment in set {
        let (key, value) = parse_set(assignment)?;
        raw.set(&key, value);
    }

    let dirty = config.is_some() || !set.is_empty();
    if dirty {
        state.save_params(&raw)?;
    }

    let current = RawParams::from(&state.params);
    for key in PARAM_KEYS {
        if let Some(value) = current.get(key) {
            println!("{key:<18} {value}");
        }
    }
    Ok(dirty)
}

fn print_decision(decision: &Decision) {
    println!("{} [{}] {}", decision.action, decision.badge, decision.title);
    println!("  {}", decision.reason);
    let flags = &decision.flags;
    println!(
        "  flags: all_close={} half={} add_ab={} signal_c={}",
        flags.all_close, flags.half, flags.add_ab, flags.signal_c
    );
    if let Some(c) = &decision.computed {
        let m = &c.metrics;
        println!(
            "  {}: close={:.3} atr14={:.4} chg20={:+.2}% push={:.2}% high20={:.3} swap/10k={}",
            m.date,
            m.close,
            m.atr14,
            m.chg20 * 100.0,
            m.push_rate * 100.0,
            m.high20,
            m.swap_per_10k
        );
        println!(
            "  A+B {}/{} lots (cooldown A={} B={}), C max {}",
            c.lots_ab, c.max_lots_ab, c.gap_ok_a, c.gap_ok_b, c.max_lots_c
        );
    }
}

fn print_status(state: &State) {
    let decision = state.decide();
    match state.last_bar() {
        Some(bar) => println!("Latest bar {} close {}", bar.date, bar.close),
        None => println!("No bars yet"),
    }
    println!("Decision: {} {}", decision.action, decision.title);

    for row in state.layer_rows(&decision) {
        println!(
            "  {:<16} {:>4} lots  {:>14}/day  {}",
            row.label,
            row.lots,
            fmt_opt_jpy(row.daily_swap_jpy),
            row.status
        );
    }

    let pools = &state.pools;
    println!(
        "Pools: total {}  defense {}  attack {}",
        fmt_jpy(pools.swap_total_jpy),
        fmt_jpy(pools.defense_jpy),
        fmt_jpy(pools.attack_jpy)
    );

    let kpi = state.kpi(&decision);
    let goal = kpi
        .goal_pct
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "Swap: {}/day  {}/month  goal {}  [{}]",
        fmt_opt_jpy(kpi.daily_swap_jpy),
        fmt_opt_jpy(kpi.monthly_swap_jpy),
        goal,
        kpi.status
    );
}
