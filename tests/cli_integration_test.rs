//! CLI integration tests for command dispatch and persistence.
//!
//! Tests cover:
//! - Params loading from real INI files on disk
//! - Bar import from text files
//! - Save/load and export/import of the JSON state
//! - Exit codes for each error family

mod common;

use carrytrader::adapters::json_state_adapter::{JsonStateAdapter, export_state, import_state};
use carrytrader::cli::{self, Cli, Command};
use carrytrader::domain::error::CarryError;
use carrytrader::domain::session::State;
use carrytrader::ports::state_port::StatePort;
use clap::Parser;
use common::*;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const PARAMS_INI: &str = r#"
[params]
atr_all = 0.35
atr_half = 0.25
gap_days = 3.9
equity_jpy = 1,000,000
"#;

mod params_loading {
    use super::*;

    #[test]
    fn ini_overlays_current_params() {
        let file = write_temp_file(PARAMS_INI);
        let mut state = State::default();
        let dirty = cli::dispatch(
            Command::Params {
                config: Some(file.path().to_path_buf()),
                set: vec![],
            },
            &mut state,
        )
        .unwrap();

        assert!(dirty);
        assert_eq!(state.params.atr_all, 0.35);
        assert_eq!(state.params.atr_half, 0.25);
        assert_eq!(state.params.gap_days, 3);
        assert_eq!(state.params.equity_jpy, 1_000_000.0);
        assert_eq!(state.params.shock, 0.20);
    }

    #[test]
    fn set_overrides_ini() {
        let file = write_temp_file(PARAMS_INI);
        let mut state = State::default();
        cli::dispatch(
            Command::Params {
                config: Some(file.path().to_path_buf()),
                set: vec!["atr_all=0.4".to_string()],
            },
            &mut state,
        )
        .unwrap();
        assert_eq!(state.params.atr_all, 0.4);
    }

    #[test]
    fn non_numeric_param_leaves_state_untouched() {
        let file = write_temp_file("[params]\natr_all = 0.4\nlev_ab = lots\n");
        let mut state = State::default();
        let err = cli::dispatch(
            Command::Params {
                config: Some(file.path().to_path_buf()),
                set: vec![],
            },
            &mut state,
        )
        .unwrap_err();

        assert!(matches!(err, CarryError::InvalidParam { ref key, .. } if key == "lev_ab"));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
        assert_eq!(state, State::default());
    }

    #[test]
    fn missing_config_is_config_error() {
        let err = cli::load_config(&PathBuf::from("/nonexistent/carrytrader.ini")).unwrap_err();
        assert!(matches!(err, CarryError::ConfigParse { .. }));
    }
}

mod bar_input {
    use super::*;

    #[test]
    fn import_bars_from_file() {
        let mut content = String::from("date\topen\thigh\tlow\tclose\tswap\n");
        for bar in pullback_series(25) {
            content.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                bar.date.format("%Y/%m/%d"),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.swap_per_10k
            ));
        }
        let file = write_temp_file(&content);

        let mut state = State::default();
        let dirty = cli::dispatch(
            Command::ImportBars {
                file: file.path().to_path_buf(),
            },
            &mut state,
        )
        .unwrap();

        assert!(dirty);
        assert_eq!(state.bars.len(), 25);
        assert_eq!(state.decide().action.code(), "ADD_AB");
        assert!(state.logs.last().unwrap().ends_with("bar import: 25 lines processed"));
    }

    #[test]
    fn add_bar_then_overwrite() {
        let mut state = State::default();
        let args = |close: &str| Command::AddBar {
            date: "20240115".to_string(),
            open: "7.0".to_string(),
            high: "7.2".to_string(),
            low: "6.9".to_string(),
            close: close.to_string(),
            swap: "120".to_string(),
        };

        cli::dispatch(args("7.1"), &mut state).unwrap();
        let pools = state.pools.clone();
        cli::dispatch(args("7.15"), &mut state).unwrap();

        assert_eq!(state.bars.len(), 1);
        assert_eq!(state.last_bar().unwrap().close, 7.15);
        assert_eq!(state.pools, pools);
    }

    #[test]
    fn add_bar_with_inverted_range_exits_with_input_code() {
        let mut state = State::default();
        let err = cli::dispatch(
            Command::AddBar {
                date: "2024-01-15".to_string(),
                open: "7.0".to_string(),
                high: "6.8".to_string(),
                low: "6.9".to_string(),
                close: "7.0".to_string(),
                swap: "120".to_string(),
            },
            &mut state,
        )
        .unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::from(4));
        assert!(state.bars.is_empty());
    }
}

mod persistence {
    use super::*;

    #[test]
    fn run_persists_between_invocations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let path_arg = path.to_str().unwrap();

        let first = Cli::try_parse_from([
            "carrytrader",
            "--state",
            path_arg,
            "add-bar",
            "2024-01-15",
            "7.0",
            "7.1",
            "6.9",
            "7.05",
            "100",
        ])
        .unwrap();
        assert_eq!(cli::run(first), ExitCode::SUCCESS);

        let second = Cli::try_parse_from(["carrytrader", "half", "--state", path_arg]).unwrap();
        assert_eq!(cli::run(second), ExitCode::SUCCESS);

        let state = JsonStateAdapter::new(path).load().unwrap();
        assert_eq!(state.bars.len(), 1);
        assert_eq!(state.layers.a.lots, 7);
        assert_eq!(state.pools.swap_total_jpy, 1500.0);
    }

    #[test]
    fn refused_add_does_not_write_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let args = Cli::try_parse_from(["carrytrader", "add-ab", "--state", path.to_str().unwrap()])
            .unwrap();
        assert_eq!(cli::run(args), ExitCode::from(5));
        assert!(!path.exists());
    }

    #[test]
    fn export_then_import_restores_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup").join("export.json");
        let mut original = state_with_bars(pullback_series(25));
        original.execute(carrytrader::domain::session::LedgerCommand::AddAb).unwrap();

        export_state(&path, &original).unwrap();
        let restored = import_state(&path).unwrap();
        assert_eq!(restored.layers, original.layers);
        assert_eq!(restored.logs, original.logs);

        let mut other = State::default();
        cli::dispatch(Command::Import { path: path.clone() }, &mut other).unwrap();
        assert_eq!(other.layers, original.layers);
        assert_eq!(other.pools, original.pools);
        assert_eq!(other.bars.len(), original.bars.len());
        assert_eq!(other.last_date(), original.last_date());
        assert!(other.logs.last().unwrap().contains("state imported"));
    }

    #[test]
    fn import_of_corrupt_file_fails_and_keeps_state() {
        let file = write_temp_file("{\"params\": ");
        let mut state = state_with_bars(flat_series(3, 7.0, 0.1));
        let before = state.clone();
        let err = cli::dispatch(
            Command::Import {
                path: file.path().to_path_buf(),
            },
            &mut state,
        )
        .unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::from(3));
        assert_eq!(state, before);
    }

    #[test]
    fn reset_returns_to_defaults() {
        let mut state = state_with_bars(flat_series(3, 7.0, 0.1));
        assert!(cli::dispatch(Command::Reset { yes: true }, &mut state).unwrap());
        assert!(state.bars.is_empty());
        assert_eq!(state.layers.a.lots, 15);
        assert_eq!(state.logs.len(), 1);
    }
}
