//! Delimited text bar importer.
//!
//! One bar per line: `date, open, high, low, close, swap`. The delimiter is
//! picked per line: tab if present, else comma, else runs of whitespace.
//! Lines that do not parse (headers included) are skipped and counted.

use crate::domain::bar::{Bar, parse_bar_date};
use crate::domain::config_validation::parse_number;
use crate::domain::error::CarryError;
use crate::ports::bar_source::{BarBatch, BarSource};
use std::fs;
use std::path::PathBuf;

enum Input {
    File(PathBuf),
    Text(String),
}

pub struct BarTextAdapter {
    input: Input,
}

impl BarTextAdapter {
    pub fn from_file(path: PathBuf) -> Self {
        Self {
            input: Input::File(path),
        }
    }

    pub fn from_string(content: &str) -> Self {
        Self {
            input: Input::Text(content.to_string()),
        }
    }
}

impl BarSource for BarTextAdapter {
    fn read_bars(&self) -> Result<BarBatch, CarryError> {
        let content = match &self.input {
            Input::File(path) => fs::read_to_string(path)?,
            Input::Text(text) => text.clone(),
        };
        Ok(parse_bars(&content))
    }
}

pub fn parse_bars(content: &str) -> BarBatch {
    let mut batch = BarBatch::default();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_line(line) {
            Some(bar) => batch.bars.push(bar),
            None => {
                log::debug!("skipping unparseable bar line: {line}");
                batch.skipped += 1;
            }
        }
    }
    batch
}

fn split_fields(line: &str) -> Vec<String> {
    let delimiter = if line.contains('\t') {
        b'\t'
    } else if line.contains(',') {
        b','
    } else {
        return line.split_whitespace().map(str::to_string).collect();
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());

    match rdr.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn parse_line(line: &str) -> Option<Bar> {
    let fields = split_fields(line);
    if fields.len() < 6 {
        return None;
    }
    let date = parse_bar_date(&fields[0]).ok()?;
    Some(Bar {
        date,
        open: parse_number(&fields[1])?,
        high: parse_number(&fields[2])?,
        low: parse_number(&fields[3])?,
        close: parse_number(&fields[4])?,
        swap_per_10k: parse_number(&fields[5])?,
    })
}
