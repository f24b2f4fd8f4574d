//! Record acquisition and field decomposition.
//!
//! One [`RecordEngine`] is one processing session: it owns the field
//! table, the record buffer, the separator configuration and the input
//! cursor. Records are split into fields lazily, and $0 is rebuilt from
//! the fields lazily, both gated by a single freshness state.

mod buffer;
mod reader;
mod splitter;
mod table;

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader};

use regex::Regex;

use crate::cell::Cell;
use crate::error::{Error, Result};

use buffer::RecordBuffer;
use reader::Input;
use table::FieldTable;

/// Longest allowed field separator, in bytes.
pub(crate) const MAX_FIELD_SEP: usize = 100;

/// Cache coherence between $0 and the split fields.
///
/// Exactly one side may be stale at a time; a state with both sides stale
/// cannot be represented and therefore cannot be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Freshness {
    /// $0 and the fields agree.
    Synced,
    /// $0 changed (new record, or assigned directly); a split is owed.
    FieldsStale,
    /// Some field changed; a rebuild of $0 is owed.
    RecordStale,
}

/// The record/field engine for one processing session.
///
/// Drives the four cooperating parts: the record reader (input sources and
/// RS semantics), the field splitter (FS semantics), the field table, and
/// the record builder (OFS join). The interpreter above calls in through
/// [`next_record`](Self::next_record), the field accessors, and the
/// variable surface.
pub struct RecordEngine {
    /// Field slots; slot 0 is the record
    pub(crate) table: FieldTable,
    /// Scratch buffer for reading and rebuilding records
    pub(crate) scratch: RecordBuffer,
    pub(crate) freshness: Freshness,

    /// Field separator (FS)
    pub(crate) fs: String,
    /// Output field separator (OFS)
    pub(crate) ofs: String,
    /// Record separator (RS); "" selects paragraph mode
    pub(crate) rs: String,

    /// Record number (NR)
    pub(crate) nr: u64,
    /// Per-file record number (FNR)
    pub(crate) fnr: u64,
    /// Current input file (FILENAME)
    pub(crate) filename: String,

    /// Argument vector; argv[0] is the program name
    pub(crate) argv: Vec<String>,
    /// Cursor into argv, pointing at the current source while one is open
    pub(crate) argno: usize,
    pub(crate) input: Option<Input>,
    /// One-byte lookahead for paragraph mode
    pub(crate) pushback: Option<u8>,
    /// Set once any source (or the stdin fallback) has been used
    pub(crate) used_any_source: bool,
    /// Standard input, replaceable by the embedder
    pub(crate) stdin: Box<dyn BufRead>,

    /// Named scalars outside the engine's own set (command line assignments)
    pub(crate) vars: HashMap<String, Cell>,

    /// Compiled separator patterns, reused across records
    pub(crate) regexes: HashMap<String, Regex>,
}

impl RecordEngine {
    pub fn new() -> Self {
        Self {
            table: FieldTable::new(),
            scratch: RecordBuffer::new(),
            freshness: Freshness::Synced,
            fs: " ".to_string(),
            ofs: " ".to_string(),
            rs: "\n".to_string(),
            nr: 0,
            fnr: 0,
            filename: String::new(),
            argv: vec!["awkcore".to_string()],
            argno: 1,
            input: None,
            pushback: None,
            used_any_source: false,
            stdin: Box::new(BufReader::new(io::stdin())),
            vars: HashMap::new(),
            regexes: HashMap::new(),
        }
    }

    /// Install the argument vector. `args[0]` is the program name; the
    /// rest are file arguments and `var=value` assignments.
    pub fn set_args(&mut self, args: Vec<String>) {
        self.argv = args;
        self.argno = 1;
    }

    /// Replace the engine's standard input (used for the `-` argument and
    /// the no-file-arguments fallback).
    pub fn set_stdin(&mut self, reader: Box<dyn BufRead>) {
        self.stdin = reader;
    }

    /// Set the field separator
    pub fn set_fs(&mut self, fs: &str) {
        self.fs = fs.to_string();
    }

    /// Set the output field separator
    pub fn set_ofs(&mut self, ofs: &str) {
        self.ofs = ofs.to_string();
    }

    /// Set the record separator; "" selects paragraph mode
    pub fn set_rs(&mut self, rs: &str) {
        self.rs = rs.to_string();
    }

    pub fn nr(&self) -> u64 {
        self.nr
    }

    pub fn fnr(&self) -> u64 {
        self.fnr
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Number of fields in the current record (NF), splitting first if a
    /// split is owed.
    pub fn nf(&mut self) -> Result<usize> {
        self.split_fields()?;
        Ok(self.table.lastfld())
    }

    /// Read field `n`; $0 is the whole record. Splits or rebuilds as
    /// needed. Reading past NF widens the table without changing NF.
    pub fn get_field(&mut self, n: i64) -> Result<&Cell> {
        let n = check_index(n)?;
        if n == 0 {
            self.rebuild_record()?;
            Ok(self.table.record())
        } else {
            self.split_fields()?;
            self.table.access(n)
        }
    }

    /// Assign field `n`. Assigning $0 invalidates the fields; assigning
    /// any other field invalidates $0. Assigning past NF extends NF,
    /// clearing the fields in between.
    pub fn set_field(&mut self, n: i64, cell: Cell) -> Result<()> {
        let n = check_index(n)?;
        if n == 0 {
            self.table.set_record(cell);
            self.freshness = Freshness::FieldsStale;
            return Ok(());
        }
        self.split_fields()?;
        if n > self.table.lastfld() {
            self.table.extend_to(n)?;
        }
        self.table.put(n, cell)?;
        self.freshness = Freshness::RecordStale;
        Ok(())
    }

    /// Explicit assignment of NF. Shrinking discards the dropped fields;
    /// growing exposes new cleared ones. $0 is rebuilt lazily.
    pub fn set_nf(&mut self, n: i64) -> Result<()> {
        let n = check_index(n)?;
        self.split_fields()?;
        self.table.set_lastfld(n)?;
        self.freshness = Freshness::RecordStale;
        Ok(())
    }

    /// Create $0 from $1..$NF if necessary: fields joined by OFS, written
    /// through the growable record buffer.
    pub(crate) fn rebuild_record(&mut self) -> Result<()> {
        if self.freshness != Freshness::RecordStale {
            return Ok(());
        }
        self.scratch.clear();
        for i in 1..=self.table.lastfld() {
            if i > 1 {
                self.scratch.push_str(&self.ofs)?;
            }
            let s = self.table.get(i).as_str();
            self.scratch.push_str(&s)?;
        }
        let rec = self.scratch.to_string_lossy();
        self.table.set_record(Cell::from_string(rec));
        self.freshness = Freshness::Synced;
        Ok(())
    }

    /// Look up a named scalar. The engine owns the record-related names;
    /// anything else comes from the plain variable store.
    pub fn get_var(&mut self, name: &str) -> Result<Cell> {
        Ok(match name {
            "NF" => Cell::num(self.nf()? as f64),
            "NR" => Cell::num(self.nr as f64),
            "FNR" => Cell::num(self.fnr as f64),
            "FS" => Cell::from_string(self.fs.clone()),
            "OFS" => Cell::from_string(self.ofs.clone()),
            "RS" => Cell::from_string(self.rs.clone()),
            "FILENAME" => Cell::from_string(self.filename.clone()),
            _ => self.vars.get(name).cloned().unwrap_or(Cell::Uninit),
        })
    }

    /// Assign a named scalar, routing the record-related names to their
    /// engine-side storage.
    pub fn set_var(&mut self, name: &str, cell: Cell) -> Result<()> {
        match name {
            "NF" => self.set_nf(cell.to_num() as i64)?,
            "NR" => self.nr = cell.to_num() as u64,
            "FNR" => self.fnr = cell.to_num() as u64,
            "FS" => self.fs = cell.as_str().into_owned(),
            "OFS" => self.ofs = cell.as_str().into_owned(),
            "RS" => self.rs = cell.as_str().into_owned(),
            "FILENAME" => self.filename = cell.as_str().into_owned(),
            _ => {
                self.vars.insert(name.to_string(), cell);
            }
        }
        Ok(())
    }

    /// Compile `pattern`, reusing a previous compilation when possible.
    pub(crate) fn regex(&mut self, pattern: &str) -> Result<&Regex> {
        if !self.regexes.contains_key(pattern) {
            let re = Regex::new(pattern)?;
            self.regexes.insert(pattern.to_string(), re);
        }
        Ok(self.regexes.get(pattern).unwrap())
    }
}

impl Default for RecordEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn check_index(n: i64) -> Result<usize> {
    if n < 0 {
        return Err(Error::FieldIndex(n));
    }
    Ok(n as usize)
}
