use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::cell::Cell;
use crate::error::{Error, Result};

use super::{Freshness, MAX_FIELD_SEP, RecordEngine};

/// The currently open input source.
pub(crate) enum Input {
    /// Standard input (or whatever handle replaced it); never closed
    Stdin,
    File(BufReader<File>),
}

impl RecordEngine {
    /// Read the next record into $0. Returns `false` only at true end of
    /// input: end of file on one source moves transparently to the next.
    ///
    /// On success NR and FNR are incremented, the record gets the
    /// numeric-valid treatment, and a field split is owed.
    pub fn next_record(&mut self) -> Result<bool> {
        loop {
            if self.input.is_none() && !self.open_next_source()? {
                return Ok(false);
            }
            if self.read_rec()? {
                let rec = self.scratch.to_string_lossy();
                self.table.set_record(Cell::from_string(rec));
                self.nr += 1;
                self.fnr += 1;
                self.freshness = Freshness::FieldsStale;
                return Ok(true);
            }
            // end of file on this source; set up the next
            self.close_source();
        }
    }

    /// Skip past the current source regardless of where it stands, closing
    /// it unless it is standard input.
    pub fn next_file(&mut self) {
        self.input = None;
        self.pushback = None;
        self.argno += 1;
    }

    /// Walk the argument vector to the next input source. A missing or
    /// empty argument is skipped; a `var=value` argument is executed as an
    /// assignment and skipped; `-` is standard input; anything else is
    /// opened as a file, fatally on failure. When no filename-shaped
    /// argument exists at all, standard input serves the entire run.
    /// Returns `false` when no source remains.
    fn open_next_source(&mut self) -> Result<bool> {
        while self.argno < self.argv.len() {
            let arg = self.argv[self.argno].clone();
            if arg.is_empty() {
                self.argno += 1;
                continue;
            }
            if is_cmdline_assign(&arg) {
                self.assign_cmdline(&arg)?;
                self.argno += 1;
                continue;
            }
            self.filename = arg.clone();
            self.fnr = 0;
            self.input = Some(if arg == "-" {
                Input::Stdin
            } else {
                match File::open(&arg) {
                    Ok(f) => Input::File(BufReader::new(f)),
                    Err(_) => return Err(Error::cannot_open(arg)),
                }
            });
            self.used_any_source = true;
            return Ok(true);
        }
        if !self.used_any_source {
            // no filenames anywhere, so use stdin
            self.used_any_source = true;
            self.filename.clear();
            self.fnr = 0;
            self.input = Some(Input::Stdin);
            return Ok(true);
        }
        Ok(false)
    }

    fn close_source(&mut self) {
        // dropping a file handle closes it; stdin is only set aside
        self.input = None;
        self.pushback = None;
        self.filename.clear();
        self.argno += 1;
    }

    /// Read one raw record into the scratch buffer according to RS.
    /// Returns `false` when end of file arrived with nothing read.
    fn read_rec(&mut self) -> Result<bool> {
        if self.fs.len() >= MAX_FIELD_SEP {
            return Err(Error::field_sep_too_long(&self.fs));
        }
        self.scratch.clear();
        let hit_eof = if self.rs.is_empty() {
            self.read_paragraph()?
        } else {
            self.read_until(self.rs.as_bytes()[0])?
        };
        Ok(!hit_eof || !self.scratch.is_empty())
    }

    /// Single-character RS: the terminator is consumed, not stored.
    fn read_until(&mut self, sep: u8) -> Result<bool> {
        loop {
            match self.getc()? {
                None => return Ok(true),
                Some(c) if c == sep => return Ok(false),
                Some(c) => self.scratch.push_byte(c)?,
            }
        }
    }

    /// Paragraph mode: leading newlines are skipped, a run of two or more
    /// newlines ends the record, and a single embedded newline is kept as
    /// record content.
    fn read_paragraph(&mut self) -> Result<bool> {
        loop {
            match self.getc()? {
                Some(b'\n') => continue,
                Some(c) => {
                    self.pushback = Some(c);
                    break;
                }
                None => break,
            }
        }
        loop {
            loop {
                match self.getc()? {
                    None => return Ok(true),
                    Some(b'\n') => break,
                    Some(c) => self.scratch.push_byte(c)?,
                }
            }
            // one newline seen; a second (or EOF) ends the record
            match self.getc()? {
                None => return Ok(true),
                Some(b'\n') => return Ok(false),
                Some(c) => {
                    self.scratch.push_byte(b'\n')?;
                    self.scratch.push_byte(c)?;
                }
            }
        }
    }

    /// One byte from the current source, honoring the one-byte pushback.
    fn getc(&mut self) -> Result<Option<u8>> {
        if let Some(c) = self.pushback.take() {
            return Ok(Some(c));
        }
        let reader: &mut dyn BufRead = match self.input.as_mut() {
            Some(Input::File(f)) => f,
            _ => self.stdin.as_mut(),
        };
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        let c = buf[0];
        reader.consume(1);
        Ok(Some(c))
    }

    fn assign_cmdline(&mut self, arg: &str) -> Result<()> {
        if let Some((name, value)) = arg.split_once('=') {
            self.set_var(name, Cell::from_string(value.to_string()))?;
        }
        Ok(())
    }
}

/// An argument of the shape `identifier=value` (and not `identifier==...`)
/// is a command line assignment, not a filename.
pub(crate) fn is_cmdline_assign(s: &str) -> bool {
    let bytes = s.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return false;
    }
    let mut i = 1;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i < bytes.len() && bytes[i] == b'=' && bytes.get(i + 1) != Some(&b'=')
}
