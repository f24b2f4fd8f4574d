use crate::cell::Cell;
use crate::error::{Error, Result};

use super::{Freshness, MAX_FIELD_SEP, RecordEngine};

impl RecordEngine {
    /// Create fields from the current record, selecting the algorithm by
    /// FS at split time. Memoized: a no-op unless a split is owed.
    ///
    /// On completion the stale slots above the new count are cleared, NF
    /// reflects the new count, and the rebuild obligation is also
    /// discharged because the fields exactly reflect $0.
    pub(crate) fn split_fields(&mut self) -> Result<()> {
        if self.freshness != Freshness::FieldsStale {
            return Ok(());
        }
        if self.fs.len() >= MAX_FIELD_SEP {
            return Err(Error::field_sep_too_long(&self.fs));
        }
        let rec = self.table.record().as_str().into_owned();
        let fs = self.fs.clone();

        let n = if fs.len() > 1 {
            self.split_regex(&rec, &fs)?
        } else if fs == " " {
            self.split_blanks(&rec)?
        } else if fs.is_empty() {
            self.split_chars(&rec)?
        } else {
            self.split_single(&rec, fs.as_bytes()[0])?
        };

        self.table.commit_fields(n);
        self.freshness = Freshness::Synced;
        Ok(())
    }

    fn store_field(&mut self, n: usize, s: &str) -> Result<()> {
        self.table.put(n, Cell::from_string(s.to_string()))
    }

    /// Default mode (FS = " "): fields are maximal runs of characters
    /// other than space, tab and newline. Separator runs collapse, so no
    /// field is ever empty and leading/trailing blanks produce nothing.
    fn split_blanks(&mut self, rec: &str) -> Result<usize> {
        let bytes = rec.as_bytes();
        let mut i = 0;
        let mut n = 0;
        loop {
            while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            let start = i;
            while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'\n') {
                i += 1;
            }
            n += 1;
            self.store_field(n, &rec[start..i])?;
        }
        Ok(n)
    }

    /// FS = "": one character per field.
    fn split_chars(&mut self, rec: &str) -> Result<usize> {
        let mut n = 0;
        let mut buf = [0u8; 4];
        for ch in rec.chars() {
            n += 1;
            self.store_field(n, ch.encode_utf8(&mut buf))?;
        }
        Ok(n)
    }

    /// Any other single-byte FS: split on every literal occurrence. An
    /// empty record has no fields; a trailing separator yields a trailing
    /// empty field. When RS is empty an embedded newline also ends a
    /// field; under a non-empty RS it does not.
    fn split_single(&mut self, rec: &str, sep: u8) -> Result<usize> {
        if rec.is_empty() {
            return Ok(0);
        }
        let newline_splits = self.rs.is_empty();
        let mut start = 0;
        let mut n = 0;
        for (i, &b) in rec.as_bytes().iter().enumerate() {
            if b == sep || (newline_splits && b == b'\n') {
                n += 1;
                self.store_field(n, &rec[start..i])?;
                start = i + 1;
            }
        }
        n += 1;
        self.store_field(n, &rec[start..])?;
        Ok(n)
    }

    /// FS longer than one byte: FS is a regular expression. The gap before
    /// each match becomes a field (possibly empty) and the suffix after
    /// the last match is the final field. Positions are explicit; nothing
    /// persists across splits except the compiled pattern.
    fn split_regex(&mut self, rec: &str, fs: &str) -> Result<usize> {
        if rec.is_empty() {
            return Ok(0);
        }
        let re = self.regex(fs)?.clone();
        let mut start = 0;
        let mut n = 0;
        for m in re.find_iter(rec) {
            if m.start() == m.end() {
                // a zero-width match separates nothing
                continue;
            }
            n += 1;
            self.store_field(n, &rec[start..m.start()])?;
            start = m.end();
        }
        n += 1;
        self.store_field(n, &rec[start..])?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordEngine;

    fn fields_of(engine: &mut RecordEngine, rec: &str) -> Vec<String> {
        engine
            .set_field(0, Cell::from_string(rec.to_string()))
            .unwrap();
        let nf = engine.nf().unwrap();
        (1..=nf as i64)
            .map(|i| engine.get_field(i).unwrap().as_str().into_owned())
            .collect()
    }

    #[test]
    fn test_blank_mode_collapses_runs() {
        let mut engine = RecordEngine::new();
        assert_eq!(
            fields_of(&mut engine, "  one \t two\nthree  "),
            ["one", "two", "three"]
        );
    }

    #[test]
    fn test_blank_mode_empty_record() {
        let mut engine = RecordEngine::new();
        assert_eq!(fields_of(&mut engine, ""), Vec::<String>::new());
        assert_eq!(fields_of(&mut engine, " \t "), Vec::<String>::new());
    }

    #[test]
    fn test_single_char_mode() {
        let mut engine = RecordEngine::new();
        engine.set_fs(":");
        assert_eq!(fields_of(&mut engine, "a:b:c"), ["a", "b", "c"]);
        assert_eq!(fields_of(&mut engine, "a::c"), ["a", "", "c"]);
        assert_eq!(fields_of(&mut engine, ":a:"), ["", "a", ""]);
        assert_eq!(fields_of(&mut engine, ""), Vec::<String>::new());
    }

    #[test]
    fn test_single_char_keeps_newline_under_default_rs() {
        // RS is "\n", so a newline inside the record is field content
        let mut engine = RecordEngine::new();
        engine.set_fs(":");
        assert_eq!(fields_of(&mut engine, "a:b\nc:d"), ["a", "b\nc", "d"]);
    }

    #[test]
    fn test_single_char_splits_newline_in_paragraph_mode() {
        let mut engine = RecordEngine::new();
        engine.set_fs(":");
        engine.set_rs("");
        assert_eq!(fields_of(&mut engine, "a:b\nc:d"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_char_mode() {
        let mut engine = RecordEngine::new();
        engine.set_fs("");
        assert_eq!(fields_of(&mut engine, "abc"), ["a", "b", "c"]);
        assert_eq!(fields_of(&mut engine, ""), Vec::<String>::new());
    }

    #[test]
    fn test_char_mode_multibyte() {
        let mut engine = RecordEngine::new();
        engine.set_fs("");
        assert_eq!(fields_of(&mut engine, "aßc"), ["a", "ß", "c"]);
    }

    #[test]
    fn test_regex_mode() {
        let mut engine = RecordEngine::new();
        engine.set_fs("[0-9]+");
        assert_eq!(
            fields_of(&mut engine, "a1b22c333d"),
            ["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_regex_mode_empty_gaps() {
        let mut engine = RecordEngine::new();
        engine.set_fs("[0-9]+");
        assert_eq!(fields_of(&mut engine, "1a2"), ["", "a", ""]);
    }

    #[test]
    fn test_regex_mode_no_match_is_one_field() {
        let mut engine = RecordEngine::new();
        engine.set_fs("[0-9]+");
        assert_eq!(fields_of(&mut engine, "abc"), ["abc"]);
    }

    #[test]
    fn test_regex_mode_zero_width_pattern() {
        let mut engine = RecordEngine::new();
        engine.set_fs("x*");
        // the pattern can match nothing; only real occurrences split
        assert_eq!(fields_of(&mut engine, "axxb"), ["a", "b"]);
        assert_eq!(fields_of(&mut engine, "ab"), ["ab"]);
    }

    #[test]
    fn test_regex_mode_literal_two_chars() {
        let mut engine = RecordEngine::new();
        engine.set_fs("::");
        assert_eq!(fields_of(&mut engine, "a::b::c"), ["a", "b", "c"]);
    }

    #[test]
    fn test_stale_fields_cleared_between_records() {
        let mut engine = RecordEngine::new();
        assert_eq!(fields_of(&mut engine, "a b c d"), ["a", "b", "c", "d"]);
        assert_eq!(fields_of(&mut engine, "x y"), ["x", "y"]);
        // old $3/$4 must not leak through a widening read
        assert!(engine.get_field(3).unwrap().is_empty());
        assert!(engine.get_field(4).unwrap().is_empty());
        assert_eq!(engine.nf().unwrap(), 2);
    }

    #[test]
    fn test_split_is_memoized() {
        let mut engine = RecordEngine::new();
        assert_eq!(fields_of(&mut engine, "a b"), ["a", "b"]);
        // fields are fresh; changing FS without touching $0 must not
        // trigger a resplit on the next access
        engine.set_fs(":");
        assert_eq!(engine.nf().unwrap(), 2);
        assert_eq!(engine.get_field(1).unwrap().as_str(), "a");
    }

    #[test]
    fn test_fs_read_fresh_per_split() {
        let mut engine = RecordEngine::new();
        assert_eq!(fields_of(&mut engine, "a:b c"), ["a:b", "c"]);
        engine.set_fs(":");
        assert_eq!(fields_of(&mut engine, "a:b c"), ["a", "b c"]);
    }

    #[test]
    fn test_fs_too_long_is_fatal() {
        let mut engine = RecordEngine::new();
        let long_fs = "x".repeat(MAX_FIELD_SEP);
        engine.set_fs(&long_fs);
        engine
            .set_field(0, Cell::from_string("data".to_string()))
            .unwrap();
        let err = engine.nf().unwrap_err();
        assert!(matches!(err, Error::FieldSepTooLong(_)));
        let msg = format!("{}", err);
        assert!(msg.contains("xxxxxxxxxx"));
        assert!(!msg.contains(&"x".repeat(11)));
    }

    #[test]
    fn test_numeric_fields_marked() {
        let mut engine = RecordEngine::new();
        engine.set_fs(",");
        fields_of(&mut engine, "1,two,3.5");
        assert!(engine.get_field(1).unwrap().is_numeric());
        assert!(!engine.get_field(2).unwrap().is_numeric());
        assert!(engine.get_field(3).unwrap().is_numeric());
    }
}
