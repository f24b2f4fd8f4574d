//! awkcore - the record input and field splitting engine of a POSIX AWK
//! interpreter.
//!
//! This crate pulls logical records from a sequence of input sources
//! according to a configurable record separator, splits each record into
//! numbered fields according to a configurable field separator, and keeps
//! the record and its fields coherent under mutation: splitting and
//! rebuilding both happen lazily, on first observation.
//!
//! # Example
//!
//! ```
//! use awkcore::{Cell, RecordEngine};
//! use std::io::Cursor;
//!
//! let mut engine = RecordEngine::new();
//! engine.set_fs(",");
//! engine.set_stdin(Box::new(Cursor::new("a,b,c\n1,2,3\n")));
//!
//! assert!(engine.next_record().unwrap());
//! assert_eq!(engine.nf().unwrap(), 3);
//! assert_eq!(engine.get_field(2).unwrap().as_str(), "b");
//!
//! // mutating a field marks $0 stale; reading $0 rebuilds it with OFS
//! engine.set_field(2, Cell::from_string("X".into())).unwrap();
//! assert_eq!(engine.get_field(0).unwrap().as_str(), "a X c");
//!
//! assert!(engine.next_record().unwrap());
//! assert!(engine.get_field(1).unwrap().is_numeric());
//! ```
//!
//! # Paragraph mode
//!
//! ```
//! use awkcore::RecordEngine;
//! use std::io::Cursor;
//!
//! let mut engine = RecordEngine::new();
//! engine.set_rs("");
//! engine.set_stdin(Box::new(Cursor::new("a\nb\n\nc\n")));
//!
//! assert!(engine.next_record().unwrap());
//! assert_eq!(engine.get_field(0).unwrap().as_str(), "a\nb");
//! assert!(engine.next_record().unwrap());
//! assert_eq!(engine.get_field(0).unwrap().as_str(), "c");
//! assert!(!engine.next_record().unwrap());
//! ```

pub mod cell;
pub mod error;
pub mod record;

pub use cell::Cell;
pub use error::{Error, Result};
pub use record::RecordEngine;
