use std::env;
use std::io::{self, Write};
use std::process;

use awkcore::{Cell, RecordEngine};

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args[1..]) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("awkcore: {}", e);
            process::exit(2);
        }
    }
}

fn run(args: &[String]) -> Result<i32, Box<dyn std::error::Error>> {
    let mut engine = RecordEngine::new();
    let mut counts_only = false;
    let mut files: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if arg == "--help" || arg == "-h" {
            print_help();
            return Ok(0);
        }

        if arg == "--version" {
            println!("awkcore {}", env!("CARGO_PKG_VERSION"));
            return Ok(0);
        }

        if arg == "-F" {
            i += 1;
            let fs = args.get(i).ok_or("option -F requires an argument")?;
            engine.set_fs(fs);
        } else if let Some(fs) = arg.strip_prefix("-F") {
            engine.set_fs(fs);
        } else if arg == "-R" {
            i += 1;
            let rs = args.get(i).ok_or("option -R requires an argument")?;
            engine.set_rs(rs);
        } else if arg == "-O" {
            i += 1;
            let ofs = args.get(i).ok_or("option -O requires an argument")?;
            engine.set_ofs(ofs);
        } else if arg == "-v" {
            i += 1;
            let assign = args.get(i).ok_or("option -v requires an argument")?;
            let (name, value) = assign
                .split_once('=')
                .ok_or_else(|| format!("invalid variable assignment: {}", assign))?;
            engine.set_var(name, Cell::from_string(value.to_string()))?;
        } else if arg == "-c" {
            counts_only = true;
        } else if arg == "--" {
            // End of options
            i += 1;
            files.extend(args[i..].iter().cloned());
            break;
        } else if arg.starts_with('-') && arg != "-" {
            return Err(format!("unknown option: {}", arg).into());
        } else {
            files.push(arg.clone());
        }

        i += 1;
    }

    let mut argv = vec!["awkcore".to_string()];
    argv.extend(files);
    engine.set_args(argv);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    while engine.next_record()? {
        let nf = engine.nf()?;
        if counts_only {
            writeln!(out, "{}\t{}\t{}", engine.nr(), engine.fnr(), nf)?;
            continue;
        }
        // reassign $1 to itself so $0 is rebuilt from the fields with OFS
        if nf > 0 {
            let first = engine.get_field(1)?.clone();
            engine.set_field(1, first)?;
        }
        writeln!(out, "{}", engine.get_field(0)?.as_str())?;
    }

    Ok(0)
}

fn print_help() {
    println!(
        r#"Usage: awkcore [OPTIONS] [file ...]

Record and field inspector for the awkcore engine: reads records
according to RS, splits them according to FS, and re-emits each record
from its fields joined by OFS. File arguments of the form var=value are
executed as variable assignments; - reads standard input.

Options:
  -F fs          Set the field separator to fs
  -R rs          Set the record separator to rs ("" for paragraph mode)
  -O ofs         Set the output field separator to ofs
  -v var=val     Assign value to variable before execution
  -c             Print NR, FNR and NF per record instead of the record
  --version      Print version information
  --help         Print this help message

Examples:
  awkcore -F: /etc/passwd
  awkcore -F, -O'|' data.csv
  awkcore -c -R "" notes.txt
"#
    );
}
