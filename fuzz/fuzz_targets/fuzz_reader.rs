#![no_main]

use libfuzzer_sys::fuzz_target;

use awkcore::RecordEngine;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // First byte picks the record separator; the rest is the input stream
    let Some((&mode, input)) = data.split_first() else {
        return;
    };

    // Limit input size to prevent hangs
    if input.len() > 100_000 {
        return;
    }

    let mut engine = RecordEngine::new();
    match mode % 3 {
        0 => engine.set_rs("\n"),
        1 => engine.set_rs(""),
        _ => engine.set_rs(&((mode as char).to_string())),
    }
    engine.set_stdin(Box::new(Cursor::new(input.to_vec())));

    // Records and field counts must come out without panics or hangs
    while let Ok(true) = engine.next_record() {
        let _ = engine.nf();
        let _ = engine.get_field(0);
    }
});
