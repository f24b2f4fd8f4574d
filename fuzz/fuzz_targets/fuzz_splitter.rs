#![no_main]

use libfuzzer_sys::fuzz_target;

use awkcore::{Cell, RecordEngine};

fuzz_target!(|data: &[u8]| {
    // Split the data into a separator and a record
    let split_point = data.len() / 8;
    let (fs_bytes, rec_bytes) = data.split_at(split_point);

    let Ok(fs) = std::str::from_utf8(fs_bytes) else {
        return;
    };
    let Ok(rec) = std::str::from_utf8(rec_bytes) else {
        return;
    };

    if rec.len() > 100_000 {
        return;
    }

    let mut engine = RecordEngine::new();
    engine.set_fs(fs);
    if engine
        .set_field(0, Cell::from_string(rec.to_string()))
        .is_err()
    {
        return;
    }

    // Splitting may fail (bad pattern, oversized FS) but must not panic,
    // and every reported field must be readable
    if let Ok(nf) = engine.nf() {
        for i in 0..=nf as i64 {
            let _ = engine.get_field(i);
        }
    }
});
