#![no_main]

use libfuzzer_sys::fuzz_target;
use sqlguard::Dsn;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must never panic; a parsed DSN must re-serialize to something parseable
    if let Ok(dsn) = Dsn::parse(input, None) {
        if let Ok(out) = dsn.to_dsn_string() {
            let _ = Dsn::parse(&out, None);
        }
    }
});
