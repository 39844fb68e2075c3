#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Split arbitrary input into code and namespace halves.
        let mid = s.len() / 2;
        if let (Some(code), Some(namespace)) = (s.get(..mid), s.get(mid..)) {
            let _ = risiti::core::item_code_counter(code, namespace);
        }
    }
});
