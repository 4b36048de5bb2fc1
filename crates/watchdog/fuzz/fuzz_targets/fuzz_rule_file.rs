//! Fuzz target for rule file parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use watchdog::RuleFile;

fuzz_target!(|data: &[u8]| {
    let json = String::from_utf8_lossy(data);
    if let Ok(file) = RuleFile::from_json(&json) {
        for rule in file.into_rule_set().iter() {
            assert!(rule.check_params().is_ok());
            let _ = rule.to_string();
        }
    }
});
