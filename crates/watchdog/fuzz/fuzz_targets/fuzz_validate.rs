//! Fuzz target for parsing and validating arbitrary delimited text.
//!
//! Whatever the input, parsing either fails with an error or yields a dataset
//! whose validation splits every row into exactly one bucket.

#![no_main]

use libfuzzer_sys::fuzz_target;
use watchdog::{Parser, Rule, RuleSet, Watchdog};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(dataset) = Parser::new().parse_bytes(data) else {
        return;
    };

    let mut rules = RuleSet::new();
    for column in dataset.columns() {
        rules.push(Rule::not_null(column.as_str()));
        rules.push(Rule::unique(column.as_str()));
        if let Ok(rule) = Rule::range(column.as_str(), Some(0.0), Some(1000.0)) {
            rules.push(rule);
        }
    }

    if let Ok(outcome) = Watchdog::new().validate_dataset(&dataset, &rules) {
        assert_eq!(outcome.clean().len() + outcome.failed().len(), dataset.len());
    }
});
