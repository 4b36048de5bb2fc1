//! Inline rule syntax for `--rule`.
//!
//! ```text
//! not_null:Customer ID
//! unique:Transaction ID
//! range:Price:0:            (either bound may be empty)
//! member_of:Status:paid|refunded
//! ```

use watchdog::{ParserConfig, Rule, RuleKind, RuleParams};

/// Parse one inline rule.
pub fn parse_rule_arg(arg: &str) -> Result<Rule, String> {
    let (kind, rest) = arg
        .split_once(':')
        .ok_or_else(|| format!("invalid rule '{}': expected KIND:COLUMN[...]", arg))?;
    let kind: RuleKind = kind.trim().parse().map_err(|e| format!("{}", e))?;

    let (column, params) = match kind {
        RuleKind::NotNull | RuleKind::Unique => (rest, RuleParams::new()),

        RuleKind::Range => {
            let mut parts = rest.rsplitn(3, ':');
            let (max, min, column) = match (parts.next(), parts.next(), parts.next()) {
                (Some(max), Some(min), Some(column)) => (max, min, column),
                _ => return Err(format!("invalid rule '{}': expected range:COLUMN:MIN:MAX", arg)),
            };
            let mut params = RuleParams::new();
            if let Some(min) = parse_bound(min, arg)? {
                params = params.with_min(min);
            }
            if let Some(max) = parse_bound(max, arg)? {
                params = params.with_max(max);
            }
            (column, params)
        }

        RuleKind::MemberOf => {
            let (column, values) = rest.rsplit_once(':').ok_or_else(|| {
                format!("invalid rule '{}': expected member_of:COLUMN:a|b|c", arg)
            })?;
            // Typed like data cells so `1|2` matches numeric columns.
            let typer = ParserConfig::default();
            let allowed: Vec<_> = values.split('|').map(|v| typer.type_cell(v)).collect();
            (column, RuleParams::new().with_allowed(allowed))
        }
    };

    Rule::from_parts(kind, column.trim(), params).map_err(|e| e.to_string())
}

fn parse_bound(raw: &str, arg: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid rule '{}': '{}' is not a number", arg, raw))
}
