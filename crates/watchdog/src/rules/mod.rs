//! Rule definitions, ordered rule sets and rule files.

mod file;
mod rule;
mod set;

pub use file::{Preset, RuleFile};
pub use rule::{Rule, RuleKind, RuleParams};
pub use set::RuleSet;
