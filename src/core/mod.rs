// Public modules
pub mod error;
pub mod presets;
pub mod rewrite;
pub mod rules;
pub mod selector;
pub mod sweep;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use presets::Preset;
pub use rules::{Rule, RuleOrder, RuleTable};
pub use selector::{Candidate, Selector};
pub use sweep::{SweepOptions, SweepReport};
