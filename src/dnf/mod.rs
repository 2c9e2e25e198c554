pub mod analyze;
pub mod binfmt;
#[allow(clippy::module_inception)]
pub mod dnf;

pub use analyze::{Analysis, ClauseInfo, ClauseStatus, analyze_clause};
pub use dnf::{Assignment, Dnf, Lit};
