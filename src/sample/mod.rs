pub mod assign;
pub mod weights;

pub use assign::conditional_assignment;
pub use weights::ClauseSampler;
