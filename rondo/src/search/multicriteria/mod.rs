pub mod engine;
pub mod label;

pub use engine::MultiCriteriaEngine;
pub use label::{McLabel, ParetoBag};
