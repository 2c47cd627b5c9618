pub mod parser;
pub mod types;

pub use parser::PlanFormat;
pub use types::{Plan, QaPair, Turn};
