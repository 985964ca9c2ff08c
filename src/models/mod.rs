// Data models (structs)
pub mod job;
pub mod results;

pub use job::*;
pub use results::*;
