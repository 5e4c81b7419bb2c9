pub mod provision;
pub mod report;

pub use provision::*;
