pub mod arm;
pub mod errors;
mod test_bench;

pub use test_bench::{Play, TestBench};
