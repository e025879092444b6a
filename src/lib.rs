pub mod config;
pub mod errors;
pub mod experiment;
pub mod policies;
pub mod runner;
pub mod testbed;
