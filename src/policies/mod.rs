pub mod epsilon_greedy;
pub mod errors;
pub mod estimates;
mod policy;
pub mod pursuit;
mod rng;

pub use policy::{step, Policy, PolicyType};
pub use rng::MaybeSeededRng;
