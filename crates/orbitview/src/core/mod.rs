pub mod rng;
pub mod sim;
pub mod stars;
pub mod time;
