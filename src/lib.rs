pub mod ablation;
pub mod curriculum;
pub mod driver;
pub mod features;
pub mod monitor;
pub mod observer;
pub mod prng;
