pub mod config;
pub mod report;
pub mod request;
pub mod runner;
pub mod scenario;

pub use config::RunConfig;
pub use scenario::{Registry, Scenario};
