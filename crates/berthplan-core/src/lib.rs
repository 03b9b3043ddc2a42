pub mod config;

pub use config::{BerthplanConfig, LogConfig, PlannerConfig, StoreConfig};
