pub mod dashboard;
pub mod health;
pub mod memory;
pub mod telemetry;
