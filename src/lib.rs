pub mod common;
pub mod markets;
pub mod mcp;
pub mod telemetry;
pub mod tools;
pub mod transactions;
