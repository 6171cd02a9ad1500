pub mod accounts;
pub mod dlmm;
pub mod errors;
pub mod meteora;
pub mod types;
pub mod utils;
