pub mod claim_fee;
pub mod utils;
