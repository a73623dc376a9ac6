pub mod errors;
pub mod filter;
