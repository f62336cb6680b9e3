pub mod conversion;
pub mod errors;
