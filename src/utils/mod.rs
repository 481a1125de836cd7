pub mod error;
pub mod logger;
pub mod spinner;
pub mod validation;
