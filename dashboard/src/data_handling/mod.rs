pub mod burtin;
pub mod prepare;
