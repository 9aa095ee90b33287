pub mod matcher;
pub mod parse;
pub mod registration;
