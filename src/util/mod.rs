pub mod parse;
pub mod retry;
