pub mod event;
pub mod file;
pub mod tokens;
pub mod writer;
