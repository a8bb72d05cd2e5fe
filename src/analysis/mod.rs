pub mod compare;
pub mod merge;
pub mod summary;
pub mod views;
