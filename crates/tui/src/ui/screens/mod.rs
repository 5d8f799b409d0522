pub mod entries;
pub mod summary;
