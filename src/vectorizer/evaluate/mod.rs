pub mod pairwise;
pub mod query;
pub mod scoring;
