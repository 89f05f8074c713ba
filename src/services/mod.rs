pub mod fixture_store;
pub mod scheduler;
pub mod scoring;
pub mod settlement;
pub mod sync;
