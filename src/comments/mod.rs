pub mod analyze;
pub mod ingest;
pub mod keys;
pub mod lookup;
pub mod types;
