//! Service implementations for storage operations.

mod buckets;

pub use buckets::BucketsService;
