pub mod snapshot;

pub use snapshot::write_snapshot;
