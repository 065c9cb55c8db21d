pub mod syncer;

pub use syncer::Syncer;
