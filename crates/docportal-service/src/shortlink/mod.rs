//! Short URLs stored as JSON records in a side container.

pub mod code;
pub mod record;
pub mod service;
pub mod sweeper;

pub use code::generate_code;
pub use record::ShortUrlRecord;
pub use service::ShortUrlService;
pub use sweeper::ShortUrlSweeper;
