//! Job configuration, per-file validation and image collection

pub mod collector;
pub mod error;
pub mod job;
pub mod validator;

pub use collector::{ImageCollector, ScanReport};
pub use error::{AssembleError, SkipReason};
pub use job::{DecoderLimits, JobConfig, PageEncoding};
pub use validator::{load_image, AcceptedImage};
