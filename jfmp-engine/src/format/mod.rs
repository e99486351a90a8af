//! Video format analysis and resolution
//!
//! - `analyzer`: classifies content mime/codec/color metadata into an [`HdrTier`]
//! - `resolver`: combines the content tier with the display tier and the HDR
//!   policy flag into the format that will actually be decoded

pub mod analyzer;
pub mod resolver;

pub use analyzer::{analyze, VideoFormatDescriptor};
pub use jfmp_common::media::{MIME_DOLBY_VISION, MIME_H264, MIME_H265};
pub use jfmp_common::HdrTier;
pub use resolver::{resolve, PlaybackFormatResolution};
