/// Application services
pub mod decoder;
pub mod render;
pub mod transcoding;

pub use decoder::FfmpegFallbackDecoder;
pub use render::{RenderService, RenderedTrack};
pub use transcoding::TranscodingService;
