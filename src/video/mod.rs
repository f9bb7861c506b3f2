pub mod cdn;
pub mod source;
pub mod youtube;

pub use cdn::{CdnTransport, ReqwestTransport, get_video_from_cdn};
pub use source::VideoSourceResolver;
pub use youtube::create_youtube_string;
