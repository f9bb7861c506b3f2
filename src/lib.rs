pub mod app;
pub mod logger;
pub mod model;
pub mod s3;
pub mod utils;
pub mod video;

pub use s3::transient::get_s3_transient_url;
pub use video::{create_youtube_string, get_video_from_cdn};
