use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::app::config::VideoLinkTransience;
use crate::s3::connection::{PresignUrl, S3Connection};

/// 临时链接默认有效期（秒）
pub const DEFAULT_EXPIRES_IN: u64 = 10;

/// 可识别的 S3 URL 形式，按顺序匹配，先匹配者生效
///
/// - `http(s)://s3.amazonaws.com/<bucket>/<object>`
/// - `http(s)://s3-region.amazonaws.com/<bucket>/<object>`
/// - `http(s)://<bucket>.s3.amazonaws.com/<object>`
pub const S3_URL_SHAPES: &[&str] = &[
    r"://s3(?:.*).amazonaws.com/(?P<bucket>[^/]+)/(?P<key>.+)",
    r"://(?P<bucket>.+).s3(?:.*).amazonaws.com/(?P<key>.+)",
];

static S3_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    S3_URL_SHAPES
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// 从 URL 中解析出的 bucket 与对象 key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

/// 依次尝试各个 URL 形式，返回第一个匹配结果
pub fn parse_s3_location(video_url: &str) -> Option<S3Location> {
    S3_URL_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(video_url)?;
        Some(S3Location {
            bucket: caps.name("bucket")?.as_str().to_string(),
            key: caps.name("key")?.as_str().to_string(),
        })
    })
}

/// 获取 S3 视频的临时访问链接
///
/// 未配置凭证或 URL 不是可识别的 S3 地址时返回 `Ok(None)`，签名失败返回 `Err`。
pub fn get_s3_transient_url(
    settings: &VideoLinkTransience,
    video_url: &str,
    expires_in: u64,
) -> Result<Option<String>> {
    get_s3_transient_url_with(settings, video_url, expires_in, |access_key, secret_key| {
        S3Connection::new(access_key, secret_key)
            .with_signature_version(settings.signature_version)
            .with_region(settings.region.as_str())
    })
}

/// 同 [`get_s3_transient_url`]，由 `connect` 根据凭证构造签名客户端
pub fn get_s3_transient_url_with<C, F>(
    settings: &VideoLinkTransience,
    video_url: &str,
    expires_in: u64,
    connect: F,
) -> Result<Option<String>>
where
    C: PresignUrl,
    F: FnOnce(&str, &str) -> C,
{
    let Some((access_key, secret_key)) = settings.credentials() else {
        info!("视频临时链接凭证未配置");
        return Ok(None);
    };

    let Some(location) = parse_s3_location(video_url) else {
        debug!("不是可识别的 S3 地址: {}", video_url);
        return Ok(None);
    };

    let conn = connect(access_key, secret_key);
    let url = conn.generate_url(expires_in, "GET", &location.bucket, &location.key)?;
    Ok(Some(url))
}
