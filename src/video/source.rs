use std::time::Duration;
use tracing::{debug, warn};

use crate::app::config::AppConfig;
use crate::s3::transient::get_s3_transient_url;
use crate::video::cdn::{CdnTransport, get_video_from_cdn_with_timeout};

/// 视频播放地址解析：CDN 优先，其次 S3 临时链接，最后回退到原始地址
pub struct VideoSourceResolver<T> {
    config: AppConfig,
    transport: T,
}

impl<T: CdnTransport> VideoSourceResolver<T> {
    pub fn new(config: AppConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub async fn resolve(&self, video_url: &str) -> String {
        let timeout = Duration::from_millis(self.config.cdn.timeout_ms);
        match get_video_from_cdn_with_timeout(
            &self.transport,
            self.config.cdn.base_url.as_deref(),
            video_url,
            timeout,
        )
        .await
        {
            Ok(Some(url)) => {
                debug!("使用 CDN 地址: {}", url);
                return url;
            }
            Ok(None) => {}
            Err(e) => warn!("⚠️ CDN 响应异常，忽略: {:#}", e),
        }

        let transience = &self.config.video_link_transience;
        match get_s3_transient_url(transience, video_url, transience.expires_in) {
            Ok(Some(url)) => return url,
            Ok(None) => {}
            Err(e) => warn!("⚠️ 生成 S3 临时链接失败: {:#}", e),
        }

        video_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::cdn::CdnHttpResponse;
    use anyhow::Result;

    const ORIGINAL: &str = "https://s3.amazonaws.com/mybucket/lecture.mp4";

    struct FixedTransport(u16, &'static str);

    impl CdnTransport for FixedTransport {
        async fn get(&self, _url: &str, _timeout: Duration) -> Result<CdnHttpResponse> {
            Ok(CdnHttpResponse {
                status: self.0,
                body: self.1.as_bytes().to_vec(),
            })
        }
    }

    fn config(cdn: bool, credentials: bool) -> AppConfig {
        let mut cfg = AppConfig::default();
        if cdn {
            cfg.cdn.base_url = Some("http://cdn/?s3_url=".to_string());
        }
        if credentials {
            cfg.video_link_transience.aws_access_key = Some("AKID".to_string());
            cfg.video_link_transience.aws_secret_key = Some("SECRET".to_string());
        }
        cfg
    }

    #[tokio::test]
    async fn test_cdn_wins() {
        let resolver = VideoSourceResolver::new(
            config(true, true),
            FixedTransport(200, r#"{"sources": ["http://a/1.mp4"], "s3_url": "x"}"#),
        );
        assert_eq!(resolver.resolve(ORIGINAL).await, "http://a/1.mp4");
    }

    #[tokio::test]
    async fn test_falls_back_to_transient_url() {
        let resolver = VideoSourceResolver::new(config(true, true), FixedTransport(404, ""));
        let url = resolver.resolve(ORIGINAL).await;
        assert!(url.starts_with("https://mybucket.s3.amazonaws.com/lecture.mp4?Signature="));
    }

    #[tokio::test]
    async fn test_malformed_cdn_body_falls_back() {
        let resolver = VideoSourceResolver::new(config(true, false), FixedTransport(200, "not json"));
        assert_eq!(resolver.resolve(ORIGINAL).await, ORIGINAL);
    }

    #[tokio::test]
    async fn test_nothing_configured_returns_original() {
        let resolver = VideoSourceResolver::new(config(false, false), FixedTransport(200, ""));
        assert_eq!(resolver.resolve(ORIGINAL).await, ORIGINAL);
    }

    #[tokio::test]
    async fn test_out_of_range_expiry_falls_back() {
        let mut cfg = config(false, true);
        cfg.video_link_transience.expires_in = i64::MAX as u64;
        let resolver = VideoSourceResolver::new(cfg, FixedTransport(404, ""));
        assert_eq!(resolver.resolve(ORIGINAL).await, ORIGINAL);
    }
}
