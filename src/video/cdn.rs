use anyhow::{Context, Result, anyhow};
use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::model::CdnResponse;
use crate::utils::text::quote_lookup_url;

/// CDN 查询的客户端超时
pub const CDN_REQUEST_TIMEOUT: Duration = Duration::from_millis(500);

/// 传输层返回的原始响应
#[derive(Debug, Clone)]
pub struct CdnHttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// 发起 CDN 查询请求的传输层
///
/// 返回 `Err` 表示网络层失败（超时、连接错误等），HTTP 状态码不算失败。
pub trait CdnTransport {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<CdnHttpResponse>> + Send;
}

static BUILT_IN_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// 基于 reqwest 的传输层
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: Option<reqwest::Client>) -> Self {
        let client = match client {
            Some(c) => c,
            None => BUILT_IN_CLIENT.get_or_init(reqwest::Client::new).clone(),
        };
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CdnTransport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<CdnHttpResponse> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(CdnHttpResponse { status, body })
    }
}

/// 从 CDN 获取视频地址
///
/// `cdn_base_url` 形如 `http://api.xuetangx.com/edx/video?s3_url=`，原始地址转义后直接拼接在后面。
/// 返回 `sources` 中的第一个地址。
///
/// - 未配置 `cdn_base_url`：返回 `Ok(None)`，不发请求
/// - 网络失败或超时：记录 info 日志，返回 `Ok(None)`
/// - 非 200：返回 `Ok(None)`
/// - 响应体不是预期的 JSON：返回 `Err`
pub async fn get_video_from_cdn<T: CdnTransport>(
    transport: &T,
    cdn_base_url: Option<&str>,
    original_video_url: &str,
) -> Result<Option<String>> {
    get_video_from_cdn_with_timeout(transport, cdn_base_url, original_video_url, CDN_REQUEST_TIMEOUT)
        .await
}

pub async fn get_video_from_cdn_with_timeout<T: CdnTransport>(
    transport: &T,
    cdn_base_url: Option<&str>,
    original_video_url: &str,
    timeout: Duration,
) -> Result<Option<String>> {
    let cdn_base_url = match cdn_base_url {
        Some(url) if !url.is_empty() => url,
        _ => return Ok(None),
    };

    let request_url = format!("{}{}", cdn_base_url, quote_lookup_url(original_video_url));

    let response = match transport.get(&request_url, timeout).await {
        Ok(resp) => resp,
        Err(e) => {
            info!("请求 CDN 服务器超时或失败: {} ({:#})", request_url, e);
            return Ok(None);
        }
    };

    if response.status != 200 {
        debug!("CDN 返回状态码 {}: {}", response.status, request_url);
        return Ok(None);
    }

    let cdn_content: CdnResponse = serde_json::from_slice(&response.body)
        .with_context(|| format!("解析 CDN 响应失败: {}", request_url))?;

    cdn_content
        .sources
        .into_iter()
        .next()
        .map(Some)
        .ok_or_else(|| anyhow!("CDN response has empty sources: {}", request_url))
}
