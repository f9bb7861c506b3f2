use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::s3::connection::SignatureVersion;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub cdn: CdnConfig,
    #[serde(default)]
    pub video_link_transience: VideoLinkTransience,
}

/// CDN 查询服务配置
#[derive(Debug, Deserialize, Clone)]
pub struct CdnConfig {
    /// 例如 `http://api.xuetangx.com/edx/video?s3_url=`，为空时不查询 CDN
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_cdn_timeout_ms")]
    pub timeout_ms: u64,
}

/// 临时视频链接的 S3 凭证
#[derive(Debug, Deserialize, Clone)]
pub struct VideoLinkTransience {
    #[serde(rename = "AWS_ACCESS_KEY", default)]
    pub aws_access_key: Option<String>,
    #[serde(rename = "AWS_SECRET_KEY", default)]
    pub aws_secret_key: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub signature_version: SignatureVersion,
    #[serde(default = "default_region")]
    pub region: String,
}

impl VideoLinkTransience {
    /// 两个凭证都存在且非空时返回 `(access_key, secret_key)`
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let access_key = self.aws_access_key.as_deref().filter(|v| !v.is_empty())?;
        let secret_key = self.aws_secret_key.as_deref().filter(|v| !v.is_empty())?;
        Some((access_key, secret_key))
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new("config.toml"));
        let mut cfg = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
            Self::from_toml(&raw)
                .with_context(|| format!("解析配置文件失败: {}", path.display()))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// 环境变量优先于配置文件，便于凭证不落盘
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VIDEO_CDN_BASE_URL") {
            self.cdn.base_url = Some(v);
        }
        if let Some(v) = lookup("VIDEO_LINK_TRANSIENCE_AWS_ACCESS_KEY") {
            self.video_link_transience.aws_access_key = Some(v);
        }
        if let Some(v) = lookup("VIDEO_LINK_TRANSIENCE_AWS_SECRET_KEY") {
            self.video_link_transience.aws_secret_key = Some(v);
        }
    }
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_cdn_timeout_ms(),
        }
    }
}

impl Default for VideoLinkTransience {
    fn default() -> Self {
        Self {
            aws_access_key: None,
            aws_secret_key: None,
            expires_in: default_expires_in(),
            signature_version: SignatureVersion::default(),
            region: default_region(),
        }
    }
}

fn default_cdn_timeout_ms() -> u64 {
    500
}

fn default_expires_in() -> u64 {
    crate::s3::transient::DEFAULT_EXPIRES_IN
}

fn default_region() -> String {
    "us-east-1".to_string()
}
