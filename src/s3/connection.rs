use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::utils::text::{quote_param, quote_path};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

const DEFAULT_HOST: &str = "s3.amazonaws.com";

/// SigV4 预签名链接的最长有效期（7 天）
pub const MAX_V4_EXPIRES_IN: u64 = 604_800;

/// 预签名算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureVersion {
    /// 旧版查询串签名 (HMAC-SHA1)
    #[default]
    S3,
    /// AWS Signature Version 4 (HMAC-SHA256)
    S3v4,
}

/// 生成预签名 URL 的客户端
pub trait PresignUrl {
    fn generate_url(&self, expires_in: u64, method: &str, bucket: &str, key: &str) -> Result<String>;
}

/// S3 预签名客户端，只做本地签名计算，不发网络请求
#[derive(Debug, Clone)]
pub struct S3Connection {
    access_key: String,
    secret_key: String,
    signature_version: SignatureVersion,
    region: String,
    host: String,
    scheme: String,
}

impl S3Connection {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            signature_version: SignatureVersion::default(),
            region: "us-east-1".to_string(),
            host: DEFAULT_HOST.to_string(),
            scheme: "https".to_string(),
        }
    }

    pub fn with_signature_version(mut self, version: SignatureVersion) -> Self {
        self.signature_version = version;
        self
    }

    /// SigV4 使用的区域；默认 host 下同时切换到区域终端节点
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        if self.host == DEFAULT_HOST && self.region != "us-east-1" {
            self.host = format!("s3.{}.amazonaws.com", self.region);
        }
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// 指定签名时刻生成 URL
    pub fn generate_url_at(
        &self,
        expires_in: u64,
        method: &str,
        bucket: &str,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        match self.signature_version {
            SignatureVersion::S3 => self.presign_v2(expires_in, method, bucket, key, now),
            SignatureVersion::S3v4 => self.presign_v4(expires_in, method, bucket, key, now),
        }
    }

    /// 返回 `(host, 请求路径)`；bucket 名不适合作子域名时退回路径风格
    fn endpoint(&self, bucket: &str, key: &str) -> (String, String) {
        let quoted_key = quote_path(key);
        if is_dns_compatible(bucket) {
            (format!("{}.{}", bucket, self.host), format!("/{}", quoted_key))
        } else {
            (self.host.clone(), format!("/{}/{}", bucket, quoted_key))
        }
    }

    fn presign_v2(
        &self,
        expires_in: u64,
        method: &str,
        bucket: &str,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let expires = i64::try_from(expires_in)
            .ok()
            .and_then(|secs| now.timestamp().checked_add(secs))
            .ok_or_else(|| anyhow!("expires_in out of range: {}", expires_in))?;
        let (host, path) = self.endpoint(bucket, key);

        // StringToSign: 方法、Content-MD5、Content-Type、Expires、资源路径
        let auth_path = format!("/{}/{}", bucket, quote_path(key));
        let string_to_sign = format!("{}\n\n\n{}\n{}", method.to_uppercase(), expires, auth_path);

        let mut mac =
            HmacSha1::new_from_slice(self.secret_key.as_bytes()).map_err(|e| anyhow!("{}", e))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        Ok(format!(
            "{}://{}{}?Signature={}&Expires={}&AWSAccessKeyId={}",
            self.scheme,
            host,
            path,
            quote_param(&signature),
            expires,
            quote_param(&self.access_key)
        ))
    }

    fn presign_v4(
        &self,
        expires_in: u64,
        method: &str,
        bucket: &str,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        if expires_in > MAX_V4_EXPIRES_IN {
            return Err(anyhow!(
                "expires_in {} exceeds SigV4 limit of {} seconds",
                expires_in,
                MAX_V4_EXPIRES_IN
            ));
        }
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let (host, path) = self.endpoint(bucket, key);

        let scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region);
        let credential = format!("{}/{}", self.access_key, scope);

        // 参数名已按字典序排列
        let query = format!(
            "X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Credential={}&X-Amz-Date={}&X-Amz-Expires={}&X-Amz-SignedHeaders=host",
            quote_param(&credential),
            amz_date,
            expires_in
        );

        let canonical_request = format!(
            "{}\n{}\n{}\nhost:{}\n\nhost\nUNSIGNED-PAYLOAD",
            method.to_uppercase(),
            path,
            query,
            host
        );

        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        // 派生签名密钥: date -> region -> service -> aws4_request
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, b"s3")?;
        let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
        let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes())?);

        Ok(format!(
            "{}://{}{}?{}&X-Amz-Signature={}",
            self.scheme, host, path, query, signature
        ))
    }
}

impl PresignUrl for S3Connection {
    fn generate_url(&self, expires_in: u64, method: &str, bucket: &str, key: &str) -> Result<String> {
        self.generate_url_at(expires_in, method, bucket, key, Utc::now())
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| anyhow!("{}", e))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// bucket 名能否直接作为 https 子域名
fn is_dns_compatible(bucket: &str) -> bool {
    (3..=63).contains(&bucket.len())
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !bucket.starts_with('-')
        && !bucket.ends_with('-')
}
