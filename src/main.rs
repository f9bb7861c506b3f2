use anyhow::{Result, bail};
use std::path::PathBuf;
use tracing::info;

use video_utils::app::config::AppConfig;
use video_utils::logger;
use video_utils::video::{ReqwestTransport, VideoSourceResolver};

// ============================================================================
// 命令行参数
// ============================================================================

struct Args {
    config_path: Option<PathBuf>,
    video_urls: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut config_path = None;
    let mut video_urls = Vec::new();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("--config 缺少文件路径"),
            },
            _ => video_urls.push(arg),
        }
    }

    if video_urls.is_empty() {
        bail!("用法: video_utils [--config <path>] <video_url>...");
    }

    Ok(Args { config_path, video_urls })
}

// ============================================================================
// 主函数
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let args = parse_args()?;
    let config = AppConfig::load(args.config_path.as_deref())?;
    info!(
        "🚀 CDN: {}, 临时链接凭证: {}",
        config.cdn.base_url.as_deref().unwrap_or("未配置"),
        if config.video_link_transience.credentials().is_some() { "已配置" } else { "未配置" }
    );

    let resolver = VideoSourceResolver::new(config, ReqwestTransport::default());
    for video_url in &args.video_urls {
        println!("{}", resolver.resolve(video_url).await);
    }

    Ok(())
}
