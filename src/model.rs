use serde::{Deserialize, Serialize};

/// 视频模块中与播放源相关的元数据
///
/// 旧版课程按播放速度分别存放一个 YouTube ID。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoModule {
    #[serde(default)]
    pub youtube_id_0_75: Option<String>,
    #[serde(default)]
    pub youtube_id_1_0: Option<String>,
    #[serde(default)]
    pub youtube_id_1_25: Option<String>,
    #[serde(default)]
    pub youtube_id_1_5: Option<String>,
}

impl VideoModule {
    /// 按固定速度顺序 0.75、1.00、1.25、1.50 返回各档 ID
    pub fn youtube_ids(&self) -> [Option<&str>; 4] {
        [
            self.youtube_id_0_75.as_deref(),
            self.youtube_id_1_0.as_deref(),
            self.youtube_id_1_25.as_deref(),
            self.youtube_id_1_5.as_deref(),
        ]
    }
}

/// CDN 查询接口返回体
///
/// ```json
/// {
///     "sources": [
///         "http://cm12.c110.play.bokecc.com/flvs/ca/QxcVl/u39EQbA0Ra-20.mp4",
///         "http://bm1.42.play.bokecc.com/flvs/ca/QxcVl/u39EQbA0Ra-20.mp4"
///     ],
///     "s3_url": "http://s3.amazonaws.com/BESTech/CS169/download/CS169_v13_w5l2s3.mp4"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnResponse {
    pub sources: Vec<String>,
    #[serde(default)]
    pub s3_url: Option<String>,
}
