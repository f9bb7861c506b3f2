use crate::model::VideoModule;

const YOUTUBE_SPEEDS: [&str; 4] = ["0.75", "1.00", "1.25", "1.50"];

/// 根据模块元数据生成 `速度:ID` 字符串，兼容旧版 XML 课程
///
/// 只输出存在 ID 的速度档，顺序固定，例如 `1.00:abc123,1.50:zzz999`。
pub fn create_youtube_string(module: &VideoModule) -> String {
    YOUTUBE_SPEEDS
        .iter()
        .zip(module.youtube_ids())
        .filter_map(|(speed, id)| match id {
            Some(id) if !id.is_empty() => Some(format!("{}:{}", speed, id)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ids_gives_empty_string() {
        assert_eq!(create_youtube_string(&VideoModule::default()), "");
    }

    #[test]
    fn test_only_present_speeds_in_fixed_order() {
        let module = VideoModule {
            youtube_id_1_5: Some("zzz999".to_string()),
            youtube_id_1_0: Some("abc123".to_string()),
            ..Default::default()
        };
        assert_eq!(create_youtube_string(&module), "1.00:abc123,1.50:zzz999");
    }

    #[test]
    fn test_empty_id_is_skipped() {
        let module = VideoModule {
            youtube_id_0_75: Some(String::new()),
            youtube_id_1_25: Some("mid".to_string()),
            ..Default::default()
        };
        assert_eq!(create_youtube_string(&module), "1.25:mid");
    }

    #[test]
    fn test_all_speeds() {
        let module = VideoModule {
            youtube_id_0_75: Some("a".to_string()),
            youtube_id_1_0: Some("b".to_string()),
            youtube_id_1_25: Some("c".to_string()),
            youtube_id_1_5: Some("d".to_string()),
        };
        assert_eq!(create_youtube_string(&module), "0.75:a,1.00:b,1.25:c,1.50:d");
    }
}
