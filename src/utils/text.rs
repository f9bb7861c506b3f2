use urlencoding::encode;

/// 按路径规则转义 URL：保留字母数字、`_.-~` 以及 `/`，其余字符百分号编码
pub fn quote_path(raw: &str) -> String {
    raw.split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// CDN 查询参数中的原始地址：在 [`quote_path`] 基础上 `~` 也编码为 `%7E`，与查询服务约定一致
pub fn quote_lookup_url(raw: &str) -> String {
    quote_path(raw).replace('~', "%7E")
}

/// 按查询参数规则转义，`/` 也会被编码
pub fn quote_param(raw: &str) -> String {
    encode(raw).into_owned()
}
