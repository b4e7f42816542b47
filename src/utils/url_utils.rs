// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 站点根地址，形如 `scheme://host[:port]`
pub fn site_root(url: &str) -> Result<String, ParseError> {
    let parsed = Url::parse(url)?;
    let host = parsed.host_str().ok_or(ParseError::EmptyHost)?;
    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// 限速使用的目标站点标识（主机名加端口）
pub fn destination_of(url: &str) -> Result<String, ParseError> {
    let parsed = Url::parse(url)?;
    let host = parsed.host_str().ok_or(ParseError::EmptyHost)?;
    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// 把页面上的链接补全为绝对地址
///
/// # 参数
///
/// * `root` - 站点根地址，见 [`site_root`]
/// * `href` - 页面上的原始链接
pub fn absolutize(root: &str, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("./") {
        return format!("{}/{}", root, rest);
    }
    if href.starts_with('/') {
        if let Ok(url) = Url::parse(root).and_then(|base| resolve_url(&base, href)) {
            return url.to_string();
        }
        return format!("{}{}", root, href);
    }
    format!("{}/{}", root, href)
}
