// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use scraper::Html;
use std::collections::BTreeMap;
use std::error::Error as _;
use thiserror::Error;

/// 查询参数
pub type QueryParams = BTreeMap<String, String>;

/// 需要回退到浏览器渲染的传输错误特征
const DYNAMIC_FALLBACK_SIGNATURES: &[&str] = &[
    "header value is too long",
    "message head is too large",
    "headers too large",
    "brotli",
    "unsupported content encoding",
    "unsupported compression",
];

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 无效URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 完整的错误链文本（小写）
    fn chain_text(&self) -> String {
        let mut text = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            text.push_str(": ");
            text.push_str(&err.to_string());
            source = err.source();
        }
        text.to_lowercase()
    }

    /// 判断错误是否为已知的、可通过浏览器渲染绕过的传输错误
    ///
    /// # 返回值
    ///
    /// 响应头过大或压缩格式不受支持时返回true
    pub fn needs_dynamic_fallback(&self) -> bool {
        let text = self.chain_text();
        DYNAMIC_FALLBACK_SIGNATURES
            .iter()
            .any(|signature| text.contains(signature))
    }
}

/// 抓取到的页面
///
/// `scraper::Html` 不能跨 await 持有，因此保存原始HTML，需要查询时再解析
#[derive(Debug, Clone)]
pub struct PageDocument {
    /// 最终地址
    pub url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 页面HTML
    pub html: String,
    /// 是否经过浏览器渲染
    pub rendered: bool,
}

impl PageDocument {
    /// 解析为可用选择器查询的文档
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// 页面抓取器特质
///
/// 每个抓取器实例独占自己的网络会话和浏览器，不在并发任务间共享。
/// 无法恢复的抓取失败返回 `None` 而不是错误。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 普通HTTP抓取
    ///
    /// 遇到已知的传输错误特征时会自动改用 `fetch_dynamic`
    async fn fetch(&self, url: &str, params: &QueryParams) -> Option<PageDocument>;

    /// 浏览器渲染抓取
    ///
    /// 渲染客户端内容，在限定时间内等待内容就绪后返回渲染后的文档
    async fn fetch_dynamic(&self, url: &str, params: &QueryParams) -> Option<PageDocument>;

    /// 释放网络会话和浏览器
    async fn close(&self);

    /// 抓取器名称
    fn name(&self) -> &'static str;
}

/// 抓取器工厂特质
///
/// 为每个抓取任务打开一个独立的抓取会话
#[async_trait]
pub trait FetcherFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageFetcher>, EngineError>;
}
