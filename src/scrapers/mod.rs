// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 职位抓取后端
//!
//! 每类招聘站点对应一个 [`JobBackend`]，由 [`router::BackendRouter`] 按地址选择，
//! [`scraper::Scraper`] 负责会话生命周期、限速和统一的过滤流程。

use async_trait::async_trait;
use ::scraper::{ElementRef, Selector};

use crate::domain::models::company::CompanyConfig;
use crate::domain::models::job::JobPosting;
use crate::engines::traits::PageFetcher;
use crate::utils::errors::ScrapeError;

pub mod generic;
pub mod google_careers;
pub mod greenhouse;
pub mod lever;
pub mod router;
pub mod scraper;

/// 每页最多处理的候选元素数
pub const MAX_CANDIDATES: usize = 20;

/// 缺省地点
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
/// 站点未给出地点时使用
pub const UNSPECIFIED_LOCATION: &str = "Not specified";

/// 与新毕业生技术岗位相关的关键词
pub const RELEVANT_KEYWORDS: &[&str] = &[
    "software",
    "engineer",
    "developer",
    "data",
    "machine learning",
    "ml",
    "ai",
    "artificial intelligence",
    "backend",
    "frontend",
    "full stack",
    "mobile",
    "ios",
    "android",
    "web",
    "systems",
    "platform",
    "infrastructure",
    "devops",
    "sre",
    "site reliability",
    "quantitative",
    "quant",
    "research",
    "scientist",
];

/// 职位抓取后端特质
///
/// 后端只负责把页面转换为未分类的职位列表，过滤和打分由 `Scraper` 完成
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// 抓取并解析职位
    ///
    /// # 参数
    ///
    /// * `fetcher` - 当前任务独占的页面抓取器
    /// * `config` - 公司配置
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<JobPosting>)` - 未分类的职位，页面抓取失败时为空
    /// * `Err(ScrapeError)` - 配置错误等无法继续的情况
    async fn extract(
        &self,
        fetcher: &dyn PageFetcher,
        config: &CompanyConfig,
    ) -> Result<Vec<JobPosting>, ScrapeError>;

    /// 后端名称
    fn name(&self) -> &'static str;
}

/// 解析配置中的选择器
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|_| ScrapeError::InvalidSelector(selector.to_string()))
}

/// 元素的文本内容，各文本片段去除首尾空白后以空格连接
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 第一个匹配元素的文本
pub(crate) fn select_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(element_text)
}

/// 不含 `body` 的祖先元素，由近及远
pub(crate) fn ancestors_below_body(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|e| e.value().name() != "body" && e.value().name() != "html")
}

/// 文本中是否包含任一关键词（不区分大小写）
pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let text = text.to_lowercase();
    keywords.iter().any(|kw| text.contains(kw))
}
