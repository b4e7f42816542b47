// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{
    ancestors_below_body, contains_any, element_text, parse_selector, select_text, JobBackend,
    MAX_CANDIDATES, UNKNOWN_LOCATION,
};
use crate::domain::models::company::{CompanyConfig, SELECTOR_JOB_TITLE, SELECTOR_LOCATION};
use crate::domain::models::job::JobPosting;
use crate::engines::traits::PageFetcher;
use crate::utils::errors::ScrapeError;
use crate::utils::url_utils::{absolutize, site_root};

/// 候选元素选择器，按顺序尝试，第一个产生候选的选择器胜出
const CANDIDATE_SELECTORS: &[&str] = &[
    "div",
    r#"[data-track-name="job-click"]"#,
    r#"a[data-track-name="job-click"]"#,
    ".job-tile",
    ".job-card",
    "[data-job-id]",
    ".job-listing",
    r#"[role="listitem"]"#,
    "div[jsname]",
    r#"a[href*="/job"]"#,
];

const TITLE_FALLBACKS: &[&str] = &[
    "h3",
    "h2",
    "h4",
    r#"[data-automation="title"]"#,
    ".job-title",
    r#"a[data-track-name="job-click"]"#,
];

const LOCATION_FALLBACKS: &[&str] = &[
    r#"[data-automation="location"]"#,
    ".job-location",
    ".location",
];

/// 导航、分享等非职位元素的文本
const NAVIGATION_TEXT: &[&str] = &[
    "nav",
    "next",
    "previous",
    "send feedback",
    "copy link",
    "email a friend",
];

const TITLE_KEYWORDS: &[&str] = &[
    "software engineer",
    "data scientist",
    "research scientist",
    "product manager",
    "technical program manager",
];

/// 任职要求中的常见短语，出现时说明元素是资格描述而不是职位
const REQUIREMENT_PHRASES: &[&str] = &[
    "bachelor's degree",
    "phd degree",
    "master's degree",
    "years of experience",
    "equivalent practical experience",
    "experience in",
    "experience with",
    "knowledge of",
];

const LISTING_INDICATORS: &[&str] = &[
    "google",
    "university",
    "graduate",
    "phd",
    "campus",
    "new york",
    "california",
    "mountain view",
    "usa",
];

const MIN_CANDIDATE_TEXT: usize = 20;
const MIN_TITLE_LEN: usize = 10;
const SEARCH_TITLE_LEN: usize = 50;

static CANDIDATES: Lazy<Vec<Selector>> = Lazy::new(|| {
    CANDIDATE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static JOB_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"a[href*="/jobs/"]"#).unwrap());

/// Google Careers 后端
///
/// 页面由客户端渲染，因此总是走浏览器抓取，再用启发式规则从渲染结果中识别职位
#[derive(Debug, Default)]
pub struct GoogleCareersBackend;

/// 判断元素是否像一个职位条目
fn looks_like_listing(element: ElementRef<'_>) -> bool {
    if element.value().name() == "a"
        && element
            .value()
            .attr("href")
            .is_some_and(|href| href.contains("page="))
    {
        return false;
    }

    let text = element_text(element).to_lowercase();
    if text.chars().count() < MIN_CANDIDATE_TEXT || contains_any(&text, NAVIGATION_TEXT) {
        return false;
    }

    contains_any(&text, TITLE_KEYWORDS)
        && !contains_any(&text, REQUIREMENT_PHRASES)
        && contains_any(&text, LISTING_INDICATORS)
}

/// 第一个产生候选的选择器所匹配的元素
fn find_candidates(document: &Html) -> Vec<ElementRef<'_>> {
    for selector in CANDIDATES.iter() {
        let candidates: Vec<_> = document
            .select(selector)
            .filter(|e| looks_like_listing(*e))
            .collect();
        if !candidates.is_empty() {
            return candidates;
        }
    }
    Vec::new()
}

/// 元素本身、内部或祖先中的职位链接
fn find_job_href<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    if element.value().name() == "a" {
        return element.value().attr("href");
    }
    element
        .select(&JOB_LINK)
        .next()
        .or_else(|| ancestors_below_body(element).find_map(|a| a.select(&JOB_LINK).next()))
        .and_then(|link| link.value().attr("href"))
}

fn first_text(element: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|s| select_text(element, s))
}

fn search_url(root: &str, title: &str) -> String {
    let truncated: String = title.chars().take(SEARCH_TITLE_LEN).collect();
    format!("{}/jobs/results/?q={}", root, urlencoding::encode(&truncated))
}

/// 从渲染后的页面识别职位
pub(crate) fn parse_rendered(html: &str, config: &CompanyConfig) -> Result<Vec<JobPosting>, ScrapeError> {
    let root = site_root(&config.careers_url)?;

    let title_selectors = std::iter::once(config.selector(SELECTOR_JOB_TITLE, "h3"))
        .chain(TITLE_FALLBACKS.iter().copied())
        .map(parse_selector)
        .collect::<Result<Vec<_>, _>>()?;
    let location_selectors = std::iter::once(config.selector(SELECTOR_LOCATION, LOCATION_FALLBACKS[0]))
        .chain(LOCATION_FALLBACKS.iter().copied())
        .map(parse_selector)
        .collect::<Result<Vec<_>, _>>()?;

    let document = Html::parse_document(html);
    let jobs = find_candidates(&document)
        .into_iter()
        .take(MAX_CANDIDATES)
        .filter_map(|element| {
            let title = first_text(element, &title_selectors)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| element_text(element));
            if title.chars().count() <= MIN_TITLE_LEN {
                return None;
            }

            let location = first_text(element, &location_selectors)
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

            let url = match find_job_href(element).filter(|href| !href.is_empty()) {
                Some(href) => absolutize(&root, href),
                None => search_url(&root, &title),
            };

            Some(JobPosting::unclassified(title, &config.name, location, url, config.tier))
        })
        .collect();

    Ok(jobs)
}

#[async_trait]
impl JobBackend for GoogleCareersBackend {
    async fn extract(
        &self,
        fetcher: &dyn PageFetcher,
        config: &CompanyConfig,
    ) -> Result<Vec<JobPosting>, ScrapeError> {
        let Some(page) = fetcher
            .fetch_dynamic(&config.careers_url, &config.search_params)
            .await
        else {
            return Ok(Vec::new());
        };
        let jobs = parse_rendered(&page.html, config)?;
        debug!(company = %config.name, count = jobs.len(), "Parsed rendered Google Careers page");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "google_careers"
    }
}
