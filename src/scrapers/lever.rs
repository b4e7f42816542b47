// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use super::{contains_any, element_text, JobBackend, RELEVANT_KEYWORDS, UNSPECIFIED_LOCATION};
use crate::domain::models::company::CompanyConfig;
use crate::domain::models::job::JobPosting;
use crate::engines::traits::{PageFetcher, QueryParams};
use crate::utils::errors::ScrapeError;

/// Lever 站点的根地址，用于补全相对链接
const LEVER_ROOT: &str = "https://jobs.lever.co";

static POSTING: Lazy<Selector> = Lazy::new(|| Selector::parse(".posting").unwrap());
static TITLE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [".posting-title h5", "h5"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static LINK_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["a.posting-title", "a"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static CATEGORIES: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".posting-categories .sort-by-location, .sort-by-team").unwrap()
});

/// 标签文本包含这些词时视为地点
const LOCATION_WORDS: &[&str] = &[
    "office",
    "remote",
    "hybrid",
    "san francisco",
    "new york",
    "seattle",
    "austin",
];

/// 在通用关键词之外还接受的团队名称
const EXTRA_RELEVANT_KEYWORDS: &[&str] = &["technology", "engineering", "technical"];

/// Lever 招聘页后端
#[derive(Debug, Default)]
pub struct LeverBackend;

fn is_relevant(title: &str, team: &str) -> bool {
    let text = format!("{} {}", title, team);
    contains_any(&text, RELEVANT_KEYWORDS) || contains_any(&text, EXTRA_RELEVANT_KEYWORDS)
}

/// 解析 `.posting` 职位块
pub(crate) fn parse_postings(html: &str, config: &CompanyConfig) -> Vec<JobPosting> {
    let document = Html::parse_document(html);

    document
        .select(&POSTING)
        .filter_map(|posting| {
            let title = TITLE_SELECTORS
                .iter()
                .find_map(|s| posting.select(s).next())
                .map(element_text)?;

            let url = LINK_SELECTORS
                .iter()
                .find_map(|s| posting.select(s).next())
                .and_then(|link| link.value().attr("href"))
                .map(|href| {
                    if href.starts_with('/') {
                        format!("{}{}", LEVER_ROOT, href)
                    } else {
                        href.to_string()
                    }
                })
                .unwrap_or_default();

            let mut location = UNSPECIFIED_LOCATION.to_string();
            let mut team = String::new();
            for tag in posting.select(&CATEGORIES) {
                let text = element_text(tag);
                if contains_any(&text, LOCATION_WORDS) {
                    location = text;
                } else {
                    team = text;
                }
            }

            if !is_relevant(&title, &team) {
                return None;
            }

            Some(
                JobPosting::unclassified(title, &config.name, location, url, config.tier)
                    .with_description(team),
            )
        })
        .collect()
}

#[async_trait]
impl JobBackend for LeverBackend {
    async fn extract(
        &self,
        fetcher: &dyn PageFetcher,
        config: &CompanyConfig,
    ) -> Result<Vec<JobPosting>, ScrapeError> {
        let Some(page) = fetcher.fetch(&config.careers_url, &QueryParams::new()).await else {
            return Ok(Vec::new());
        };
        let jobs = parse_postings(&page.html, config);
        debug!(company = %config.name, count = jobs.len(), "Parsed Lever postings");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "lever"
    }
}
