// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{ancestors_below_body, parse_selector, select_text, JobBackend, MAX_CANDIDATES, UNKNOWN_LOCATION};
use crate::domain::models::company::CompanyConfig;
use crate::domain::models::job::JobPosting;
use crate::engines::traits::PageFetcher;
use crate::utils::errors::ScrapeError;
use crate::utils::url_utils::{absolutize, site_root};

const UNKNOWN_TITLE: &str = "Unknown Title";

/// 通用后端
///
/// 按配置的选择器查找职位链接，再向上寻找同时包含职位名称和地点的容器
#[derive(Debug, Default)]
pub struct GenericBackend;

struct ListingSelectors {
    links: Selector,
    title: Selector,
    location: Selector,
}

impl ListingSelectors {
    fn from_config(config: &CompanyConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            links: parse_selector(config.job_links_selector())?,
            title: parse_selector(config.job_title_selector())?,
            location: parse_selector(config.location_selector())?,
        })
    }
}

/// 从列表页解析职位
pub(crate) fn parse_listings(html: &str, config: &CompanyConfig) -> Result<Vec<JobPosting>, ScrapeError> {
    let selectors = ListingSelectors::from_config(config)?;
    let root = site_root(&config.careers_url)?;
    let document = Html::parse_document(html);

    let jobs = document
        .select(&selectors.links)
        .take(MAX_CANDIDATES)
        .filter_map(|link| {
            let container = ancestors_below_body(link).find(|e| {
                e.select(&selectors.title).next().is_some()
                    && e.select(&selectors.location).next().is_some()
            })?;
            Some(posting_from_container(container, &selectors, &root, config))
        })
        .filter(|job| !job.title.is_empty() && !job.url.is_empty())
        .collect();

    Ok(jobs)
}

fn posting_from_container(
    container: ElementRef<'_>,
    selectors: &ListingSelectors,
    root: &str,
    config: &CompanyConfig,
) -> JobPosting {
    let title = select_text(container, &selectors.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let url = container
        .select(&selectors.links)
        .next()
        .map(|link| absolutize(root, link.value().attr("href").unwrap_or_default()))
        .unwrap_or_default();
    let location =
        select_text(container, &selectors.location).unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

    JobPosting::unclassified(title, &config.name, location, url, config.tier)
}

#[async_trait]
impl JobBackend for GenericBackend {
    async fn extract(
        &self,
        fetcher: &dyn PageFetcher,
        config: &CompanyConfig,
    ) -> Result<Vec<JobPosting>, ScrapeError> {
        let Some(page) = fetcher.fetch(&config.careers_url, &config.search_params).await else {
            return Ok(Vec::new());
        };
        let jobs = parse_listings(&page.html, config)?;
        debug!(company = %config.name, count = jobs.len(), "Parsed generic listings");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "generic"
    }
}
