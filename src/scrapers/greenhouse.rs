// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{contains_any, element_text, select_text, JobBackend, RELEVANT_KEYWORDS, UNSPECIFIED_LOCATION};
use crate::domain::models::company::CompanyConfig;
use crate::domain::models::job::JobPosting;
use crate::engines::traits::{PageFetcher, QueryParams};
use crate::utils::errors::ScrapeError;
use crate::utils::url_utils::resolve_url;

static OPENING: Lazy<Selector> = Lazy::new(|| Selector::parse("div.opening").unwrap());
static OPENING_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("a.opening-title").unwrap());
static LOCATION: Lazy<Selector> = Lazy::new(|| Selector::parse(".location").unwrap());
static DEPARTMENT: Lazy<Selector> = Lazy::new(|| Selector::parse(".department").unwrap());

/// Greenhouse 招聘页后端
#[derive(Debug, Default)]
pub struct GreenhouseBackend;

/// 解析 `div.opening` 职位块
pub(crate) fn parse_openings(html: &str, config: &CompanyConfig) -> Result<Vec<JobPosting>, ScrapeError> {
    let base = Url::parse(&config.careers_url)?;
    let document = Html::parse_document(html);

    let jobs = document
        .select(&OPENING)
        .filter_map(|opening| {
            let link = opening.select(&OPENING_TITLE).next()?;
            let title = element_text(link);
            let url = resolve_url(&base, link.value().attr("href").unwrap_or_default()).ok()?;
            let location =
                select_text(opening, &LOCATION).unwrap_or_else(|| UNSPECIFIED_LOCATION.to_string());
            let department = select_text(opening, &DEPARTMENT).unwrap_or_default();

            if !contains_any(&format!("{} {}", title, department), RELEVANT_KEYWORDS) {
                return None;
            }

            Some(
                JobPosting::unclassified(title, &config.name, location, url.to_string(), config.tier)
                    .with_description(department),
            )
        })
        .collect();

    Ok(jobs)
}

#[async_trait]
impl JobBackend for GreenhouseBackend {
    async fn extract(
        &self,
        fetcher: &dyn PageFetcher,
        config: &CompanyConfig,
    ) -> Result<Vec<JobPosting>, ScrapeError> {
        // Greenhouse boards list every opening without search params
        let Some(page) = fetcher.fetch(&config.careers_url, &QueryParams::new()).await else {
            return Ok(Vec::new());
        };
        let jobs = parse_openings(&page.html, config)?;
        debug!(company = %config.name, count = jobs.len(), "Parsed Greenhouse openings");
        Ok(jobs)
    }

    fn name(&self) -> &'static str {
        "greenhouse"
    }
}
