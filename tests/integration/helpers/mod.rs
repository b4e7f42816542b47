// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use jobradar::config::catalog::{CompanyCatalog, CompanyEntry};
use jobradar::config::settings::Settings;
use jobradar::domain::models::job::{CompanyTier, JobCategory};
use jobradar::domain::models::taxonomy::{RoleRules, RoleTaxonomy};
use jobradar::engines::traits::{EngineError, FetcherFactory, PageDocument, PageFetcher, QueryParams};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 共享的调用统计
#[derive(Debug, Default)]
pub struct FetchStats {
    pub started: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub dynamic_calls: AtomicUsize,
    pub closed: AtomicUsize,
}

impl FetchStats {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// 按地址返回固定页面的抓取器
pub struct StubFetcher {
    pages: Arc<HashMap<String, String>>,
    delay: Duration,
    stats: Arc<FetchStats>,
}

impl StubFetcher {
    async fn serve(&self, url: &str) -> Option<PageDocument> {
        self.stats.started.fetch_add(1, Ordering::SeqCst);
        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.pages.get(url).map(|html| PageDocument {
            url: url.to_string(),
            status_code: 200,
            html: html.clone(),
            rendered: false,
        })
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str, _params: &QueryParams) -> Option<PageDocument> {
        self.serve(url).await
    }

    async fn fetch_dynamic(&self, url: &str, _params: &QueryParams) -> Option<PageDocument> {
        self.stats.dynamic_calls.fetch_add(1, Ordering::SeqCst);
        self.serve(url).await
    }

    async fn close(&self) {
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// 创建 `StubFetcher` 的工厂
#[derive(Default)]
pub struct StubFactory {
    pages: Arc<HashMap<String, String>>,
    delay: Duration,
    pub stats: Arc<FetchStats>,
}

impl StubFactory {
    pub fn new(pages: Vec<(&str, &str)>) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            ),
            delay: Duration::ZERO,
            stats: Arc::new(FetchStats::default()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl FetcherFactory for StubFactory {
    async fn open(&self) -> Result<Box<dyn PageFetcher>, EngineError> {
        Ok(Box::new(StubFetcher {
            pages: self.pages.clone(),
            delay: self.delay,
            stats: self.stats.clone(),
        }))
    }
}

/// 总是失败的工厂
pub struct FailingFactory;

#[async_trait]
impl FetcherFactory for FailingFactory {
    async fn open(&self) -> Result<Box<dyn PageFetcher>, EngineError> {
        Err(EngineError::Other("session pool exhausted".to_string()))
    }
}

/// 不限速的测试配置
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.scraping.rate_limit_delay = 0.0;
    settings
}

pub fn test_taxonomy() -> RoleTaxonomy {
    let rules = |keywords: &[&str], indicators: &[&str]| RoleRules {
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        new_grad_indicators: indicators.iter().map(|s| s.to_string()).collect(),
    };
    RoleTaxonomy::new(
        vec![
            (
                JobCategory::SoftwareEngineering,
                rules(&["software", "engineer"], &["new grad", "graduate", "entry level"]),
            ),
            (
                JobCategory::MachineLearning,
                rules(&["machine learning"], &["new grad"]),
            ),
        ],
        vec!["senior".to_string()],
    )
}

pub fn entry(careers_url: &str) -> CompanyEntry {
    CompanyEntry {
        careers_url: careers_url.to_string(),
        search_params: BTreeMap::new(),
        selectors: BTreeMap::new(),
    }
}

pub fn catalog(tiers: Vec<(CompanyTier, Vec<(&str, CompanyEntry)>)>) -> CompanyCatalog {
    CompanyCatalog::new(
        tiers
            .into_iter()
            .map(|(tier, companies)| {
                (
                    tier,
                    companies
                        .into_iter()
                        .map(|(name, entry)| (name.to_string(), entry))
                        .collect(),
                )
            })
            .collect(),
    )
}

/// 通用后端可以解析的列表页
pub fn listing_page(title: &str, location: &str) -> String {
    format!(
        r#"<html><body>
             <ul>
               <li class="job">
                 <h3>{}</h3>
                 <span>{}</span>
                 <a href="/jobs/1">Apply</a>
               </li>
             </ul>
           </body></html>"#,
        title, location
    )
}
