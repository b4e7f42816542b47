// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::catalog::CompanyCatalog;
use crate::config::settings::Settings;
use crate::domain::models::company::CompanyConfig;
use crate::domain::models::job::CompanyTier;
use crate::domain::models::scraping_result::ScrapingResult;
use crate::domain::models::taxonomy::RoleTaxonomy;
use crate::domain::services::job_matcher::JobMatcher;
use crate::domain::services::rate_limiter::RateLimiter;
use crate::engines::traits::FetcherFactory;
use crate::scrapers::router::BackendRouter;
use crate::scrapers::scraper::Scraper;
use crate::utils::errors::ScrapeError;

/// 批量抓取的过滤条件
#[derive(Debug, Clone, Default)]
pub struct ScrapeFilter {
    /// 只抓取这些分组，为空时不过滤
    pub tiers: Vec<String>,
    /// 只抓取这些公司（名称精确匹配），为空时不过滤
    pub companies: Vec<String>,
    /// 最大并发数，缺省时使用配置值
    pub max_concurrent: Option<usize>,
}

/// 关闭句柄
///
/// 触发后尚未开始抓取的任务直接退出，进行中的抓取会正常完成
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            info!("Shutdown requested, pending scrapes will be skipped");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

/// 等待关闭信号；发送端已释放时永远不会返回
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// 抓取任务共享的只读上下文
#[derive(Clone)]
struct ScrapeContext {
    matcher: Arc<JobMatcher>,
    rate_limiter: Arc<RateLimiter>,
    router: Arc<BackendRouter>,
    factory: Arc<dyn FetcherFactory>,
}

impl ScrapeContext {
    /// 打开会话、抓取并关闭会话
    async fn scrape(&self, config: CompanyConfig) -> Result<ScrapingResult, ScrapeError> {
        let backend = self.router.select(&config.careers_url);
        let scraper = Scraper::open(
            config,
            backend,
            self.factory.as_ref(),
            self.matcher.clone(),
            self.rate_limiter.clone(),
        )
        .await?;

        let result = scraper.scrape_jobs().await;
        scraper.close().await;
        Ok(result)
    }
}

/// 抓取管理器
///
/// 根据公司目录展开抓取任务，限制并发，汇总每个公司的结果
pub struct ScraperManager {
    catalog: Arc<CompanyCatalog>,
    context: ScrapeContext,
    default_concurrency: usize,
    shutdown: ShutdownHandle,
}

impl ScraperManager {
    /// 创建抓取管理器
    ///
    /// # 参数
    ///
    /// * `settings` - 应用配置，提供限速间隔和默认并发数
    /// * `catalog` - 公司目录
    /// * `taxonomy` - 角色分类体系
    /// * `factory` - 为每个任务创建抓取会话的工厂
    pub fn new(
        settings: &Settings,
        catalog: CompanyCatalog,
        taxonomy: RoleTaxonomy,
        factory: Arc<dyn FetcherFactory>,
    ) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            catalog: Arc::new(catalog),
            context: ScrapeContext {
                matcher: Arc::new(JobMatcher::new(taxonomy)),
                rate_limiter: Arc::new(RateLimiter::new(settings.scraping.rate_limit_delay())),
                router: Arc::new(BackendRouter::default()),
                factory,
            },
            default_concurrency: settings.scraping.concurrent_requests,
            shutdown: ShutdownHandle { tx: Arc::new(tx) },
        }
    }

    /// 替换后端路由器
    pub fn with_router(mut self, router: BackendRouter) -> Self {
        self.context.router = Arc::new(router);
        self
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.context.rate_limiter
    }

    /// 并发抓取所有匹配过滤条件的公司
    ///
    /// 先按分组过滤再按公司名称过滤。所有任务同时创建，由信号量限制同时进行的抓取数。
    /// 创建会话失败或异常终止的任务只记录日志，不产生结果。
    ///
    /// # 返回值
    ///
    /// 按完成顺序排列的抓取结果
    pub async fn scrape_all(&self, filter: &ScrapeFilter) -> Vec<ScrapingResult> {
        let mut configs = self.catalog.company_configs(&filter.tiers);
        if !filter.companies.is_empty() {
            configs.retain(|c| filter.companies.contains(&c.name));
        }

        let max_concurrent = filter
            .max_concurrent
            .unwrap_or(self.default_concurrency)
            .max(1);
        info!(
            companies = configs.len(),
            max_concurrent, "Starting scrape run"
        );

        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let mut tasks = JoinSet::new();

        for config in configs {
            let semaphore = semaphore.clone();
            let context = self.context.clone();
            let mut shutdown = self.shutdown.tx.subscribe();

            tasks.spawn(async move {
                let company = config.name.clone();
                let permit = tokio::select! {
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(p) => p,
                        Err(_) => return Ok(None),
                    },
                    _ = shutdown_requested(&mut shutdown) => {
                        debug!(company = %company, "Skipped after shutdown");
                        return Ok(None);
                    }
                };
                if *shutdown.borrow() {
                    debug!(company = %company, "Skipped after shutdown");
                    return Ok(None);
                }

                let result = context.scrape(config).await;
                drop(permit);
                result.map(Some).map_err(|e| (company, e))
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(Some(result))) => results.push(result),
                Ok(Ok(None)) => {}
                Ok(Err((company, e))) => {
                    error!(company = %company, error = %e, "Failed to start scraper");
                }
                Err(e) => error!("A scrape task failed: {:?}", e),
            }
        }

        let jobs: usize = results.iter().map(|r| r.jobs_found.len()).sum();
        info!(results = results.len(), jobs, "Scrape run finished");
        results
    }

    /// 抓取单个公司
    ///
    /// 公司名称不区分大小写。找不到公司或会话创建失败时返回失败结果。
    pub async fn scrape_one(&self, company_name: &str) -> ScrapingResult {
        let config = self
            .catalog
            .company_configs(&[])
            .into_iter()
            .find(|c| c.name.to_lowercase() == company_name.to_lowercase());

        let Some(config) = config else {
            warn!(company = company_name, "Company not found in catalog");
            return ScrapingResult::not_found(company_name);
        };

        let name = config.name.clone();
        match self.context.scrape(config).await {
            Ok(result) => result,
            Err(e) => {
                error!(company = %name, error = %e, "Failed to start scraper");
                ScrapingResult::failure(name, format!("Scraping failed: {}", e))
            }
        }
    }

    /// 按分组列出所有公司
    pub fn available_companies(&self) -> Vec<(CompanyTier, Vec<String>)> {
        self.catalog.companies_by_tier()
    }

    pub fn available_tiers(&self) -> Vec<CompanyTier> {
        self.catalog.tiers()
    }
}
