// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::JobBackend;
use crate::domain::models::company::CompanyConfig;
use crate::domain::models::job::{CompanyTier, JobPosting};
use crate::domain::models::scraping_result::ScrapingResult;
use crate::domain::services::job_matcher::JobMatcher;
use crate::domain::services::rate_limiter::RateLimiter;
use crate::engines::traits::{FetcherFactory, PageFetcher};
use crate::utils::errors::ScrapeError;
use crate::utils::url_utils::destination_of;

/// 类别分数的最低接受阈值（不含）
pub const MIN_CATEGORY_SCORE: f64 = 0.3;

/// 单个公司的抓取器
///
/// 持有独占的页面抓取会话。抓取结束后应调用 [`Scraper::close`]；
/// 任务被取消或异常退出时，抓取器的 `Drop` 负责回收浏览器进程。
pub struct Scraper {
    config: CompanyConfig,
    backend: Arc<dyn JobBackend>,
    fetcher: Box<dyn PageFetcher>,
    matcher: Arc<JobMatcher>,
    rate_limiter: Arc<RateLimiter>,
}

impl Scraper {
    /// 打开抓取会话
    ///
    /// # 参数
    ///
    /// * `config` - 公司配置
    /// * `backend` - 站点后端
    /// * `factory` - 抓取会话工厂
    /// * `matcher` - 共享的职位匹配器
    /// * `rate_limiter` - 共享的速率限制器
    ///
    /// # 返回值
    ///
    /// * `Ok(Scraper)` - 会话已就绪
    /// * `Err(ScrapeError)` - 会话创建失败
    pub async fn open(
        config: CompanyConfig,
        backend: Arc<dyn JobBackend>,
        factory: &dyn FetcherFactory,
        matcher: Arc<JobMatcher>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Result<Self, ScrapeError> {
        let fetcher = factory.open().await?;
        debug!(company = %config.name, fetcher = fetcher.name(), "Scraper opened");
        Ok(Self {
            config,
            backend,
            fetcher,
            matcher,
            rate_limiter,
        })
    }

    pub fn config(&self) -> &CompanyConfig {
        &self.config
    }

    /// 抓取并筛选职位
    ///
    /// 任何错误都会被记录在结果中，不会向上传播
    #[instrument(skip(self), fields(company = %self.config.name, backend = self.backend.name()))]
    pub async fn scrape_jobs(&self) -> ScrapingResult {
        let start = Instant::now();
        let mut result = ScrapingResult::new(&self.config.name);

        match self.run().await {
            Ok(jobs) => result.jobs_found = jobs,
            Err(e) => {
                warn!(error = %e, "Scraping failed");
                result.success = false;
                result.errors.push(format!("Scraping failed: {}", e));
            }
        }

        result.scraping_time = start.elapsed();
        info!(
            jobs = result.jobs_found.len(),
            success = result.success,
            elapsed_ms = result.scraping_time.as_millis() as u64,
            "Scrape finished"
        );
        result
    }

    async fn run(&self) -> Result<Vec<JobPosting>, ScrapeError> {
        let destination = destination_of(&self.config.careers_url)?;

        if self.rate_limiter.should_backoff(&destination).await {
            warn!(destination = %destination, "Request burst detected for destination");
        }
        self.rate_limiter.wait(&destination, None).await;

        let extracted = self
            .backend
            .extract(self.fetcher.as_ref(), &self.config)
            .await;
        self.rate_limiter.record_request(&destination).await;

        let raw = extracted?;
        let total = raw.len();
        let jobs = filter_postings(&self.matcher, self.config.tier, raw);
        debug!(extracted = total, accepted = jobs.len(), "Filtered postings");
        Ok(jobs)
    }

    /// 关闭抓取会话
    pub async fn close(self) {
        self.fetcher.close().await;
    }
}

/// 统一的筛选流程
///
/// 依次排除非美国地点、类别分数不超过阈值的职位和非应届生职位，
/// 通过的职位写入类别、分组，分数取类别分数与应届生分数的平均值
pub fn filter_postings(
    matcher: &JobMatcher,
    tier: CompanyTier,
    jobs: Vec<JobPosting>,
) -> Vec<JobPosting> {
    jobs.into_iter()
        .filter_map(|job| {
            if !matcher.is_us_location(&job.location) {
                return None;
            }

            let description = job.description.as_deref().unwrap_or("");
            let (category, category_score) = matcher.match_category(&job.title, description);
            let category = category.filter(|_| category_score > MIN_CATEGORY_SCORE)?;

            let (is_new_grad, new_grad_score) = matcher.is_new_grad(&job.title, description);
            if !is_new_grad {
                return None;
            }

            Some(job.classify(category, tier, (category_score + new_grad_score) / 2.0))
        })
        .collect()
}
