// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::config::settings::Settings;
use crate::engines::browser_engine::BrowserEngine;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{
    EngineError, FetcherFactory, PageDocument, PageFetcher, QueryParams,
};

/// 生产环境使用的页面抓取器
///
/// 普通请求走reqwest会话，需要渲染时才启动浏览器
pub struct HttpFetcher {
    http: ReqwestEngine,
    browser: BrowserEngine,
}

impl HttpFetcher {
    /// 创建抓取会话
    ///
    /// # 参数
    ///
    /// * `settings` - 应用配置
    ///
    /// # 返回值
    ///
    /// * `Ok(HttpFetcher)` - 创建成功，浏览器尚未启动
    /// * `Err(EngineError)` - HTTP客户端构建失败
    pub fn new(settings: &Settings) -> Result<Self, EngineError> {
        Ok(Self {
            http: ReqwestEngine::new(&settings.scraping)?,
            browser: BrowserEngine::new(
                settings.browser.clone(),
                Some(settings.scraping.user_agent.clone()),
            ),
        })
    }
}

/// 拼接查询参数
pub fn url_with_params(url: &str, params: &QueryParams) -> Result<Url, EngineError> {
    if params.is_empty() {
        return Ok(Url::parse(url)?);
    }
    Ok(Url::parse_with_params(url, params.iter())?)
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, params: &QueryParams) -> Option<PageDocument> {
        match self.http.get(url, params).await {
            Ok(doc) => doc,
            Err(e) if e.needs_dynamic_fallback() => {
                warn!(url, error = %e, "Plain fetch failed, falling back to browser rendering");
                self.fetch_dynamic(url, params).await
            }
            Err(e) => {
                warn!(url, error = %e, "Fetch failed");
                None
            }
        }
    }

    async fn fetch_dynamic(&self, url: &str, params: &QueryParams) -> Option<PageDocument> {
        let target = match url_with_params(url, params) {
            Ok(target) => target,
            Err(e) => {
                warn!(url, error = %e, "Invalid dynamic fetch address");
                return None;
            }
        };

        match self.browser.render(&target).await {
            Ok(doc) => {
                debug!(url = %target, bytes = doc.html.len(), "Rendered page");
                Some(doc)
            }
            Err(e) => {
                warn!(url = %target, error = %e, "Dynamic fetch failed");
                None
            }
        }
    }

    async fn close(&self) {
        self.browser.close().await;
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// 为每个抓取任务创建独立的 `HttpFetcher`
pub struct HttpFetcherFactory {
    settings: Arc<Settings>,
}

impl HttpFetcherFactory {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl FetcherFactory for HttpFetcherFactory {
    async fn open(&self) -> Result<Box<dyn PageFetcher>, EngineError> {
        Ok(Box::new(HttpFetcher::new(&self.settings)?))
    }
}
