// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{EngineError, PageDocument};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 判断页面是否出现职位相关文本
const CONTENT_READY_SCRIPT: &str = r#"
    (() => {
        const text = document.body ? document.body.innerText : "";
        return text.includes("Software") || text.includes("Engineer");
    })()
"#;

const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// 已启动的浏览器及其事件处理任务
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Browser's own Drop kills the child process
        self.handler.abort();
    }
}

/// 浏览器渲染引擎
///
/// 基于chromiumoxide实现。浏览器在第一次渲染时才启动，
/// 每个引擎实例独占自己的浏览器进程。
pub struct BrowserEngine {
    settings: BrowserSettings,
    user_agent: Option<String>,
    session: Mutex<Option<BrowserSession>>,
}

impl BrowserEngine {
    pub fn new(settings: BrowserSettings, user_agent: Option<String>) -> Self {
        Self {
            settings,
            user_agent,
            session: Mutex::new(None),
        }
    }

    async fn launch(&self) -> Result<BrowserSession, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(self.settings.window_width, self.settings.window_height)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.arg(format!("--user-agent={}", user_agent));
        }

        let config = builder.build().map_err(EngineError::Browser)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // Spawn a handler to process browser events
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        info!("Browser launched");
        Ok(BrowserSession { browser, handler })
    }

    /// 渲染页面并返回渲染后的文档
    ///
    /// 依次等待页面主体、职位内容（有超时）、稳定延迟、滚动到底部后的延迟
    pub async fn render(&self, url: &Url) -> Result<PageDocument, EngineError> {
        let mut guard = self.session.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        let session = guard
            .as_ref()
            .ok_or_else(|| EngineError::Browser("browser session unavailable".to_string()))?;

        let page = session
            .browser
            .new_page(url.as_str())
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        let result = self.capture(&page, url).await;
        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }
        result
    }

    async fn capture(&self, page: &Page, url: &Url) -> Result<PageDocument, EngineError> {
        if !poll_until(self.settings.implicit_wait(), || async move {
            page.find_element("body").await.is_ok()
        })
        .await
        {
            warn!(url = %url, "Timed out waiting for page body");
        }

        if !poll_until(self.settings.content_wait_timeout(), || async move {
            page.evaluate(CONTENT_READY_SCRIPT)
                .await
                .ok()
                .and_then(|r| r.into_value::<bool>().ok())
                .unwrap_or(false)
        })
        .await
        {
            debug!(url = %url, "Job content did not appear before timeout");
        }

        sleep(self.settings.settle_delay()).await;
        if let Err(e) = page.evaluate(SCROLL_TO_BOTTOM_SCRIPT).await {
            debug!("Scroll failed: {}", e);
        }
        sleep(self.settings.scroll_delay()).await;

        let html = page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());

        Ok(PageDocument {
            url: final_url,
            status_code: 200,
            html,
            rendered: true,
        })
    }

    /// 关闭浏览器（如果已启动）
    pub async fn close(&self) {
        let session = self.session.lock().await.take();
        if let Some(mut session) = session {
            if let Err(e) = session.browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = session.browser.wait().await {
                debug!("Failed to wait for browser exit: {}", e);
            }
            info!("Browser closed");
        }
    }
}

/// 在超时前反复检查条件
async fn poll_until<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(POLL_INTERVAL).await;
    }
}
