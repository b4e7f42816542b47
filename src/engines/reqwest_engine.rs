// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::ScrapingSettings;
use crate::engines::traits::{EngineError, PageDocument, QueryParams};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::StatusCode;
use std::time::Instant;
use tracing::debug;

/// HTTP抓取引擎
///
/// 基于reqwest实现，持有一个独立的HTTP会话（连接池和Cookie）
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建HTTP会话
    ///
    /// # 参数
    ///
    /// * `settings` - 抓取配置，提供 User-Agent 和请求总超时
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestEngine)` - 创建成功
    /// * `Err(EngineError)` - HTTP客户端构建失败
    pub fn new(settings: &ScrapingSettings) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert("DNT", HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .pool_max_idle_per_host(3)
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// 执行GET请求
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(PageDocument))` - 状态码为200
    /// * `Ok(None)` - 其他状态码
    /// * `Err(EngineError)` - 传输错误
    pub async fn get(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<Option<PageDocument>, EngineError> {
        let start = Instant::now();
        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().await?;

        let status = response.status();
        let final_url = response.url().to_string();
        if status != StatusCode::OK {
            debug!(url, status = status.as_u16(), "Non-success status");
            return Ok(None);
        }

        let html = response.text().await?;
        debug!(
            url,
            bytes = html.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(Some(PageDocument {
            url: final_url,
            status_code: status.as_u16(),
            html,
            rendered: false,
        }))
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
