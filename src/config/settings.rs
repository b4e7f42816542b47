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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 应用程序配置设置
///
/// 包含抓取、浏览器渲染、配置目录和运行过滤条件等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 抓取配置
    pub scraping: ScrapingSettings,
    /// 浏览器渲染配置
    pub browser: BrowserSettings,
    /// 公司目录与分类体系配置
    pub catalog: CatalogSettings,
    /// 运行过滤条件
    #[serde(default)]
    pub run: RunSettings,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingSettings {
    /// 同一站点两次请求的默认间隔（秒）
    pub rate_limit_delay: f64,
    /// 单次HTTP请求总超时（秒）
    pub request_timeout: u64,
    /// 默认并发抓取数
    pub concurrent_requests: usize,
    /// 请求使用的 User-Agent
    pub user_agent: String,
}

/// 浏览器渲染配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 窗口宽度
    pub window_width: u32,
    /// 窗口高度
    pub window_height: u32,
    /// 等待页面主体出现的时间（秒）
    pub implicit_wait: u64,
    /// 等待职位内容出现的最长时间（秒）
    pub content_wait_timeout: u64,
    /// 页面加载后的稳定等待（毫秒）
    pub settle_delay_ms: u64,
    /// 滚动到底部后的等待（毫秒）
    pub scroll_delay_ms: u64,
}

/// 配置目录设置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// 包含 companies.json 和 job_types.json 的目录
    pub directory: String,
}

/// 运行过滤条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunSettings {
    /// 只抓取这些分组
    #[serde(default)]
    pub tiers: Vec<String>,
    /// 只抓取这些公司
    #[serde(default)]
    pub companies: Vec<String>,
    /// 覆盖默认并发数
    pub max_concurrent: Option<usize>,
}

impl ScrapingSettings {
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.rate_limit_delay).unwrap_or(Duration::from_secs(2))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl BrowserSettings {
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait)
    }

    pub fn content_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.content_wait_timeout)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scraping: ScrapingSettings {
                rate_limit_delay: 2.0,
                request_timeout: 30,
                concurrent_requests: 5,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            browser: BrowserSettings {
                headless: true,
                window_width: 1920,
                window_height: 1080,
                implicit_wait: 10,
                content_wait_timeout: 15,
                settle_delay_ms: 5000,
                scroll_delay_ms: 2000,
            },
            catalog: CatalogSettings {
                directory: "config".to_string(),
            },
            run: RunSettings::default(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `JOBRADAR__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Scraping defaults
            .set_default("scraping.rate_limit_delay", 2.0)?
            .set_default("scraping.request_timeout", 30)?
            .set_default("scraping.concurrent_requests", 5)?
            .set_default("scraping.user_agent", DEFAULT_USER_AGENT)?
            // Browser defaults
            .set_default("browser.headless", true)?
            .set_default("browser.window_width", 1920)?
            .set_default("browser.window_height", 1080)?
            .set_default("browser.implicit_wait", 10)?
            .set_default("browser.content_wait_timeout", 15)?
            .set_default("browser.settle_delay_ms", 5000)?
            .set_default("browser.scroll_delay_ms", 2000)?
            .set_default("catalog.directory", "config")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("JOBRADAR")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("run.tiers")
                    .with_list_parse_key("run.companies")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
