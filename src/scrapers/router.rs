// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::debug;

use super::generic::GenericBackend;
use super::google_careers::GoogleCareersBackend;
use super::greenhouse::GreenhouseBackend;
use super::lever::LeverBackend;
use super::JobBackend;

/// 后端路由器
///
/// 按招聘页地址中的子串选择后端，未匹配时使用通用后端
pub struct BackendRouter {
    /// 地址子串到后端的映射，按顺序匹配
    routes: Vec<(String, Arc<dyn JobBackend>)>,
    /// 默认后端
    fallback: Arc<dyn JobBackend>,
}

impl BackendRouter {
    /// 创建新的后端路由器
    ///
    /// # 参数
    ///
    /// * `routes` - 地址子串与后端的映射
    /// * `fallback` - 未匹配时使用的后端
    pub fn new(routes: Vec<(String, Arc<dyn JobBackend>)>, fallback: Arc<dyn JobBackend>) -> Self {
        Self { routes, fallback }
    }

    /// 选择后端
    ///
    /// # 参数
    ///
    /// * `careers_url` - 公司招聘页地址
    ///
    /// # 返回值
    ///
    /// 返回第一个地址子串匹配的后端，否则返回默认后端
    pub fn select(&self, careers_url: &str) -> Arc<dyn JobBackend> {
        let backend = self
            .routes
            .iter()
            .find(|(pattern, _)| careers_url.contains(pattern.as_str()))
            .map(|(_, backend)| backend.clone())
            .unwrap_or_else(|| self.fallback.clone());
        debug!(careers_url, backend = backend.name(), "Selected backend");
        backend
    }
}

impl Default for BackendRouter {
    fn default() -> Self {
        let greenhouse: Arc<dyn JobBackend> = Arc::new(GreenhouseBackend);
        let lever: Arc<dyn JobBackend> = Arc::new(LeverBackend);
        let google: Arc<dyn JobBackend> = Arc::new(GoogleCareersBackend);

        Self::new(
            vec![
                ("greenhouse.io".to_string(), greenhouse),
                ("jobs.lever.co".to_string(), lever.clone()),
                ("lever.co".to_string(), lever),
                ("careers.google.com".to_string(), google.clone()),
                ("google.com/about/careers".to_string(), google),
            ],
            Arc::new(GenericBackend),
        )
    }
}
