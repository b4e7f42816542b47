// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::job::CompanyTier;

/// 职位链接选择器的键
pub const SELECTOR_JOB_LINKS: &str = "job_links";
/// 职位名称选择器的键
pub const SELECTOR_JOB_TITLE: &str = "job_title";
/// 工作地点选择器的键
pub const SELECTOR_LOCATION: &str = "location";

/// 公司抓取目标配置
///
/// 每次运行时由配置目录生成，运行期间只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    /// 公司名称
    pub name: String,
    /// 招聘页面地址
    pub careers_url: String,
    /// 后端相关的查询参数
    pub search_params: BTreeMap<String, String>,
    /// 后端相关的DOM选择器，缺省时使用默认值
    pub selectors: BTreeMap<String, String>,
    /// 所属分组
    pub tier: CompanyTier,
}

impl CompanyConfig {
    /// 获取选择器，未配置时返回默认值
    pub fn selector<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.selectors.get(key).map(String::as_str).unwrap_or(default)
    }

    pub fn job_links_selector(&self) -> &str {
        self.selector(SELECTOR_JOB_LINKS, "a")
    }

    pub fn job_title_selector(&self) -> &str {
        self.selector(SELECTOR_JOB_TITLE, "h3")
    }

    pub fn location_selector(&self) -> &str {
        self.selector(SELECTOR_LOCATION, "span")
    }
}
