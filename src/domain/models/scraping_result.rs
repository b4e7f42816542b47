// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::job::JobPosting;

/// 单个公司的抓取结果
///
/// 由一次抓取调用创建，交给汇总方后不再修改。
/// `success` 仅在抓取过程被未处理的错误中断时为 false，
/// 即使没有找到任何职位也为 true。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingResult {
    /// 公司名称
    pub company: String,
    /// 通过过滤的职位
    pub jobs_found: Vec<JobPosting>,
    /// 错误信息
    pub errors: Vec<String>,
    /// 抓取耗时
    #[serde(with = "duration_secs")]
    pub scraping_time: Duration,
    /// 是否成功
    pub success: bool,
}

impl ScrapingResult {
    /// 创建一个空的成功结果
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            jobs_found: Vec::new(),
            errors: Vec::new(),
            scraping_time: Duration::ZERO,
            success: true,
        }
    }

    /// 创建一个失败结果
    pub fn failure(company: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            success: false,
            ..Self::new(company)
        }
    }

    /// 配置中找不到公司时返回的结果
    pub fn not_found(company: &str) -> Self {
        Self::failure(
            company,
            format!("Company '{}' not found in configuration", company),
        )
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
