// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 职位类别
///
/// 角色分类体系中的四个固定类别，名称与配置文件中的键一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    /// 软件工程
    SoftwareEngineering,
    /// 机器学习
    MachineLearning,
    /// 量化研究
    QuantitativeResearch,
    /// 数据科学
    DataScience,
}

impl JobCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::SoftwareEngineering => "software_engineering",
            JobCategory::MachineLearning => "machine_learning",
            JobCategory::QuantitativeResearch => "quantitative_research",
            JobCategory::DataScience => "data_science",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 公司分组
///
/// 公司所属的配置分组，用于过滤和统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyTier {
    BigTech,
    DataAndAi,
    MobilityAndTransport,
    SocialAndProfessional,
    TradingAndFinance,
    FintechAndCrypto,
    HardwareAndInfrastructure,
    EnterpriseAndCloud,
}

impl CompanyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyTier::BigTech => "big_tech",
            CompanyTier::DataAndAi => "data_and_ai",
            CompanyTier::MobilityAndTransport => "mobility_and_transport",
            CompanyTier::SocialAndProfessional => "social_and_professional",
            CompanyTier::TradingAndFinance => "trading_and_finance",
            CompanyTier::FintechAndCrypto => "fintech_and_crypto",
            CompanyTier::HardwareAndInfrastructure => "hardware_and_infrastructure",
            CompanyTier::EnterpriseAndCloud => "enterprise_and_cloud",
        }
    }
}

impl fmt::Display for CompanyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 职位信息实体
///
/// 由抓取器创建时处于未分类状态（类别为空、分数为0），
/// 经过分类步骤后被赋予类别、分组和匹配分数，此后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// 职位名称
    pub title: String,
    /// 公司名称
    pub company: String,
    /// 工作地点（原样保留抓取到的文本）
    pub location: String,
    /// 职位链接
    pub url: String,
    /// 职位类别，分类前为空
    pub category: Option<JobCategory>,
    /// 公司分组
    pub company_tier: CompanyTier,
    /// 职位描述或摘要
    pub description: Option<String>,
    /// 任职要求
    pub requirements: Vec<String>,
    /// 发布日期
    pub posted_date: Option<DateTime<Utc>>,
    /// 申请截止日期
    pub application_deadline: Option<DateTime<Utc>>,
    /// 薪资范围
    pub salary_range: Option<String>,
    /// 是否远程
    pub is_remote: bool,
    /// 是否混合办公
    pub is_hybrid: bool,
    /// 匹配分数，取值范围 [0.0, 1.0]
    pub match_score: f64,
    /// 发现时间
    pub found_at: DateTime<Utc>,
}

impl JobPosting {
    /// 创建一个未分类的职位
    ///
    /// 远程/混合办公标记根据地点文本推断
    pub fn unclassified(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        url: impl Into<String>,
        company_tier: CompanyTier,
    ) -> Self {
        let location = location.into();
        let location_lower = location.to_lowercase();
        let is_remote = ["remote", "work from home", "wfh", "telecommute"]
            .iter()
            .any(|kw| location_lower.contains(kw));
        let is_hybrid = location_lower.contains("hybrid");

        Self {
            title: title.into(),
            company: company.into(),
            location,
            url: url.into(),
            category: None,
            company_tier,
            description: None,
            requirements: Vec::new(),
            posted_date: None,
            application_deadline: None,
            salary_range: None,
            is_remote,
            is_hybrid,
            match_score: 0.0,
            found_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.is_empty() {
            self.description = Some(description);
        }
        self
    }

    /// 分类结果写入，分数被限制在 [0, 1]
    pub(crate) fn classify(mut self, category: JobCategory, tier: CompanyTier, score: f64) -> Self {
        self.category = Some(category);
        self.company_tier = tier;
        self.match_score = score.clamp(0.0, 1.0);
        self
    }
}
