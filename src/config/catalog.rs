// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::models::company::CompanyConfig;
use crate::domain::models::job::CompanyTier;
use crate::domain::models::taxonomy::RoleTaxonomy;
use crate::utils::errors::CatalogError;

/// 公司列表文件名
pub const COMPANIES_FILE: &str = "companies.json";
/// 分类体系文件名
pub const JOB_TYPES_FILE: &str = "job_types.json";

/// companies.json 中的单个公司条目
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyEntry {
    pub careers_url: String,
    #[serde(default)]
    pub search_params: BTreeMap<String, String>,
    #[serde(default)]
    pub selectors: BTreeMap<String, String>,
}

/// 按分组组织的公司目录
///
/// 分组与公司均保持配置文件中的顺序
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CompanyCatalog {
    #[serde(deserialize_with = "deserialize_tiers")]
    tiers: Vec<(CompanyTier, Vec<(String, CompanyEntry)>)>,
}

fn deserialize_tiers<'de, D>(
    deserializer: D,
) -> Result<Vec<(CompanyTier, Vec<(String, CompanyEntry)>)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(transparent)]
    struct Companies(
        #[serde(deserialize_with = "crate::utils::ordered_map::deserialize")]
        Vec<(String, CompanyEntry)>,
    );

    let tiers: Vec<(CompanyTier, Companies)> = crate::utils::ordered_map::deserialize(deserializer)?;
    Ok(tiers.into_iter().map(|(tier, c)| (tier, c.0)).collect())
}

impl CompanyCatalog {
    pub fn new(tiers: Vec<(CompanyTier, Vec<(String, CompanyEntry)>)>) -> Self {
        Self { tiers }
    }

    /// 展开为公司配置列表
    ///
    /// # 参数
    ///
    /// * `tier_filter` - 分组名称过滤，为空时不过滤
    pub fn company_configs(&self, tier_filter: &[String]) -> Vec<CompanyConfig> {
        self.tiers
            .iter()
            .filter(|(tier, _)| {
                tier_filter.is_empty() || tier_filter.iter().any(|t| t == tier.as_str())
            })
            .flat_map(|(tier, companies)| {
                companies.iter().map(move |(name, entry)| CompanyConfig {
                    name: name.clone(),
                    careers_url: entry.careers_url.clone(),
                    search_params: entry.search_params.clone(),
                    selectors: entry.selectors.clone(),
                    tier: *tier,
                })
            })
            .collect()
    }

    /// 按分组列出公司名称
    pub fn companies_by_tier(&self) -> Vec<(CompanyTier, Vec<String>)> {
        self.tiers
            .iter()
            .map(|(tier, companies)| {
                (
                    *tier,
                    companies.iter().map(|(name, _)| name.clone()).collect(),
                )
            })
            .collect()
    }

    pub fn tiers(&self) -> Vec<CompanyTier> {
        self.tiers.iter().map(|(tier, _)| *tier).collect()
    }
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, CatalogError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse { path, source })
}

/// 从配置目录加载公司目录和分类体系
///
/// # 返回值
///
/// * `Ok((CompanyCatalog, RoleTaxonomy))` - 加载成功
/// * `Err(CatalogError)` - 文件缺失或格式错误
pub fn load_catalog(directory: impl AsRef<Path>) -> Result<(CompanyCatalog, RoleTaxonomy), CatalogError> {
    let directory = directory.as_ref();
    let catalog: CompanyCatalog = read_json(directory.join(COMPANIES_FILE))?;
    let taxonomy: RoleTaxonomy = read_json(directory.join(JOB_TYPES_FILE))?;

    info!(
        directory = %directory.display(),
        tiers = catalog.tiers.len(),
        categories = taxonomy.target_roles.len(),
        "Catalog loaded"
    );

    Ok((catalog, taxonomy))
}
