// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

use super::job::JobCategory;

/// 单个类别的匹配规则
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleRules {
    /// 类别关键词
    #[serde(default)]
    pub keywords: Vec<String>,
    /// 应届生职位指示词
    #[serde(default)]
    pub new_grad_indicators: Vec<String>,
}

/// 角色分类体系
///
/// 类别按配置文件中的顺序保存，运行期间只读
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleTaxonomy {
    /// 目标角色，保持文档顺序
    #[serde(deserialize_with = "crate::utils::ordered_map::deserialize")]
    pub target_roles: Vec<(JobCategory, RoleRules)>,
    /// 全局排除关键词
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}

impl RoleTaxonomy {
    pub fn new(target_roles: Vec<(JobCategory, RoleRules)>, exclude_keywords: Vec<String>) -> Self {
        Self {
            target_roles,
            exclude_keywords,
        }
    }

    /// 所有类别的应届生指示词（不去重）
    pub fn all_new_grad_indicators(&self) -> impl Iterator<Item = &str> {
        self.target_roles
            .iter()
            .flat_map(|(_, rules)| rules.new_grad_indicators.iter().map(String::as_str))
    }
}
