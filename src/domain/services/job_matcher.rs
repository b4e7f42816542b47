// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::domain::models::job::JobCategory;
use crate::domain::models::taxonomy::{RoleRules, RoleTaxonomy};

/// 资深职位排除模式（忽略大小写）
static EXCLUSION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(senior|sr\.)\s+",
        r"(?i)\blead\s+",
        r"(?i)\bprincipal\s+",
        r"(?i)\bstaff\s+",
        r"(?i)\bmanager\b",
        r"(?i)\bdirector\b",
        r"(?i)\bhead\s+of\b",
        r"(?i)\bvp\b|\bvice\s+president\b",
        r"(?i)\bchief\b",
        r"(?i)\b\d+\+?\s+years?\b",
        r"(?i)\bexperienced\b",
        r"(?i)\bseasoned\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// 表示未知地点的文本
const UNKNOWN_LOCATIONS: &[&str] = &["unknown location", "unknown", "n/a", ""];

const US_KEYWORDS: &[&str] = &[
    // States (abbreviated and full)
    "usa", "united states", "us", "america",
    "california", "ca", "new york", "ny", "texas", "tx", "florida", "fl",
    "washington", "wa", "oregon", "or", "colorado", "co", "illinois", "il",
    "massachusetts", "ma", "virginia", "va", "north carolina", "nc",
    "georgia", "ga", "ohio", "oh", "pennsylvania", "pa", "michigan", "mi",
    "arizona", "az", "nevada", "nv", "utah", "ut", "connecticut", "ct",
    "new jersey", "nj", "maryland", "md", "tennessee", "tn",
    // Major cities
    "san francisco", "los angeles", "seattle", "chicago", "boston",
    "new york city", "nyc", "austin", "denver", "atlanta", "miami",
    "san diego", "phoenix", "philadelphia", "dallas", "houston",
    "portland", "minneapolis", "detroit", "las vegas", "nashville",
    "raleigh", "durham", "richmond", "arlington", "alexandria",
    "palo alto", "mountain view", "menlo park", "santa clara",
    "cupertino", "sunnyvale", "fremont", "redmond", "bellevue",
    // Remote work
    "remote", "remote - us", "remote (us)", "work from home", "wfh",
    "remote - usa", "remote usa", "telecommute", "distributed",
];

const NON_US_KEYWORDS: &[&str] = &[
    "canada", "toronto", "vancouver", "montreal", "ottawa",
    "london", "uk", "united kingdom", "england", "scotland",
    "ireland", "dublin", "germany", "berlin", "munich",
    "france", "paris", "netherlands", "amsterdam", "sweden",
    "stockholm", "norway", "oslo", "denmark", "copenhagen",
    "australia", "sydney", "melbourne", "singapore", "japan",
    "tokyo", "china", "beijing", "shanghai", "india", "bangalore",
    "mumbai", "hyderabad", "israel", "tel aviv", "brazil",
    "mexico", "argentina", "poland", "warsaw", "czech republic",
    "prague", "ukraine", "kyiv", "romania", "bucharest",
];

/// 职位匹配器
///
/// 无状态的规则引擎，根据分类体系和应届生/排除规则为职位打分。
/// 最低接受阈值由调用方执行，不在匹配器内部。
#[derive(Debug, Clone)]
pub struct JobMatcher {
    taxonomy: RoleTaxonomy,
    exclude_keywords: HashSet<String>,
}

impl JobMatcher {
    pub fn new(taxonomy: RoleTaxonomy) -> Self {
        let exclude_keywords = taxonomy
            .exclude_keywords
            .iter()
            .map(|kw| kw.to_lowercase())
            .collect();
        Self {
            taxonomy,
            exclude_keywords,
        }
    }

    pub fn taxonomy(&self) -> &RoleTaxonomy {
        &self.taxonomy
    }

    /// 确定职位类别及置信度
    ///
    /// # 参数
    ///
    /// * `title` - 职位名称
    /// * `description` - 职位描述，可为空字符串
    ///
    /// # 返回值
    ///
    /// 得分最高的类别和分数；命中排除规则或所有类别得分为0时返回 `(None, 0.0)`
    pub fn match_category(&self, title: &str, description: &str) -> (Option<JobCategory>, f64) {
        let title_lower = title.to_lowercase();
        let desc_lower = description.to_lowercase();

        if self.should_exclude(&title_lower, &desc_lower) {
            return (None, 0.0);
        }

        let text = format!("{} {}", title_lower, desc_lower);
        let mut best_category = None;
        let mut best_score = 0.0;

        for (category, rules) in &self.taxonomy.target_roles {
            let score = Self::category_score(&text, rules);
            // Strict comparison keeps the first category on ties
            if score > best_score {
                best_score = score;
                best_category = Some(*category);
            }
        }

        (best_category, best_score)
    }

    /// 判断是否为适合应届生的职位
    ///
    /// 指示词在所有类别间汇总计数，分母为所有类别的指示词总数；
    /// 每个命中的排除关键词扣 0.2 分，最终分数不低于0。
    ///
    /// # 返回值
    ///
    /// `(分数 > 0.1, 分数)`
    pub fn is_new_grad(&self, title: &str, description: &str) -> (bool, f64) {
        let title_lower = title.to_lowercase();
        let desc_lower = description.to_lowercase();

        let mut hits = 0usize;
        let mut total = 0usize;
        for indicator in self.taxonomy.all_new_grad_indicators() {
            total += 1;
            let indicator = indicator.to_lowercase();
            if title_lower.contains(&indicator) || desc_lower.contains(&indicator) {
                hits += 1;
            }
        }

        let exclusion_penalty: f64 = self
            .exclude_keywords
            .iter()
            .filter(|kw| title_lower.contains(kw.as_str()) || desc_lower.contains(kw.as_str()))
            .map(|_| 2.0)
            .sum();

        let new_grad_score = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };
        let final_score = (new_grad_score - exclusion_penalty / 10.0).max(0.0);
        (final_score > 0.1, final_score)
    }

    /// 是否命中资深职位排除模式
    pub fn should_exclude(&self, title: &str, description: &str) -> bool {
        let text = format!("{} {}", title, description);
        EXCLUSION_PATTERNS.iter().any(|re| re.is_match(&text))
    }

    /// 判断地点是否在美国
    ///
    /// 非美国关键词优先于美国关键词检查，无法识别时默认返回 false
    pub fn is_us_location(&self, location: &str) -> bool {
        let location_lower = location.to_lowercase();
        if UNKNOWN_LOCATIONS.contains(&location_lower.as_str()) {
            return false;
        }

        if NON_US_KEYWORDS
            .iter()
            .any(|kw| location_lower.contains(kw))
        {
            return false;
        }

        US_KEYWORDS.iter().any(|kw| location_lower.contains(kw))
    }

    fn category_score(text: &str, rules: &RoleRules) -> f64 {
        let matched = rules
            .keywords
            .iter()
            .filter(|kw| text.contains(&kw.to_lowercase()))
            .count();
        let bonus = rules
            .new_grad_indicators
            .iter()
            .filter(|indicator| text.contains(&indicator.to_lowercase()))
            .count() as f64
            * 0.1;

        let base = if rules.keywords.is_empty() {
            0.0
        } else {
            matched as f64 / rules.keywords.len() as f64
        };
        (base + bonus).min(1.0)
    }
}
