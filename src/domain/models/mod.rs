// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 职位（job）：抓取到的职位及其类别、分组
/// - 公司配置（company）：单个公司的抓取目标
/// - 抓取结果（scraping_result）：单个公司的抓取结果
/// - 分类体系（taxonomy）：目标角色的关键词与指示词
pub mod company;
pub mod job;
pub mod scraping_result;
pub mod taxonomy;
