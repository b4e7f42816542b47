// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 职位匹配（job_matcher）：按分类体系为职位分类、打分和过滤
/// - 速率限制（rate_limiter）：按目标站点控制请求间隔并统计请求频率
pub mod job_matcher;
pub mod rate_limiter;
