// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置、公司目录和角色分类体系
pub mod config;

/// 领域模块
///
/// 包含职位、公司等核心实体以及匹配和限速服务
pub mod domain;

/// 引擎模块
///
/// 实现HTTP抓取和浏览器渲染
pub mod engines;

/// 抓取器模块
///
/// 各类招聘站点的解析后端及统一的筛选流程
pub mod scrapers;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现并发抓取的调度和结果汇总
pub mod workers;
