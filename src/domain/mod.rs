// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：职位、公司配置、抓取结果和分类体系
/// - 服务（services）：职位匹配和速率限制
///
/// 领域层不依赖于任何抓取引擎或配置加载的具体实现。
pub mod models;
pub mod services;
