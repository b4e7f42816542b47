// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供抓取任务的并发调度、取消和结果汇总
pub mod manager;

pub use manager::{ScrapeFilter, ScraperManager, ShutdownHandle};
