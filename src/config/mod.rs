// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 公司目录与分类体系
///
/// 读取 companies.json 和 job_types.json
pub mod catalog;

/// 配置模块
///
/// 处理应用程序的配置设置，包括抓取、浏览器渲染等配置
pub mod settings;
