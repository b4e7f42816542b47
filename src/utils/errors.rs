// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

use crate::engines::traits::EngineError;

/// 配置目录错误类型
///
/// 配置文件缺失或无法解析，对整个运行是致命错误
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("无法读取配置文件 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析配置文件 {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("引擎错误: {0}")]
    Engine(#[from] EngineError),

    #[error("无效的选择器 '{0}'")]
    InvalidSelector(String),

    #[error("无效的URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
