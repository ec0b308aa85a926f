// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::TransportError;
use thiserror::Error;

/// 文档解析错误类型
///
/// 由提取器在本地恢复，不会中断同批次的其他任务
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("XML文档格式错误: {0}")]
    Malformed(#[from] roxmltree::Error),
}

/// 流水线错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),

    #[error("无效页码: {0}")]
    InvalidPageNumber(u32),
}
