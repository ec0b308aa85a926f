// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含公告链接、发布时间映射以及链接发现、时间提取和流水线服务
pub mod domain;

/// 引擎模块
///
/// 实现HTTP抓取引擎
pub mod engines;

/// 工具模块
///
/// 提供错误类型、XML处理和遥测功能
pub mod utils;
