// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：公告链接、发布时间、结果映射和数据源配置
/// - 服务（services）：链接发现、发布时间提取和流水线编排
pub mod models;
pub mod services;
