// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供错误类型、XML规范化和遥测初始化
pub mod errors;
pub mod telemetry;
pub mod xml;
