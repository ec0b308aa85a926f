// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 链接发现（link_discoverer）：从搜索结果页提取公告文档链接
/// - 发布时间提取（notice_date_extractor）：解析公告XML中的发布时间
/// - 流水线（pipeline）：逐页发现链接，再并发提取并合并结果
pub mod link_discoverer;
pub mod notice_date_extractor;
pub mod pipeline;

pub use link_discoverer::LinkDiscoverer;
pub use notice_date_extractor::{is_redirect_treated_as_missing, NoticeDateExtractor};
pub use pipeline::{
    DiscoveryPolicy, ExtractionPolicy, PipelineOptions, PipelineOrchestrator, PipelineReport,
    PipelineStage,
};
