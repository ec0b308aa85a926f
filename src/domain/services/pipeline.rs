// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::{
    NoticeLink, PublicationDate, ResultMapping, SearchPageRequest, SourceProfile,
};
use crate::domain::services::link_discoverer::LinkDiscoverer;
use crate::domain::services::notice_date_extractor::NoticeDateExtractor;
use crate::engines::traits::{Fetcher, TransportError};
use crate::utils::errors::PipelineError;
use futures::future::{join_all, try_join_all};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{info, warn};

/// 搜索页发现策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryPolicy {
    /// 逐页请求，上一页处理完才请求下一页
    #[default]
    Sequential,
    /// 最多同时请求n页，结果仍按页码顺序拼接
    Concurrent(NonZeroUsize),
}

impl DiscoveryPolicy {
    /// 由并发页数构建策略，1 表示逐页
    pub fn with_concurrency(pages_in_flight: NonZeroUsize) -> Self {
        if pages_in_flight.get() == 1 {
            DiscoveryPolicy::Sequential
        } else {
            DiscoveryPolicy::Concurrent(pages_in_flight)
        }
    }
}

/// 提取阶段的失败处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// 任一任务出错则整批失败
    #[default]
    FailFast,
    /// 每个任务独立记录结果，出错的链接记为缺失
    Isolated,
}

/// 流水线选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOptions {
    pub discovery: DiscoveryPolicy,
    pub extraction: ExtractionPolicy,
    /// 提取阶段同时进行的请求上限，`None` 表示不设上限
    pub max_in_flight: Option<NonZeroUsize>,
}

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Discovering,
    Extracting,
    Aggregating,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Discovering => "discovering",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Aggregating => "aggregating",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// 一次运行的结果
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub mapping: ResultMapping,
    /// `Isolated` 策略下失败的链接；`FailFast` 下始终为空
    pub failures: Vec<(NoticeLink, TransportError)>,
}

/// 流水线编排器
///
/// 先逐页发现链接，再并发提取每个链接的发布时间，最后按位置合并为映射
pub struct PipelineOrchestrator {
    discoverer: LinkDiscoverer,
    extractor: NoticeDateExtractor,
    options: PipelineOptions,
}

impl PipelineOrchestrator {
    pub fn new(
        discoverer: LinkDiscoverer,
        extractor: NoticeDateExtractor,
        options: PipelineOptions,
    ) -> Self {
        Self {
            discoverer,
            extractor,
            options,
        }
    }

    /// 用同一个抓取引擎和数据源配置构建两个组件
    pub fn from_profile(
        fetcher: Arc<dyn Fetcher>,
        profile: Arc<SourceProfile>,
        options: PipelineOptions,
    ) -> Self {
        Self::new(
            LinkDiscoverer::new(fetcher.clone(), profile.clone()),
            NoticeDateExtractor::new(fetcher, profile),
            options,
        )
    }

    /// 运行流水线
    ///
    /// # 参数
    ///
    /// * `page_count` - 要处理的搜索页数，页码为 1..=page_count
    ///
    /// # 返回值
    ///
    /// * `Ok(ResultMapping)` - 全部链接的发布时间
    /// * `Err(PipelineError)` - 任一页发现失败，或 `FailFast` 下任一提取失败
    pub async fn run(&self, page_count: u32) -> Result<ResultMapping, PipelineError> {
        Ok(self.run_with_report(page_count).await?.mapping)
    }

    /// 运行流水线并返回隔离策略下的失败明细
    pub async fn run_with_report(&self, page_count: u32) -> Result<PipelineReport, PipelineError> {
        info!(stage = %PipelineStage::Discovering, pages = page_count, "Pipeline started");
        let links = self.discover_all(page_count).await?;

        info!(stage = %PipelineStage::Extracting, links = links.len(), "All pages discovered");
        let (dates, failures) = match self.options.extraction {
            ExtractionPolicy::FailFast => (self.extract_fail_fast(&links).await?, Vec::new()),
            ExtractionPolicy::Isolated => self.extract_isolated(&links).await,
        };

        info!(stage = %PipelineStage::Aggregating, failures = failures.len(), "Extraction finished");
        let mapping = ResultMapping::from_aligned(links, dates);

        info!(
            stage = %PipelineStage::Done,
            entries = mapping.len(),
            dated = mapping.dated_count(),
            "Pipeline finished"
        );

        Ok(PipelineReport { mapping, failures })
    }

    /// 发现 1..=page_count 所有页的链接，按页码顺序拼接
    pub async fn discover_all(&self, page_count: u32) -> Result<Vec<NoticeLink>, PipelineError> {
        // Built lazily, page_count comes straight from configuration
        let requests = (1..=page_count).map(SearchPageRequest::new);

        let pages = match self.options.discovery {
            DiscoveryPolicy::Sequential => {
                let mut pages = Vec::new();
                for request in requests {
                    pages.push(self.discoverer.discover_links(request?).await?);
                }
                pages
            }
            DiscoveryPolicy::Concurrent(limit) => {
                stream::iter(requests)
                    .map(|request| async move {
                        Ok::<_, PipelineError>(self.discoverer.discover_links(request?).await?)
                    })
                    .buffered(limit.get())
                    .try_collect::<Vec<_>>()
                    .await?
            }
        };

        Ok(pages.into_iter().flatten().collect())
    }

    /// 全部成功才返回，任一失败则丢弃其他结果
    async fn extract_fail_fast(
        &self,
        links: &[NoticeLink],
    ) -> Result<Vec<PublicationDate>, TransportError> {
        let units = links.iter().map(|link| self.extractor.extract_date(link));

        // TODO: swap the buffered stream for a worker pool if per-host limits are needed
        match self.options.max_in_flight {
            None => try_join_all(units).await,
            Some(limit) => {
                stream::iter(units)
                    .buffered(limit.get())
                    .try_collect()
                    .await
            }
        }
    }

    /// 每个链接独立完成，失败的记为缺失并单独返回
    async fn extract_isolated(
        &self,
        links: &[NoticeLink],
    ) -> (Vec<PublicationDate>, Vec<(NoticeLink, TransportError)>) {
        let units = links.iter().map(|link| self.extractor.extract_date(link));

        let outcomes: Vec<Result<PublicationDate, TransportError>> =
            match self.options.max_in_flight {
                None => join_all(units).await,
                Some(limit) => stream::iter(units).buffered(limit.get()).collect().await,
            };

        let mut dates = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (link, outcome) in links.iter().zip(outcomes) {
            match outcome {
                Ok(date) => dates.push(date),
                Err(e) => {
                    warn!(url = %link, error = %e, "Extraction failed, recording as absent");
                    dates.push(None);
                    failures.push((link.clone(), e));
                }
            }
        }

        (dates, failures)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
