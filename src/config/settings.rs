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

use crate::domain::models::SourceProfile;
use crate::domain::services::pipeline::{DiscoveryPolicy, ExtractionPolicy, PipelineOptions};
use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::Duration;
use url::Url;

/// 环境变量前缀，例如 `TENDERS__SOURCE__BASE_URL`
pub const ENV_PREFIX: &str = "TENDERS";

/// 旧部署使用的扁平环境变量及其对应的配置键
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("BASE_URL", "SOURCE__BASE_URL"),
    ("PAGE_NUMBER", "SOURCE__PAGE_COUNT"),
    ("USER_AGENT", "HTTP__USER_AGENT"),
    ("ACCEPT_ENCODING", "HTTP__ACCEPT_ENCODING"),
    ("ACCEPT", "HTTP__ACCEPT"),
    ("CONNECTION", "HTTP__CONNECTION"),
];

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据源配置
    pub source: SourceSettings,
    /// HTTP请求配置
    pub http: HttpSettings,
    /// 流水线配置
    pub pipeline: PipelineSettings,
}

/// 数据源配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// 门户基础URL
    pub base_url: String,
    /// 搜索结果页路径
    pub search_path: String,
    /// 结构化文档路径
    pub document_path: String,
    /// 要处理的搜索页数
    pub page_count: u32,
}

/// HTTP请求配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub user_agent: Option<String>,
    pub accept_encoding: Option<String>,
    pub accept: Option<String>,
    pub connection: Option<String>,
    /// 单个请求超时时间（秒），不设置则不超时
    pub timeout_secs: Option<u64>,
    /// 获取公告文档时是否跟随重定向
    pub follow_notice_redirects: bool,
}

/// 流水线配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 提取阶段同时进行的请求上限，不设置则不限
    pub max_in_flight: Option<usize>,
    /// 同时请求的搜索页数，1 为逐页
    pub discovery_concurrency: usize,
    /// 提取失败处理策略
    pub extraction_policy: ExtractionPolicy,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从 `.env`、配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(std::env::vars().collect())
    }

    /// 从给定的环境变量集合加载配置
    pub fn load(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let env = vars
            .get("APP_ENVIRONMENT")
            .cloned()
            .unwrap_or_else(|| "default".to_string());

        let legacy: Map<String, String> = LEGACY_ENV_KEYS
            .iter()
            .filter_map(|(var, key)| vars.get(*var).map(|v| (key.to_string(), v.clone())))
            .collect();

        let builder = Config::builder()
            // Start with default settings
            .set_default("source.search_path", "/epz/order/extendedsearch/results.html")?
            .set_default("source.document_path", "/epz/order/notice/printForm/viewXml.html")?
            .set_default("source.page_count", 1)?
            .set_default("http.follow_notice_redirects", false)?
            .set_default("pipeline.discovery_concurrency", 1)?
            .set_default("pipeline.extraction_policy", "fail_fast")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .source(Some(legacy)),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(Some(vars)),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Message("source.base_url must not be empty".into()));
        }
        if self.pipeline.discovery_concurrency == 0 {
            return Err(ConfigError::Message(
                "pipeline.discovery_concurrency must be at least 1".into(),
            ));
        }
        if self.pipeline.max_in_flight == Some(0) {
            return Err(ConfigError::Message(
                "pipeline.max_in_flight must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let raw = format!("{}{}", self.source.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ConfigError::Message(format!("invalid URL {}: {}", raw, e)))
    }

    /// 构建只读的数据源配置
    pub fn source_profile(&self) -> Result<SourceProfile, ConfigError> {
        let mut profile = SourceProfile::new(
            self.endpoint(&self.source.search_path)?,
            self.endpoint(&self.source.document_path)?,
        );

        let headers = [
            ("User-Agent", &self.http.user_agent),
            ("Accept-Encoding", &self.http.accept_encoding),
            ("Accept", &self.http.accept),
            ("Connection", &self.http.connection),
        ];
        for (name, value) in headers {
            if let Some(value) = value {
                profile = profile.with_header(name, value);
            }
        }

        profile.timeout = self.http.timeout_secs.map(Duration::from_secs);
        profile.follow_notice_redirects = self.http.follow_notice_redirects;
        Ok(profile)
    }

    /// 构建流水线选项
    pub fn pipeline_options(&self) -> Result<PipelineOptions, ConfigError> {
        let pages_in_flight = NonZeroUsize::new(self.pipeline.discovery_concurrency).ok_or_else(
            || ConfigError::Message("pipeline.discovery_concurrency must be at least 1".into()),
        )?;

        Ok(PipelineOptions {
            discovery: DiscoveryPolicy::with_concurrency(pages_in_flight),
            extraction: self.pipeline.extraction_policy,
            max_in_flight: self.pipeline.max_in_flight.and_then(NonZeroUsize::new),
        })
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
