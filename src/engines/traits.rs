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

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// 传输错误类型
///
/// 非成功的HTTP状态码或网络故障，沿调用链向上传播
#[derive(Error, Debug)]
pub enum TransportError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },
    /// 无效URL
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// 无效请求头
    #[error("Invalid header {0}")]
    InvalidHeader(String),
}

impl TransportError {
    /// 获取错误对应的HTTP状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::UnexpectedStatus { status, .. } => Some(*status),
            TransportError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// 重定向策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectPolicy {
    /// 跟随所有重定向
    #[default]
    Follow,
    /// 遇到302时停下并把302响应交给调用方，其余重定向照常跟随
    StopOnFound,
}

/// 抓取请求
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 查询参数，按顺序追加到URL
    pub query: Vec<(String, String)>,
    /// 请求头
    pub headers: HashMap<String, String>,
    /// 超时时间，`None` 表示不设置超时
    pub timeout: Option<Duration>,
    /// 重定向策略
    pub redirects: RedirectPolicy,
}

impl FetchRequest {
    /// 创建一个不带查询参数的GET请求
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            timeout: None,
            redirects: RedirectPolicy::Follow,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn headers(mut self, headers: &HashMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn redirects(mut self, redirects: RedirectPolicy) -> Self {
        self.redirects = redirects;
        self
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// 请求的URL（含查询参数）
    pub url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub content: String,
}

impl FetchResponse {
    /// 状态码是否为2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// 非2xx状态码转换为 `TransportError::UnexpectedStatus`
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::UnexpectedStatus {
                url: self.url,
                status: self.status_code,
            })
        }
    }
}

/// 抓取引擎特质
///
/// 对外发HTTP GET的抽象，返回任意状态码的响应；状态码策略由调用方决定
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 执行抓取
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
