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

use crate::engines::traits::{
    FetchRequest, FetchResponse, Fetcher, RedirectPolicy, TransportError,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::Instant;
use url::Url;

/// 单个请求最多跟随的重定向次数，与reqwest默认策略一致
const MAX_REDIRECTS: usize = 10;

/// 抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎
pub struct ReqwestEngine;

impl ReqwestEngine {
    /// 拼接查询参数，生成最终请求URL
    pub fn build_url(request: &FetchRequest) -> Result<Url, TransportError> {
        let mut url = Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &request.query {
                pairs.append_pair(k, v);
            }
        }

        Ok(url)
    }

    fn build_headers(request: &FetchRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (k, v) in &request.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|_| TransportError::InvalidHeader(k.clone()))?;
            let value =
                HeaderValue::from_str(v).map_err(|_| TransportError::InvalidHeader(k.clone()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    fn redirect_policy(redirects: RedirectPolicy) -> Policy {
        match redirects {
            RedirectPolicy::Follow => Policy::limited(MAX_REDIRECTS),
            RedirectPolicy::StopOnFound => Policy::custom(|attempt| {
                if attempt.status() == StatusCode::FOUND {
                    attempt.stop()
                } else if attempt.previous().len() >= MAX_REDIRECTS {
                    attempt.error("too many redirects")
                } else {
                    attempt.follow()
                }
            }),
        }
    }
}

#[async_trait]
impl Fetcher for ReqwestEngine {
    /// 执行HTTP GET
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 任意状态码的响应
    /// * `Err(TransportError)` - 网络层错误或请求构造错误
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        let url = Self::build_url(request)?;
        let headers = Self::build_headers(request)?;

        // Each request gets a fresh client, nothing is pooled across requests
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .redirect(Self::redirect_policy(request.redirects))
            .build()?;

        let start = Instant::now();
        let response = client.get(url.clone()).headers(headers).send().await?;

        let status_code = response.status().as_u16();
        let content = response.text().await?;

        tracing::debug!(
            url = %url,
            status = status_code,
            bytes = content.len(),
            response_time_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(FetchResponse {
            url: url.to_string(),
            status_code,
            content,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
