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

use crate::domain::models::{NoticeLink, PublicationDate, SourceProfile};
use crate::engines::traits::{FetchRequest, Fetcher, RedirectPolicy, TransportError};
use crate::utils::errors::DocumentError;
use crate::utils::xml;
use std::sync::Arc;
use tracing::{debug, warn};

/// 发布时间字段的标签名
pub const PUBLISH_DATE_TAG: &str = "publishDTInEIS";

/// HTTP 302 Found
const STATUS_FOUND: u16 = 302;

/// 该状态码是否按“公告不存在”处理
///
/// 门户对缺失的公告返回 302，这里把它当作缺失而不是错误。
pub fn is_redirect_treated_as_missing(status_code: u16) -> bool {
    status_code == STATUS_FOUND
}

/// 公告发布时间提取器
///
/// 抓取一份公告的结构化XML文档并读取发布时间字段
pub struct NoticeDateExtractor {
    fetcher: Arc<dyn Fetcher>,
    profile: Arc<SourceProfile>,
}

impl NoticeDateExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, profile: Arc<SourceProfile>) -> Self {
        Self { fetcher, profile }
    }

    /// 提取公告发布时间
    ///
    /// # 参数
    ///
    /// * `link` - 结构化文档URL
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(date))` - 找到发布时间
    /// * `Ok(None)` - 302、字段缺失或文档格式错误
    /// * `Err(TransportError)` - 网络错误或其他非成功状态码
    pub async fn extract_date(&self, link: &NoticeLink) -> Result<PublicationDate, TransportError> {
        let fetch = FetchRequest::get(link.as_str())
            .headers(&self.profile.headers)
            .timeout(self.profile.timeout)
            .redirects(if self.profile.follow_notice_redirects {
                RedirectPolicy::Follow
            } else {
                RedirectPolicy::StopOnFound
            });

        let response = self.fetcher.fetch(&fetch).await?;

        if is_redirect_treated_as_missing(response.status_code) {
            warn!(url = %link, status = response.status_code, "Notice not found");
            return Ok(None);
        }

        let response = response.error_for_status()?;

        match Self::parse_publication_date(&response.content) {
            Ok(date) => {
                debug!(url = %link, found = date.is_some(), "Parsed notice document");
                Ok(date)
            }
            Err(e) => {
                warn!(url = %link, error = %e, "Failed to parse notice XML");
                Ok(None)
            }
        }
    }

    /// 从XML文本中读取发布时间
    ///
    /// 先去掉所有元素的命名空间，再按文档顺序查找第一个 `publishDTInEIS` 后代元素。
    pub fn parse_publication_date(content: &str) -> Result<PublicationDate, DocumentError> {
        let root = xml::parse_document(content)?;

        Ok(root
            .find_descendant(PUBLISH_DATE_TAG)
            .and_then(|el| el.text.clone())
            .filter(|text| !text.is_empty()))
    }
}

#[cfg(test)]
#[path = "notice_date_extractor_test.rs"]
mod tests;
