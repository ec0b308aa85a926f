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

use crate::domain::models::{NoticeLink, SearchPageRequest, SourceProfile};
use crate::engines::traits::{FetchRequest, Fetcher, TransportError};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::info;
use url::Url;

/// 公告打印页链接选择器
static NOTICE_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href*='printForm/view.html?regNumber=']").unwrap());

/// 搜索固定使用的过滤参数
const FILTER_PARAM: (&str, &str) = ("fz44", "on");

/// 链接发现器
///
/// 抓取一页搜索结果，把公告详情链接改写为结构化文档URL
pub struct LinkDiscoverer {
    fetcher: Arc<dyn Fetcher>,
    profile: Arc<SourceProfile>,
}

impl LinkDiscoverer {
    /// 创建新的链接发现器
    ///
    /// # 参数
    ///
    /// * `fetcher` - HTTP抓取引擎
    /// * `profile` - 数据源配置
    pub fn new(fetcher: Arc<dyn Fetcher>, profile: Arc<SourceProfile>) -> Self {
        Self { fetcher, profile }
    }

    /// 发现一页搜索结果中的公告链接
    ///
    /// # 参数
    ///
    /// * `request` - 页请求
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<NoticeLink>)` - 按文档顺序排列的链接，可能为空
    /// * `Err(TransportError)` - 网络错误或非成功状态码
    pub async fn discover_links(
        &self,
        request: SearchPageRequest,
    ) -> Result<Vec<NoticeLink>, TransportError> {
        let fetch = FetchRequest::get(self.profile.search_url.as_str())
            .query(FILTER_PARAM.0, FILTER_PARAM.1)
            .query("pageNumber", request.page_number())
            .headers(&self.profile.headers)
            .timeout(self.profile.timeout);

        let response = self.fetcher.fetch(&fetch).await?.error_for_status()?;
        let links = Self::extract_links(&response.content, &self.profile.document_url);

        info!(
            page = request.page_number(),
            links = links.len(),
            "Discovered notice links"
        );

        Ok(links)
    }

    /// 从搜索结果HTML中提取链接
    ///
    /// # 参数
    ///
    /// * `html_content` - HTML内容
    /// * `document_url` - 结构化文档端点
    ///
    /// # 返回值
    ///
    /// 按文档顺序排列的公告链接
    pub fn extract_links(html_content: &str, document_url: &Url) -> Vec<NoticeLink> {
        let document = Html::parse_document(html_content);

        document
            .select(&NOTICE_ANCHOR)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(NoticeLink::reg_number_from_href)
            .map(|reg_number| NoticeLink::from_reg_number(document_url, reg_number))
            .collect()
    }
}

#[cfg(test)]
#[path = "link_discoverer_test.rs"]
mod tests;
