// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// 链接中注册号的标记
pub const REG_NUMBER_MARKER: &str = "regNumber=";

/// 注册号查询参数名
pub const REG_NUMBER_PARAM: &str = "regNumber";

/// 公告发布时间，字段缺失、文档无法解析或被跳过时为 `None`
pub type PublicationDate = Option<String>;

/// 搜索结果页请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchPageRequest {
    page_number: u32,
}

impl SearchPageRequest {
    /// 创建页请求，页码从1开始
    pub fn new(page_number: u32) -> Result<Self, PipelineError> {
        if page_number == 0 {
            return Err(PipelineError::InvalidPageNumber(page_number));
        }
        Ok(Self { page_number })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }
}

/// 公告结构化文档的URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeLink(String);

impl NoticeLink {
    /// 把注册号代入文档URL模板
    ///
    /// # 参数
    ///
    /// * `document_url` - 结构化文档端点（不含查询参数）
    /// * `reg_number` - 从搜索页链接中提取的注册号
    pub fn from_reg_number(document_url: &Url, reg_number: &str) -> Self {
        let mut url = document_url.clone();
        url.query_pairs_mut()
            .append_pair(REG_NUMBER_PARAM, reg_number);
        Self(url.to_string())
    }

    /// 取出 `href` 中最后一个 `regNumber=` 之后的全部内容
    pub fn reg_number_from_href(href: &str) -> Option<&str> {
        href.rfind(REG_NUMBER_MARKER)
            .map(|idx| &href[idx + REG_NUMBER_MARKER.len()..])
    }

    /// 读回链接中的注册号
    pub fn reg_number(&self) -> Option<String> {
        let url = Url::parse(&self.0).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == REG_NUMBER_PARAM)
            .map(|(_, v)| v.into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoticeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
