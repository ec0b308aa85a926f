// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// 数据源配置
///
/// 启动时从配置构建一次，之后只读，注入到每个组件中
#[derive(Debug, Clone)]
pub struct SourceProfile {
    /// 搜索结果页端点
    pub search_url: Url,
    /// 结构化文档端点（不含查询参数）
    pub document_url: Url,
    /// 每个请求都携带的固定请求头
    pub headers: HashMap<String, String>,
    /// 单个请求的超时时间，`None` 表示不超时
    pub timeout: Option<Duration>,
    /// 获取公告文档时是否连302也跟随；为 `false` 时只在302处停下
    pub follow_notice_redirects: bool,
}

impl SourceProfile {
    /// 以基础URL和默认路径创建配置，不带请求头
    pub fn new(search_url: Url, document_url: Url) -> Self {
        Self {
            search_url,
            document_url,
            headers: HashMap::new(),
            timeout: None,
            follow_notice_redirects: false,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}
