// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 命名空间无关的XML元素树
//!
//! 先把整棵树的标签去掉 `{namespace-uri}` 前缀，再按本地名查找，
//! 不维护命名空间映射。

use crate::utils::errors::DocumentError;
use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::{Document, Node, ParsingOptions};
use std::borrow::Cow;

static NAMESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{.*?\}").unwrap());

/// 去掉命名空间后的元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// 去掉命名空间的标签名
    pub tag: String,
    /// 第一个子节点之前的文本
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

/// 删除标签中所有 `{...}` 形式的命名空间
pub fn strip_namespace(tag: &str) -> Cow<'_, str> {
    NAMESPACE_REGEX.replace_all(tag, "")
}

/// 解析XML文本并返回已去掉命名空间的根元素
///
/// # 返回值
///
/// * `Ok(XmlElement)` - 规范化后的根元素
/// * `Err(DocumentError::Malformed)` - 文档格式错误
pub fn parse_document(text: &str) -> Result<XmlElement, DocumentError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let document = Document::parse_with_options(text, options)?;
    Ok(normalize(document.root_element()))
}

fn normalize(node: Node<'_, '_>) -> XmlElement {
    let name = node.tag_name();
    let qualified = match name.namespace() {
        Some(ns) => format!("{{{}}}{}", ns, name.name()),
        None => name.name().to_string(),
    };

    let text = node
        .first_child()
        .filter(|child| child.is_text())
        .and_then(|child| child.text())
        .map(str::to_string);

    XmlElement {
        tag: strip_namespace(&qualified).into_owned(),
        text,
        children: node
            .children()
            .filter(|child| child.is_element())
            .map(normalize)
            .collect(),
    }
}

impl XmlElement {
    /// 深度优先（文档顺序）遍历全部元素，包含自身
    pub fn iter(&self) -> impl Iterator<Item = &XmlElement> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// 在后代元素中查找第一个标签匹配的元素，不包含自身
    pub fn find_descendant(&self, tag: &str) -> Option<&XmlElement> {
        self.iter().skip(1).find(|el| el.tag == tag)
    }
}
