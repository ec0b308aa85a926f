// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notice::{NoticeLink, PublicationDate};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// 链接到发布时间的映射
///
/// 按首次插入顺序保存；重复的链接保留原位置，值以最后一次写入为准
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultMapping {
    entries: Vec<(NoticeLink, PublicationDate)>,
    index: HashMap<NoticeLink, usize>,
}

impl ResultMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖一条记录
    pub fn insert(&mut self, link: NoticeLink, date: PublicationDate) {
        match self.index.get(&link) {
            Some(&pos) => self.entries[pos].1 = date,
            None => {
                self.index.insert(link.clone(), self.entries.len());
                self.entries.push((link, date));
            }
        }
    }

    /// 按位置一一对应地合并链接和提取结果
    pub fn from_aligned(links: Vec<NoticeLink>, dates: Vec<PublicationDate>) -> Self {
        debug_assert_eq!(links.len(), dates.len());
        links.into_iter().zip(dates).collect()
    }

    /// 查询链接对应的结果
    ///
    /// 外层 `None` 表示链接不存在，内层 `None` 表示发布时间缺失
    pub fn get(&self, link: &NoticeLink) -> Option<&PublicationDate> {
        self.index.get(link).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NoticeLink, &PublicationDate)> {
        self.entries.iter().map(|(link, date)| (link, date))
    }

    pub fn links(&self) -> impl Iterator<Item = &NoticeLink> {
        self.entries.iter().map(|(link, _)| link)
    }

    /// 有发布时间的记录数
    pub fn dated_count(&self) -> usize {
        self.entries.iter().filter(|(_, date)| date.is_some()).count()
    }
}

impl FromIterator<(NoticeLink, PublicationDate)> for ResultMapping {
    fn from_iter<I: IntoIterator<Item = (NoticeLink, PublicationDate)>>(iter: I) -> Self {
        let mut mapping = ResultMapping::new();
        for (link, date) in iter {
            mapping.insert(link, date);
        }
        mapping
    }
}

impl Serialize for ResultMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (link, date) in &self.entries {
            map.serialize_entry(link, date)?;
        }
        map.end()
    }
}
