// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod notice;
pub mod profile;
pub mod result_mapping;

pub use notice::{NoticeLink, PublicationDate, SearchPageRequest};
pub use profile::SourceProfile;
pub use result_mapping::ResultMapping;
