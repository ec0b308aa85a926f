// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::Map;
use std::sync::Arc;
use tender_dates::config::settings::Settings;
use tender_dates::domain::services::pipeline::{PipelineOptions, PipelineOrchestrator};
use tender_dates::engines::reqwest_engine::ReqwestEngine;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SEARCH_PATH: &str = "/epz/order/extendedsearch/results.html";
pub const DOCUMENT_PATH: &str = "/epz/order/notice/printForm/viewXml.html";

/// 模拟的采购门户
pub struct TestPortal {
    pub server: MockServer,
}

#[allow(dead_code)]
impl TestPortal {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// 挂载一页搜索结果，每个注册号生成一个打印页链接
    pub async fn mount_search_page(&self, page: u32, reg_numbers: &[&str]) {
        let anchors: String = reg_numbers
            .iter()
            .map(|r| {
                format!(
                    r#"<div class="registry-entry"><a href="/epz/order/notice/printForm/view.html?regNumber={r}">Print</a><a href="/epz/order/notice/ea20/view/common-info.html?regNumber={r}">{r}</a></div>"#
                )
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("fz44", "on"))
            .and(query_param("pageNumber", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<html><body>{}</body></html>", anchors)),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_search_status(&self, page: u32, status: u16) {
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("pageNumber", page.to_string()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_notice(&self, reg_number: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(DOCUMENT_PATH))
            .and(query_param("regNumber", reg_number))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_notice_date(&self, reg_number: &str, date: Option<&str>) {
        let field = date
            .map(|d| format!("<publishDTInEIS>{}</publishDTInEIS>", d))
            .unwrap_or_default();
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ns3:export xmlns:ns3="http://zakupki.gov.ru/oos/export/1" xmlns="http://zakupki.gov.ru/oos/types/1">
  <ns3:epNotificationEF2020>
    <commonInfo><purchaseNumber>{}</purchaseNumber>{}</commonInfo>
  </ns3:epNotificationEF2020>
</ns3:export>"#,
            reg_number, field
        );
        self.mount_notice(reg_number, ResponseTemplate::new(200).set_body_string(body))
            .await;
    }

    pub fn document_link(&self, reg_number: &str) -> String {
        format!("{}{}?regNumber={}", self.uri(), DOCUMENT_PATH, reg_number)
    }

    /// 以旧部署的环境变量加载配置
    pub fn settings(&self, extra: &[(&str, &str)]) -> Settings {
        let mut vars: Map<String, String> = Map::new();
        vars.insert("BASE_URL".to_string(), self.uri());
        vars.insert("USER_AGENT".to_string(), "tender-dates-tests".to_string());
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        Settings::load(vars).expect("settings")
    }

    pub fn orchestrator(&self, options: PipelineOptions) -> PipelineOrchestrator {
        let profile = self.settings(&[]).source_profile().expect("profile");
        PipelineOrchestrator::from_profile(Arc::new(ReqwestEngine), Arc::new(profile), options)
    }
}
