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

use std::sync::Arc;
use tender_dates::config::settings::Settings;
use tender_dates::domain::services::pipeline::PipelineOrchestrator;
use tender_dates::engines::reqwest_engine::ReqwestEngine;
use tender_dates::engines::traits::Fetcher;
use tender_dates::utils::telemetry;
use tracing::info;

/// 主函数
///
/// 加载配置，运行一次流水线，并把结果映射输出到stdout
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting tender-dates...");

    // 2. Load configuration
    let settings = Settings::new()?;
    let profile = Arc::new(settings.source_profile()?);
    let options = settings.pipeline_options()?;
    info!(
        search_url = %profile.search_url,
        pages = settings.source.page_count,
        "Configuration loaded"
    );

    // 3. Run pipeline
    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestEngine);
    let pipeline = PipelineOrchestrator::from_profile(fetcher, profile, options);
    let report = pipeline.run_with_report(settings.source.page_count).await?;

    // 4. Render result
    println!("{}", serde_json::to_string_pretty(&report.mapping)?);

    Ok(())
}
