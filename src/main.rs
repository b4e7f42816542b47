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

use jobradar::config::catalog::load_catalog;
use jobradar::config::settings::Settings;
use jobradar::engines::fetcher::HttpFetcherFactory;
use jobradar::utils::telemetry;
use jobradar::workers::{ScrapeFilter, ScraperManager};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// 主函数
///
/// 加载配置和公司目录，并发抓取所有目标公司，把结果以JSON输出到stdout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting jobradar...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    let (catalog, taxonomy) = load_catalog(&settings.catalog.directory)?;
    info!("Configuration loaded");

    // 3. Build the manager
    let factory = Arc::new(HttpFetcherFactory::new(settings.clone()));
    let manager = ScraperManager::new(&settings, catalog, taxonomy, factory);

    let shutdown = manager.shutdown_handle();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                shutdown.trigger();
            }
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    });

    // 4. Scrape
    let filter = ScrapeFilter {
        tiers: settings.run.tiers.clone(),
        companies: settings.run.companies.clone(),
        max_concurrent: settings.run.max_concurrent,
    };
    let results = manager.scrape_all(&filter).await;

    let succeeded = results.iter().filter(|r| r.success).count();
    let jobs: usize = results.iter().map(|r| r.jobs_found.len()).sum();
    info!(
        companies = results.len(),
        succeeded,
        jobs,
        "Scraping complete"
    );
    for result in results.iter().filter(|r| !r.success) {
        error!(company = %result.company, errors = ?result.errors, "Company scrape failed");
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
