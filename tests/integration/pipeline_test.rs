// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{catalog, entry, listing_page, test_settings, test_taxonomy, StubFactory};
use jobradar::domain::models::job::{CompanyTier, JobCategory};
use jobradar::engines::fetcher::HttpFetcherFactory;
use jobradar::scrapers::generic::GenericBackend;
use jobradar::scrapers::greenhouse::GreenhouseBackend;
use jobradar::scrapers::router::BackendRouter;
use jobradar::scrapers::JobBackend;
use jobradar::workers::{ScrapeFilter, ScraperManager};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACME: &str = "https://careers.acme.example/jobs";

#[tokio::test]
async fn test_new_grad_engineer_end_to_end() {
    let page = listing_page("New Grad Software Engineer", "Mountain View, CA");
    let factory = Arc::new(StubFactory::new(vec![(ACME, page.as_str())]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(CompanyTier::DataAndAi, vec![("Acme", entry(ACME))])]),
        test_taxonomy(),
        factory,
    );

    let results = manager.scrape_all(&ScrapeFilter::default()).await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.success);
    assert!(result.errors.is_empty());
    assert_eq!(result.jobs_found.len(), 1);

    let job = &result.jobs_found[0];
    assert_eq!(job.title, "New Grad Software Engineer");
    assert_eq!(job.location, "Mountain View, CA");
    assert_eq!(job.url, "https://careers.acme.example/jobs/1");
    assert_eq!(job.category, Some(JobCategory::SoftwareEngineering));
    assert_eq!(job.company_tier, CompanyTier::DataAndAi);
    assert!(job.match_score > 0.3 && job.match_score <= 1.0);
}

#[tokio::test]
async fn test_filtered_out_postings_leave_successful_empty_result() {
    let page = listing_page("Senior Software Engineer", "Toronto, Canada");
    let factory = Arc::new(StubFactory::new(vec![(ACME, page.as_str())]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(CompanyTier::BigTech, vec![("Acme", entry(ACME))])]),
        test_taxonomy(),
        factory,
    );

    let result = manager.scrape_one("Acme").await;
    assert!(result.success);
    assert!(result.jobs_found.is_empty());
}

#[tokio::test]
async fn test_google_careers_uses_dynamic_fetch() {
    const GOOGLE: &str = "https://careers.google.com/jobs/results/";
    let page = r#"
        <html><body>
          <ul>
            <li role="listitem">
              <a data-track-name="job-click" href="/jobs/results/42-software-engineer">
                <h3>Software Engineer, University Graduate</h3>
                <span class="location">Mountain View, CA, USA</span>
              </a>
            </li>
          </ul>
        </body></html>
    "#;
    let factory = Arc::new(StubFactory::new(vec![(GOOGLE, page)]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(CompanyTier::BigTech, vec![("Google", entry(GOOGLE))])]),
        test_taxonomy(),
        factory.clone(),
    );

    let result = manager.scrape_one("google").await;

    assert!(result.success);
    assert_eq!(factory.stats.dynamic_calls.load(Ordering::SeqCst), 1);
    assert!(!result.jobs_found.is_empty());
    let job = &result.jobs_found[0];
    assert_eq!(job.title, "Software Engineer, University Graduate");
    assert_eq!(
        job.url,
        "https://careers.google.com/jobs/results/42-software-engineer"
    );
    assert_eq!(job.category, Some(JobCategory::SoftwareEngineering));
}

#[tokio::test]
async fn test_greenhouse_board_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                 <div class="opening">
                   <a class="opening-title" href="/acme/jobs/7">Software Engineer, New Grad</a>
                   <span class="location">San Francisco, CA</span>
                   <span class="department">Engineering</span>
                 </div>
                 <div class="opening">
                   <a class="opening-title" href="/acme/jobs/8">Office Coordinator</a>
                   <span class="location">San Francisco, CA</span>
                 </div>
               </body></html>"#,
        ))
        .mount(&server)
        .await;

    let settings = Arc::new(test_settings());
    let careers_url = format!("{}/acme", server.uri());
    let greenhouse: Arc<dyn JobBackend> = Arc::new(GreenhouseBackend);
    let router = BackendRouter::new(
        vec![("127.0.0.1".to_string(), greenhouse)],
        Arc::new(GenericBackend),
    );
    let manager = ScraperManager::new(
        &settings,
        catalog(vec![(
            CompanyTier::FintechAndCrypto,
            vec![("Acme", entry(&careers_url))],
        )]),
        test_taxonomy(),
        Arc::new(HttpFetcherFactory::new(settings.clone())),
    )
    .with_router(router);

    let results = manager.scrape_all(&ScrapeFilter::default()).await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.jobs_found.len(), 1);
    let job = &result.jobs_found[0];
    assert_eq!(job.url, format!("{}/acme/jobs/7", server.uri()));
    assert_eq!(job.description.as_deref(), Some("Engineering"));
    assert_eq!(job.company_tier, CompanyTier::FintechAndCrypto);
    let destination = server.address().to_string();
    assert_eq!(
        manager
            .rate_limiter()
            .hourly_request_count(&destination)
            .await,
        1
    );
}
