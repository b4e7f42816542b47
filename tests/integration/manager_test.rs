// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    catalog, entry, listing_page, test_settings, test_taxonomy, FailingFactory, StubFactory,
};
use jobradar::domain::models::company::SELECTOR_JOB_LINKS;
use jobradar::domain::models::job::CompanyTier;
use jobradar::workers::{ScrapeFilter, ScraperManager};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const ACME: &str = "https://careers.acme.example/jobs";
const GLOBEX: &str = "https://careers.globex.example/jobs";
const INITECH: &str = "https://careers.initech.example/jobs";

#[tokio::test]
async fn test_failing_destination_does_not_affect_others() {
    let page = listing_page("New Grad Software Engineer", "Seattle, WA");
    let factory = Arc::new(StubFactory::new(vec![(ACME, page.as_str()), (GLOBEX, page.as_str())]));

    let mut broken = entry(GLOBEX);
    broken
        .selectors
        .insert(SELECTOR_JOB_LINKS.to_string(), "a[".to_string());

    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(
            CompanyTier::BigTech,
            vec![("Acme", entry(ACME)), ("Globex", broken)],
        )]),
        test_taxonomy(),
        factory.clone(),
    );

    let results = manager.scrape_all(&ScrapeFilter::default()).await;
    assert_eq!(results.len(), 2);

    let acme = results.iter().find(|r| r.company == "Acme").unwrap();
    assert!(acme.success);
    assert_eq!(acme.jobs_found.len(), 1);

    let globex = results.iter().find(|r| r.company == "Globex").unwrap();
    assert!(!globex.success);
    assert!(globex.jobs_found.is_empty());
    assert_eq!(globex.errors.len(), 1);
    assert!(globex.errors[0].starts_with("Scraping failed: "));

    // every session is closed, including the failed one
    assert_eq!(factory.stats.closed.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_destination_yields_empty_success() {
    let page = listing_page("New Grad Software Engineer", "Seattle, WA");
    // GLOBEX has no page, so every fetch for it comes back empty
    let factory = Arc::new(StubFactory::new(vec![(ACME, page.as_str())]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(
            CompanyTier::BigTech,
            vec![("Acme", entry(ACME)), ("Globex", entry(GLOBEX))],
        )]),
        test_taxonomy(),
        factory.clone(),
    );

    let results = manager.scrape_all(&ScrapeFilter::default()).await;
    assert_eq!(results.len(), 2);

    let acme = results.iter().find(|r| r.company == "Acme").unwrap();
    assert!(acme.success);
    assert_eq!(acme.jobs_found.len(), 1);

    let globex = results.iter().find(|r| r.company == "Globex").unwrap();
    assert!(globex.success);
    assert!(globex.jobs_found.is_empty());
    assert!(globex.errors.is_empty());
    assert_eq!(factory.stats.started(), 2);
}

#[tokio::test]
async fn test_tier_filter_applies_before_company_filter() {
    let page = listing_page("New Grad Software Engineer", "Austin, TX");
    let factory = Arc::new(StubFactory::new(vec![
        (ACME, page.as_str()),
        (GLOBEX, page.as_str()),
        (INITECH, page.as_str()),
    ]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![
            (
                CompanyTier::BigTech,
                vec![("Acme", entry(ACME)), ("Globex", entry(GLOBEX))],
            ),
            (CompanyTier::FintechAndCrypto, vec![("Initech", entry(INITECH))]),
        ]),
        test_taxonomy(),
        factory,
    );

    let filter = ScrapeFilter {
        tiers: vec!["big_tech".to_string()],
        companies: vec!["Acme".to_string(), "Initech".to_string()],
        max_concurrent: None,
    };
    let results = manager.scrape_all(&filter).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].company, "Acme");
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_is_bounded() {
    let page = listing_page("New Grad Software Engineer", "Austin, TX");
    let urls: Vec<String> = (0..6)
        .map(|i| format!("https://careers.company{}.example/jobs", i))
        .collect();
    let factory = Arc::new(
        StubFactory::new(urls.iter().map(|u| (u.as_str(), page.as_str())).collect())
            .with_delay(Duration::from_millis(500)),
    );
    let names: Vec<String> = (0..6).map(|i| format!("Company{}", i)).collect();
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(
            CompanyTier::EnterpriseAndCloud,
            names
                .iter()
                .zip(urls.iter())
                .map(|(name, url)| (name.as_str(), entry(url)))
                .collect(),
        )]),
        test_taxonomy(),
        factory.clone(),
    );

    let filter = ScrapeFilter {
        max_concurrent: Some(2),
        ..Default::default()
    };
    let results = manager.scrape_all(&filter).await;

    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|r| r.success && r.jobs_found.len() == 1));
    assert_eq!(factory.stats.max_in_flight(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_concurrency_is_clamped() {
    let page = listing_page("New Grad Software Engineer", "Austin, TX");
    let factory = Arc::new(StubFactory::new(vec![(ACME, page.as_str())]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(CompanyTier::BigTech, vec![("Acme", entry(ACME))])]),
        test_taxonomy(),
        factory,
    );

    let filter = ScrapeFilter {
        max_concurrent: Some(0),
        ..Default::default()
    };
    assert_eq!(manager.scrape_all(&filter).await.len(), 1);
}

#[tokio::test]
async fn test_scrape_one_is_case_insensitive() {
    let page = listing_page("Entry Level Software Engineer", "Remote - US");
    let factory = Arc::new(StubFactory::new(vec![(ACME, page.as_str())]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(CompanyTier::BigTech, vec![("Acme", entry(ACME))])]),
        test_taxonomy(),
        factory,
    );

    let result = manager.scrape_one("acme").await;
    assert!(result.success);
    assert_eq!(result.company, "Acme");
    assert_eq!(result.jobs_found.len(), 1);
    assert!(result.jobs_found[0].is_remote);
}

#[tokio::test]
async fn test_scrape_one_not_found() {
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(CompanyTier::BigTech, vec![("Acme", entry(ACME))])]),
        test_taxonomy(),
        Arc::new(StubFactory::default()),
    );

    let result = manager.scrape_one("Hooli").await;
    assert!(!result.success);
    assert!(result.jobs_found.is_empty());
    assert_eq!(
        result.errors,
        vec!["Company 'Hooli' not found in configuration".to_string()]
    );
}

#[tokio::test]
async fn test_setup_failures() {
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(
            CompanyTier::BigTech,
            vec![("Acme", entry(ACME)), ("Globex", entry(GLOBEX))],
        )]),
        test_taxonomy(),
        Arc::new(FailingFactory),
    );

    // batch runs log and drop tasks that could not open a session
    assert!(manager.scrape_all(&ScrapeFilter::default()).await.is_empty());

    let result = manager.scrape_one("Acme").await;
    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("session pool exhausted"));
}

#[tokio::test]
async fn test_shutdown_before_run_skips_everything() {
    let page = listing_page("New Grad Software Engineer", "Austin, TX");
    let factory = Arc::new(StubFactory::new(vec![(ACME, page.as_str())]));
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![(CompanyTier::BigTech, vec![("Acme", entry(ACME))])]),
        test_taxonomy(),
        factory.clone(),
    );

    manager.shutdown_handle().trigger();
    assert!(manager.scrape_all(&ScrapeFilter::default()).await.is_empty());
    assert_eq!(factory.stats.started(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_lets_in_flight_scrape_finish() {
    let page = listing_page("New Grad Software Engineer", "Austin, TX");
    let factory = Arc::new(
        StubFactory::new(vec![(ACME, page.as_str()), (GLOBEX, page.as_str()), (INITECH, page.as_str())])
            .with_delay(Duration::from_secs(1)),
    );
    let manager = Arc::new(ScraperManager::new(
        &test_settings(),
        catalog(vec![(
            CompanyTier::BigTech,
            vec![
                ("Acme", entry(ACME)),
                ("Globex", entry(GLOBEX)),
                ("Initech", entry(INITECH)),
            ],
        )]),
        test_taxonomy(),
        factory.clone(),
    ));
    let shutdown = manager.shutdown_handle();

    let run = {
        let manager = manager.clone();
        tokio::spawn(async move {
            let filter = ScrapeFilter {
                max_concurrent: Some(1),
                ..Default::default()
            };
            manager.scrape_all(&filter).await
        })
    };

    while factory.stats.started() == 0 {
        tokio::task::yield_now().await;
    }
    shutdown.trigger();

    let results = run.await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(factory.stats.started(), 1);
}

#[test]
fn test_available_companies_and_tiers() {
    let manager = ScraperManager::new(
        &test_settings(),
        catalog(vec![
            (
                CompanyTier::BigTech,
                vec![("Acme", entry(ACME)), ("Globex", entry(GLOBEX))],
            ),
            (CompanyTier::TradingAndFinance, vec![("Initech", entry(INITECH))]),
        ]),
        test_taxonomy(),
        Arc::new(StubFactory::default()),
    );

    assert_eq!(
        manager.available_tiers(),
        vec![CompanyTier::BigTech, CompanyTier::TradingAndFinance]
    );
    let companies = manager.available_companies();
    assert_eq!(companies[0].1, vec!["Acme".to_string(), "Globex".to_string()]);
    assert_eq!(companies[1].1, vec!["Initech".to_string()]);
}
