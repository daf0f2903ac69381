//! Full startup sequence against a mocked SWAPI.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planets_cache::MemoryStore;
use planets_core::traits::PlanetRepository;
use planets_core::types::NewPlanet;
use planets_registry::MemoryRepository;
use planets_service::{Application, ServiceConfig};
use planets_swapi::{SwapiClient, SwapiConfig};

fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        swapi: SwapiConfig::new(format!("{}/api", server.uri())).with_timeout(5),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_failed_warmup_still_becomes_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let repository = Arc::new(MemoryRepository::new());
    let tatooine = repository
        .save(NewPlanet::new("Tatooine", "desert", "arid"))
        .await
        .unwrap();
    let source = Arc::new(SwapiClient::with_config(config.swapi.clone()).unwrap());

    let app = Application::build(&config, repository, Arc::new(MemoryStore::new()), source);
    let readiness = app.readiness();
    let running = app.start().await;
    running.wait_for_hooks().await;

    assert!(running.is_ready());
    assert!(readiness.load(std::sync::atomic::Ordering::SeqCst));
    assert!(running.warmer().last_report().is_none());
    assert_eq!(
        running.service().get_by_id(tatooine.id).await.unwrap(),
        Some(tatooine)
    );
}

#[tokio::test]
async fn test_warmup_seeds_appearances_from_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": format!("{}/api/planets/?page=2", server.uri()),
            "previous": null,
            "results": [
                { "name": "Tatooine", "films": ["f1", "f2", "f3", "f4", "f5"] },
                { "name": "Alderaan", "films": ["f1", "f6"] }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .and(wiremock::matchers::query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "previous": format!("{}/api/planets/", server.uri()),
            "results": [ { "name": "Stewjon", "films": [] } ]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    let running = Application::from_config(config_for(&server))
        .await
        .unwrap()
        .start()
        .await;
    running.wait_for_hooks().await;

    let report = running.warmer().last_report().unwrap();
    assert_eq!(report.records_fetched, 3);
    assert_eq!(report.entries_written, 3);
    assert_eq!(running.warmer().appearances("Tatooine").await.unwrap(), Some(5));
    assert_eq!(running.warmer().appearances("Stewjon").await.unwrap(), Some(0));
    assert!(running.service().get_by_name("Tatooine").await.unwrap().is_none());
}

#[tokio::test]
async fn test_disabled_warmup_never_calls_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ServiceConfig {
        warmup_enabled: false,
        ..config_for(&server)
    };
    let running = Application::from_config(config).await.unwrap().start().await;
    running.wait_for_hooks().await;

    assert!(running.is_ready());
}

#[tokio::test]
async fn test_slow_source_does_not_delay_readiness() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/planets/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "count": 1,
                    "next": null,
                    "previous": null,
                    "results": [ { "name": "Dagobah", "films": ["f2", "f3", "f6"] } ]
                }))
                .set_delay(Duration::from_millis(1500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    let running = Application::from_config(config_for(&server))
        .await
        .unwrap()
        .start()
        .await;

    assert!(running.is_ready());
    assert!(started.elapsed() < Duration::from_millis(1000));
    assert!(!running.hooks_finished());
    assert!(running.warmer().last_report().is_none());
    assert_eq!(running.warmer().appearances("Dagobah").await.unwrap(), None);

    let hoth = running
        .service()
        .save(NewPlanet::new("Hoth", "tundra", "frozen"))
        .await
        .unwrap();
    assert_eq!(running.service().get_by_name("Hoth").await.unwrap(), Some(hoth));

    running.wait_for_hooks().await;

    assert_eq!(running.warmer().last_report().unwrap().records_fetched, 1);
    assert_eq!(running.warmer().appearances("Dagobah").await.unwrap(), Some(3));
}

#[tokio::test]
async fn test_reads_after_writes_through_running_app() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let running = Application::from_config(config_for(&server))
        .await
        .unwrap()
        .start()
        .await;
    let service = running.service();

    let naboo = service
        .save(NewPlanet::new("Naboo", "grassy hills", "temperate"))
        .await
        .unwrap();
    assert_eq!(service.get_by_name("Naboo").await.unwrap(), Some(naboo.clone()));

    let kamino = service
        .save(NewPlanet::new("Kamino", "ocean", "temperate"))
        .await
        .unwrap();
    assert_eq!(service.get_by_name("Naboo").await.unwrap(), Some(naboo.clone()));
    assert_eq!(service.get_by_id(kamino.id).await.unwrap(), Some(kamino));

    assert!(service.delete(naboo.id).await.unwrap());
    assert!(service.get_by_name("Naboo").await.unwrap().is_none());
}
