//! End-to-end runs: domains file in, database, results file and summary out

use crate::common::{create_test_config, html};
use address_scout::output::{load_statistics, DomainResult};
use address_scout::pipeline;
use address_scout::storage::{open_storage, RunStatus, Storage};
use address_scout::DomainStatus;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn site_with_address() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<p>Acme Widgets</p><a href="/contact">Contact</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html("<address>123 Main St, Springfield, IL 62704</address>"))
        .mount(&server)
        .await;
    server
}

async fn site_without_address() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>Nothing to see here.</p>"))
        .mount(&server)
        .await;
    server
}

async fn broken_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

async fn nominatim() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "123, Main St, Springfield, IL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "lat": "39.7817",
            "lon": "-89.6501",
            "display_name": "123, Main Street, Springfield, Illinois, 62704, United States"
        }])))
        .mount(&server)
        .await;
    server
}

fn write_domains(dir: &Path, servers: &[&MockServer]) {
    let mut contents = String::from("domain\n");
    for server in servers {
        contents.push_str(&server.address().to_string());
        contents.push('\n');
    }
    fs::write(dir.join("domains.txt"), contents).expect("Failed to write domains file");
}

fn read_results(dir: &Path) -> Vec<Value> {
    let raw = fs::read_to_string(dir.join("results.json")).expect("Missing results file");
    serde_json::from_str(&raw).expect("Results file is not JSON")
}

#[tokio::test]
async fn test_full_run_records_every_domain_in_order() {
    let dir = TempDir::new().unwrap();
    let with_address = site_with_address().await;
    let without_address = site_without_address().await;
    let broken = broken_site().await;
    let geocoder = nominatim().await;

    write_domains(dir.path(), &[&with_address, &without_address, &broken]);
    let config = create_test_config(dir.path(), Some(geocoder.uri()));

    let report = pipeline::run(&config, "hash", false).await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.recorded, 3);
    assert_eq!(report.already_recorded, 0);
    assert!(!report.interrupted);
    assert_eq!(report.statistics.reachable, 2);
    assert_eq!(report.statistics.with_addresses, 1);
    assert_eq!(report.statistics.no_address, 1);
    assert_eq!(report.statistics.unreachable, 1);
    assert_eq!(report.statistics.validated, 1);

    let rows = read_results(dir.path());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Domain"], with_address.address().to_string());
    assert_eq!(rows[0]["Status"], "Reachable");
    assert_eq!(rows[0]["Validated with GeoPy"][0]["postcode"], "62704");
    assert_eq!(rows[0]["Validated with GeoPy"][0]["latitude"], 39.7817);
    assert_eq!(rows[1]["Status"], "Reachable - No Addresses");
    assert_eq!(rows[1]["Validated with GeoPy"], "Not validated");
    assert_eq!(rows[2]["Status"], "Unreachable");
    assert!(rows[2]["URL"].as_str().unwrap().starts_with("=HYPERLINK(\"http://"));

    let summary = fs::read_to_string(dir.path().join("summary.md")).unwrap();
    assert!(summary.contains("# Address-Scout Run Summary"));

    let storage = open_storage(&dir.path().join("scout.db")).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert!(run.finished_at.is_some());
    assert_eq!(load_statistics(&storage, run.id).unwrap(), report.statistics);
}

#[tokio::test]
async fn test_geocoder_failure_keeps_domain_reachable() {
    let dir = TempDir::new().unwrap();
    let with_address = site_with_address().await;
    let geocoder = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&geocoder)
        .await;

    write_domains(dir.path(), &[&with_address]);
    let config = create_test_config(dir.path(), Some(geocoder.uri()));

    let report = pipeline::run(&config, "hash", false).await.unwrap();

    assert_eq!(report.statistics.with_addresses, 1);
    assert_eq!(report.statistics.validated, 0);
    let rows = read_results(dir.path());
    assert_eq!(rows[0]["Status"], "Reachable");
    assert_eq!(rows[0]["Validated with GeoPy"], "Not validated");
}

#[tokio::test]
async fn test_disabled_geocoder_is_never_called() {
    let dir = TempDir::new().unwrap();
    let with_address = site_with_address().await;

    write_domains(dir.path(), &[&with_address]);
    let config = create_test_config(dir.path(), None);

    let report = pipeline::run(&config, "hash", false).await.unwrap();

    assert_eq!(report.statistics.with_addresses, 1);
    assert_eq!(report.statistics.validated, 0);
}

/// Leaves an interrupted run in the database with position 0 already recorded
fn seed_interrupted_run(dir: &Path, domain: &str) -> i64 {
    let mut storage = open_storage(&dir.join("scout.db")).unwrap();
    let run_id = storage.create_run("hash").unwrap();
    let result = DomainResult::new(
        0,
        domain,
        format!("http://{}/", domain),
        DomainStatus::ReachableNoAddress,
    );
    storage.append_result(run_id, &result).unwrap();
    storage
        .update_run_status(run_id, RunStatus::Interrupted)
        .unwrap();
    run_id
}

#[tokio::test]
async fn test_resume_skips_recorded_domains() {
    let dir = TempDir::new().unwrap();
    let recorded = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<p>should not be fetched</p>"))
        .expect(0)
        .mount(&recorded)
        .await;
    let pending = site_without_address().await;

    write_domains(dir.path(), &[&recorded, &pending]);
    let run_id = seed_interrupted_run(dir.path(), &recorded.address().to_string());
    let config = create_test_config(dir.path(), None);

    let report = pipeline::run(&config, "hash", false).await.unwrap();

    assert_eq!(report.already_recorded, 1);
    assert_eq!(report.recorded, 1);
    assert_eq!(report.statistics.total, 2);

    let storage = open_storage(&dir.path().join("scout.db")).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.id, run_id);
    assert_eq!(run.status, RunStatus::Completed);

    let positions: Vec<usize> = storage
        .load_results(run_id)
        .unwrap()
        .iter()
        .map(|r| r.position)
        .collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(read_results(dir.path()).len(), 2);
}

#[tokio::test]
async fn test_fresh_run_ignores_unfinished_run() {
    let dir = TempDir::new().unwrap();
    let recorded = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>fetched again</p>"))
        .expect(1)
        .mount(&recorded)
        .await;

    write_domains(dir.path(), &[&recorded]);
    let old_run = seed_interrupted_run(dir.path(), &recorded.address().to_string());
    let config = create_test_config(dir.path(), None);

    let report = pipeline::run(&config, "hash", true).await.unwrap();
    assert_eq!(report.already_recorded, 0);
    assert_eq!(report.recorded, 1);

    let storage = open_storage(&dir.path().join("scout.db")).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_ne!(run.id, old_run);
    assert_eq!(storage.get_run(old_run).unwrap().status, RunStatus::Interrupted);
}

#[tokio::test]
async fn test_missing_domains_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), None);

    assert!(pipeline::run(&config, "hash", false).await.is_err());
    assert!(!dir.path().join("results.json").exists());
}
