//! Crawl-level behavior against mock sites

use crate::common::{crawler, html};
use address_scout::crawler::CrawlLimits;
use address_scout::{extract, normalize, Locale, StructuredAddress};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn seed(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL")
}

#[tokio::test]
async fn test_failed_seed_never_follows_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"<a href="/contact">c</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html("<p>contact</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;

    assert!(output.is_unreachable());
    assert_eq!(output.pages_fetched, 0);
}

#[tokio::test]
async fn test_page_without_links_or_addresses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<h1>Welcome</h1><p>We make widgets.</p>"))
        .mount(&server)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;

    assert_eq!(output.pages_fetched, 1);
    let clean = normalize(output.text.as_deref());
    assert!(clean.is_some());
    assert!(extract(clean.as_deref()).is_none());
}

#[tokio::test]
async fn test_address_on_first_hop_page_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<p>Home</p><a href="/contact">Contact us</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html(
            "<footer><address>123 Main St, Springfield, IL 62704</address></footer>",
        ))
        .mount(&server)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;
    let clean = normalize(output.text.as_deref());
    let candidates = extract(clean.as_deref()).expect("Expected a candidate");

    assert_eq!(candidates.len(), 1);
    let candidate = candidates.iter().next().unwrap();
    assert_eq!(candidate.text, "123 Main St, Springfield, IL 62704");
    assert_eq!(candidate.locale, Locale::Us);

    let structured: Vec<StructuredAddress> = candidates.structured().into_iter().collect();
    assert_eq!(
        structured,
        vec![StructuredAddress {
            country: Some("USA".to_string()),
            region: Some("IL".to_string()),
            locality: Some("Springfield".to_string()),
            postcode: Some("62704".to_string()),
            street: Some("Main St".to_string()),
            house_number: Some("123".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_external_origins_are_never_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<a href="/about">About</a><a href="{}/partner">Partner</a>"#,
            other.uri()
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About</p>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("<p>PARTNER-BODY</p>"))
        .expect(0)
        .mount(&other)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;

    assert_eq!(output.pages_fetched, 2);
    assert!(!output.text.unwrap().contains("PARTNER-BODY"));
}

#[tokio::test]
async fn test_raw_href_dedup() {
    let server = MockServer::start().await;

    // "/about" twice is fetched once; "about" resolves to the same URL but is a
    // different raw href, so it is fetched again
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/about">A</a><a href="/about">A again</a><a href="about">A relative</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About</p>"))
        .expect(2)
        .mount(&server)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;

    assert_eq!(output.pages_fetched, 3);
}

#[tokio::test]
async fn test_non_html_links_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<p>Home</p><a href="/brochure.pdf">Brochure</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "123 Main St, Springfield, IL 62704",
            "application/pdf",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;

    assert_eq!(output.pages_fetched, 1);
    assert_eq!(output.pages_skipped, 1);
    let clean = normalize(output.text.as_deref());
    assert!(extract(clean.as_deref()).is_none());
}

#[tokio::test]
async fn test_failed_link_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<p>Home</p><a href="/broken">x</a><a href="/ok">y</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("<p>Still here</p>"))
        .mount(&server)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;

    assert_eq!(output.pages_fetched, 2);
    assert_eq!(output.pages_skipped, 1);
    assert!(output.text.unwrap().contains("Still here"));
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header(
            "user-agent",
            "TestScout/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(html("<p>hello</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let output = crawler(CrawlLimits::default())
        .crawl(&seed(&server), &CancellationToken::new())
        .await;

    assert!(!output.is_unreachable());
}
