mod common;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use std::time::Duration;
use mirror_collector::domain::providers::{ResolveOptions, UrlResolver};
use mirror_collector::infrastructure::resolver::HttpResolver;

/// Site on 127.0.0.1 whose `/go` redirects to the same server under the
/// `localhost` name, so source and final domains differ.
async fn redirecting_site() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let app = Router::new()
        .route(
            "/go",
            get(|State(port): State<u16>| async move {
                Redirect::temporary(&format!("http://localhost:{port}/landing"))
            }),
        )
        .route("/hop", get(|| async { Redirect::temporary("/go") }))
        .route("/landing", get(|| async { "welcome" }))
        .route("/gone", get(|| async { Redirect::permanent("/missing") }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .with_state(port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

fn resolver() -> HttpResolver {
    HttpResolver::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_cross_domain_redirect_is_redirector() {
    let base = redirecting_site().await;
    let port = base.rsplit(':').next().unwrap().to_string();
    let source = format!("{base}/hop");

    let r = resolver().resolve(&source, &ResolveOptions::default()).await;

    assert!(r.ok);
    assert_eq!(r.final_url, format!("http://localhost:{port}/landing"));
    assert_eq!(r.source_domain, format!("127.0.0.1:{port}"));
    assert_eq!(r.final_domain, format!("localhost:{port}"));
    assert!(r.is_redirector);
    assert_eq!(r.redirect_chain.first(), Some(&source));
    assert_eq!(r.redirect_chain.last(), Some(&r.final_url));
}

#[tokio::test]
async fn test_same_host_redirect_to_error_page_still_resolves() {
    let base = redirecting_site().await;

    let r = resolver()
        .resolve(&format!("{base}/gone"), &ResolveOptions::default())
        .await;

    assert!(r.ok);
    assert_eq!(r.final_url, format!("{base}/missing"));
    assert!(!r.is_redirector);
    assert_eq!(r.redirect_chain.len(), 2);
}

#[tokio::test]
async fn test_no_redirect_chain_is_source_only() {
    let base = redirecting_site().await;
    let source = format!("{base}/landing");

    let r = resolver().resolve(&source, &ResolveOptions::default()).await;

    assert!(r.ok);
    assert_eq!(r.redirect_chain, vec![source.clone()]);
    assert_eq!(r.final_url, source);
}

#[tokio::test]
async fn test_redirect_loop_falls_back_to_source() {
    let base = redirecting_site().await;
    let source = format!("{base}/loop");

    let r = resolver().resolve(&source, &ResolveOptions::default()).await;

    assert!(!r.ok);
    assert_eq!(r.final_url, source);
    assert_eq!(r.redirect_chain, vec![source]);
    assert!(r.error.is_some());
}

#[tokio::test]
async fn test_unreachable_host_falls_back_to_source() {
    let source = "http://127.0.0.1:9/anything";

    let r = resolver().resolve(source, &ResolveOptions::default()).await;

    assert!(!r.ok);
    assert_eq!(r.final_url, source);
    assert_eq!(r.final_domain, "127.0.0.1:9");
    assert!(!r.is_redirector);
}
