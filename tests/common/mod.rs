#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use mirror_collector::application::services::{InteractiveService, MirrorService};
use mirror_collector::domain::collect_job::CollectJob;
use mirror_collector::domain::entities::{MirrorKey, NewMirror};
use mirror_collector::domain::providers::{ResolveOptions, SearchProvider, SearchQuery};
use mirror_collector::infrastructure::persistence::SqliteMirrorRepository;
use mirror_collector::infrastructure::resolver::PassiveResolver;
use mirror_collector::state::AppState;

/// Search provider answering every query with the same URLs and recording
/// what it was asked.
#[derive(Default)]
pub struct StaticSearch {
    urls: Vec<String>,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl StaticSearch {
    pub fn new(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &SearchQuery) -> Vec<String> {
        self.queries.lock().unwrap().push(query.clone());
        self.urls.iter().take(query.count).cloned().collect()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

pub fn new_mirror(merchant: &str, keyword: &str, source_url: &str, final_url: &str) -> NewMirror {
    let source_domain = mirror_collector::utils::url::domain_of(source_url);
    let final_domain = mirror_collector::utils::url::domain_of(final_url);
    NewMirror {
        key: MirrorKey {
            merchant: merchant.to_string(),
            country: "in".to_string(),
            keyword: keyword.to_string(),
            source_url: source_url.to_string(),
        },
        is_redirector: source_domain != final_domain,
        is_mirror: final_domain.contains(merchant),
        cta_found: false,
        source_domain,
        final_url: final_url.to_string(),
        final_domain,
    }
}

pub async fn create_test_mirror(
    pool: &SqlitePool,
    merchant: &str,
    country: &str,
    final_domain: &str,
    last_seen_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO mirrors (
            merchant, country, keyword, source_url, source_domain,
            final_url, final_domain, is_redirector, is_mirror, cta_found,
            first_seen_at, last_seen_at
        )
        VALUES (?1, ?2, 'kw', ?3, ?4, ?3, ?4, FALSE, TRUE, FALSE, ?5, ?5)
        RETURNING id
        "#,
    )
    .bind(merchant)
    .bind(country)
    .bind(format!("https://{final_domain}/"))
    .bind(final_domain)
    .bind(last_seen_at)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn create_test_state_with_search(
    pool: SqlitePool,
    search: Arc<dyn SearchProvider>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<CollectJob>) {
    let pool = Arc::new(pool);
    let (tx, rx) = mpsc::channel(queue_capacity);

    let mirror_repo = Arc::new(SqliteMirrorRepository::new(pool));
    let mirror_service = Arc::new(MirrorService::new(mirror_repo));
    let interactive_service = Arc::new(InteractiveService::new(
        search,
        Arc::new(PassiveResolver),
        ResolveOptions::default(),
    ));

    let state = AppState::new(mirror_service, interactive_service, tx);

    (state, rx)
}

pub fn create_test_state(pool: SqlitePool) -> (AppState, mpsc::Receiver<CollectJob>) {
    create_test_state_with_search(pool, Arc::new(StaticSearch::default()), 100)
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
