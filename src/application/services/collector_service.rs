//! Mirror collection orchestration.
//!
//! Drives the pipeline search → resolve → classify → upsert for every merchant
//! of a run. Runs are strictly sequential: keywords in configured order, URLs
//! in provider order, one network call at a time.
//!
//! Failures never escape a run. Each unit reports an explicit outcome
//! ([`UrlOutcome`], [`KeywordOutcome`], [`MerchantOutcome`]) and the
//! orchestrator folds those into a [`RunSummary`].

use std::sync::Arc;

use crate::domain::classifier::is_mirror;
use crate::domain::entities::{
    MerchantConfig, MerchantTally, MirrorKey, NewMirror, ResolveStrategy, RunMode, RunSummary,
    UpsertOutcome, default_merchants,
};
use crate::domain::providers::{ResolveOptions, SearchProvider, SearchQuery, UrlResolver};
use crate::domain::repositories::MirrorRepository;

/// Default budget of a full run.
pub const DEFAULT_ALL_LIMIT: usize = 50;
/// Default budget of a batch run.
pub const DEFAULT_BATCH_LIMIT: usize = 10;
/// Search language used by collection runs.
pub const SEARCH_LANG: &str = "en";

/// Outcome of one candidate URL.
pub type UrlOutcome = UpsertOutcome;

/// Outcome of one keyword search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordOutcome {
    /// The provider returned candidates; some may have been left unprocessed
    /// once the merchant budget was reached.
    Searched {
        candidates: usize,
        tally: MerchantTally,
    },
    /// Empty result list: nothing found, or the provider degraded.
    NoCandidates,
}

/// Outcome of one merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerchantOutcome {
    Processed(MerchantTally),
    Skipped { reason: &'static str },
}

impl MerchantOutcome {
    pub fn tally(&self) -> MerchantTally {
        match self {
            MerchantOutcome::Processed(tally) => *tally,
            MerchantOutcome::Skipped { .. } => MerchantTally::default(),
        }
    }
}

/// The resolvers a run can pick from.
#[derive(Clone)]
pub struct Resolvers {
    pub passive: Arc<dyn UrlResolver>,
    pub http: Arc<dyn UrlResolver>,
    pub browser: Arc<dyn UrlResolver>,
}

impl Resolvers {
    fn for_strategy(&self, strategy: ResolveStrategy) -> &dyn UrlResolver {
        match strategy {
            ResolveStrategy::Passive => self.passive.as_ref(),
            ResolveStrategy::Http => self.http.as_ref(),
            ResolveStrategy::Browser => self.browser.as_ref(),
        }
    }
}

/// Orchestrates collection runs.
pub struct CollectorService<M: MirrorRepository> {
    repository: Arc<M>,
    search: Arc<dyn SearchProvider>,
    resolvers: Resolvers,
    resolve_options: ResolveOptions,
}

impl<M: MirrorRepository> CollectorService<M> {
    pub fn new(repository: Arc<M>, search: Arc<dyn SearchProvider>, resolvers: Resolvers) -> Self {
        Self {
            repository,
            search,
            resolvers,
            resolve_options: ResolveOptions::default(),
        }
    }

    /// Options handed to the browser resolver when a run uses it.
    pub fn with_resolve_options(mut self, options: ResolveOptions) -> Self {
        self.resolve_options = options;
        self
    }

    /// Full run over the built-in merchants, without following redirects.
    pub async fn collect_all(&self, limit: usize) -> RunSummary {
        let configs = default_merchants();
        self.run(RunMode::All, &configs, limit, ResolveStrategy::Passive)
            .await
    }

    /// Run over caller-supplied merchants, resolving candidates with `strategy`.
    ///
    /// Only [`ResolveStrategy::Browser`] can click interstitial buttons, so it
    /// is the only strategy that stores `cta_found = true`.
    pub async fn collect_batch(
        &self,
        configs: Vec<MerchantConfig>,
        limit: usize,
        strategy: ResolveStrategy,
    ) -> RunSummary {
        self.run(RunMode::Batch, &configs, limit, strategy)
            .await
            .with_strategy(strategy)
    }

    async fn run(
        &self,
        mode: RunMode,
        configs: &[MerchantConfig],
        limit: usize,
        strategy: ResolveStrategy,
    ) -> RunSummary {
        let mut summary = RunSummary::new(mode, configs.len(), limit);

        for config in configs {
            let outcome = self.collect_for_merchant(config, limit, strategy).await;
            if let MerchantOutcome::Skipped { reason } = outcome {
                tracing::warn!(merchant = %config.merchant, "Merchant skipped: {}", reason);
            }
            summary.add(outcome.tally());
        }

        tracing::info!(
            mode = ?summary.mode,
            created = summary.created,
            updated = summary.updated,
            merchants = summary.merchants_count,
            limit,
            "Collection run finished"
        );

        summary
    }

    /// Processes one merchant under a budget of `limit` created+updated records.
    pub async fn collect_for_merchant(
        &self,
        config: &MerchantConfig,
        limit: usize,
        strategy: ResolveStrategy,
    ) -> MerchantOutcome {
        if !config.is_usable() {
            return MerchantOutcome::Skipped {
                reason: "blank merchant name or country",
            };
        }

        let quota = config.per_keyword_quota(limit);
        let mut tally = MerchantTally::default();

        for keyword in &config.keywords {
            if tally.used() >= limit {
                break;
            }

            let remaining = limit - tally.used();
            match self
                .collect_keyword(config, keyword, quota, remaining, strategy)
                .await
            {
                KeywordOutcome::Searched {
                    candidates,
                    tally: kw_tally,
                } => {
                    tracing::debug!(
                        merchant = %config.merchant,
                        keyword = %keyword,
                        candidates,
                        created = kw_tally.created,
                        updated = kw_tally.updated,
                        "Keyword searched"
                    );
                    tally.created += kw_tally.created;
                    tally.updated += kw_tally.updated;
                    tally.discarded += kw_tally.discarded;
                }
                KeywordOutcome::NoCandidates => {
                    tracing::debug!(
                        merchant = %config.merchant,
                        keyword = %keyword,
                        "No candidates"
                    );
                }
            }
        }

        tracing::debug!(
            merchant = %config.merchant,
            created = tally.created,
            updated = tally.updated,
            discarded = tally.discarded,
            "Merchant processed"
        );

        MerchantOutcome::Processed(tally)
    }

    async fn collect_keyword(
        &self,
        config: &MerchantConfig,
        keyword: &str,
        quota: usize,
        remaining: usize,
        strategy: ResolveStrategy,
    ) -> KeywordOutcome {
        let query = SearchQuery::new(
            format!("{} {}", config.merchant, keyword),
            quota,
            config.country.clone(),
        )
        .with_lang(SEARCH_LANG);

        let urls = self.search.search(&query).await;
        if urls.is_empty() {
            return KeywordOutcome::NoCandidates;
        }

        let mut tally = MerchantTally::default();
        for url in &urls {
            if tally.used() >= remaining {
                break;
            }

            match self.collect_url(config, keyword, url, strategy).await {
                UpsertOutcome::Created => tally.created += 1,
                UpsertOutcome::Updated => tally.updated += 1,
                UpsertOutcome::Discarded => tally.discarded += 1,
            }
        }

        KeywordOutcome::Searched {
            candidates: urls.len(),
            tally,
        }
    }

    async fn collect_url(
        &self,
        config: &MerchantConfig,
        keyword: &str,
        url: &str,
        strategy: ResolveStrategy,
    ) -> UrlOutcome {
        let resolution = self
            .resolvers
            .for_strategy(strategy)
            .resolve(url, &self.resolve_options)
            .await;

        let mirror_flag = is_mirror(&resolution.final_domain, config.brand_pattern.as_deref());

        tracing::debug!(
            merchant = %config.merchant,
            source_url = %url,
            final_domain = %resolution.final_domain,
            is_redirector = resolution.is_redirector,
            is_mirror = mirror_flag,
            "Candidate resolved"
        );

        let new_mirror = NewMirror {
            key: MirrorKey {
                merchant: config.merchant.clone(),
                country: config.country.clone(),
                keyword: keyword.to_string(),
                source_url: url.to_string(),
            },
            source_domain: resolution.source_domain,
            final_url: resolution.final_url,
            final_domain: resolution.final_domain,
            is_redirector: resolution.is_redirector,
            is_mirror: mirror_flag,
            cta_found: resolution.cta_clicked,
        };

        self.repository.upsert(new_mirror).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Resolution;
    use crate::domain::providers::{MockSearchProvider, MockUrlResolver};
    use crate::domain::repositories::MockMirrorRepository;
    use mockall::Sequence;
    use std::sync::Mutex;

    fn passive_mock() -> Arc<dyn UrlResolver> {
        let mut resolver = MockUrlResolver::new();
        resolver
            .expect_resolve()
            .returning(|url, _| Resolution::unresolved(url));
        Arc::new(resolver)
    }

    fn unused_resolver() -> Arc<dyn UrlResolver> {
        let mut resolver = MockUrlResolver::new();
        resolver.expect_resolve().never();
        Arc::new(resolver)
    }

    fn resolvers(passive: Arc<dyn UrlResolver>, http: Arc<dyn UrlResolver>) -> Resolvers {
        Resolvers {
            passive,
            http,
            browser: unused_resolver(),
        }
    }

    fn stake() -> MerchantConfig {
        MerchantConfig::new(
            "stake",
            "in",
            vec!["cricket betting".to_string()],
            Some("stake".to_string()),
        )
    }

    fn search_returning(urls: Vec<&'static str>) -> MockSearchProvider {
        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .returning(move |_| urls.iter().map(|u| u.to_string()).collect());
        search
    }

    #[tokio::test]
    async fn test_redirector_to_brand_is_stored_as_mirror() {
        let search = search_returning(vec!["http://bit.ly/abc"]);

        let mut http = MockUrlResolver::new();
        http.expect_resolve()
            .withf(|url, _| url == "http://bit.ly/abc")
            .times(1)
            .returning(|url, _| {
                Resolution::reached(
                    url,
                    "https://stake.com/",
                    vec![url.to_string(), "https://stake.com/".to_string()],
                )
            });

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert()
            .withf(|m: &NewMirror| {
                m.key.source_url == "http://bit.ly/abc"
                    && m.key.keyword == "cricket betting"
                    && m.source_domain == "bit.ly"
                    && m.final_domain == "stake.com"
                    && m.is_redirector
                    && m.is_mirror
                    && !m.cta_found
            })
            .times(1)
            .returning(|_| UpsertOutcome::Created);

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(unused_resolver(), Arc::new(http)),
        );

        let summary = service.collect_batch(vec![stake()], 10, ResolveStrategy::Http).await;

        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.mode, RunMode::Batch);
        assert_eq!(summary.follow_redirects, Some(true));
    }

    #[tokio::test]
    async fn test_browser_strategy_stores_clicked_cta() {
        let search = search_returning(vec!["https://stake-go.example/"]);

        let mut browser = MockUrlResolver::new();
        browser
            .expect_resolve()
            .withf(|url, options| {
                url == "https://stake-go.example/"
                    && options.wait_seconds == 12
                    && options.click_texts == vec!["Enter".to_string()]
            })
            .times(1)
            .returning(|url, _| {
                Resolution::reached(
                    url,
                    "https://stake.com/in",
                    vec![url.to_string(), "https://stake.com/in".to_string()],
                )
                .with_cta_clicked(true)
            });

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert()
            .withf(|m: &NewMirror| m.final_domain == "stake.com" && m.is_mirror && m.cta_found)
            .times(1)
            .returning(|_| UpsertOutcome::Created);

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            Resolvers {
                passive: unused_resolver(),
                http: unused_resolver(),
                browser: Arc::new(browser),
            },
        )
        .with_resolve_options(ResolveOptions {
            wait_seconds: 12,
            click_texts: vec!["Enter".to_string()],
        });

        let summary = service
            .collect_batch(vec![stake()], 10, ResolveStrategy::Browser)
            .await;

        assert_eq!(summary.created, 1);
        assert_eq!(summary.follow_redirects, Some(true));
        assert_eq!(summary.strategy, Some(ResolveStrategy::Browser));
    }

    #[tokio::test]
    async fn test_degraded_search_yields_empty_summary() {
        let search = search_returning(vec![]);

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert().never();

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(unused_resolver(), unused_resolver()),
        );

        let summary = service.collect_batch(vec![stake()], 10, ResolveStrategy::Http).await;

        assert_eq!(summary.status, "ok");
        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.merchants_count, 1);
    }

    #[tokio::test]
    async fn test_rerun_counts_updates() {
        let search = search_returning(vec!["https://stake.com/in"]);

        let mut repo = MockMirrorRepository::new();
        let mut seq = Sequence::new();
        repo.expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| UpsertOutcome::Created);
        repo.expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| UpsertOutcome::Updated);

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(passive_mock(), unused_resolver()),
        );

        let first = service.collect_batch(vec![stake()], 10, ResolveStrategy::Passive).await;
        let second = service.collect_batch(vec![stake()], 10, ResolveStrategy::Passive).await;

        assert_eq!((first.created, first.updated), (1, 0));
        assert_eq!((second.created, second.updated), (0, 1));
        assert_eq!(second.follow_redirects, Some(false));
    }

    #[tokio::test]
    async fn test_budget_stops_url_processing() {
        let search = search_returning(vec![
            "https://a.example/1",
            "https://b.example/2",
            "https://c.example/3",
            "https://d.example/4",
        ]);

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert()
            .times(2)
            .returning(|_| UpsertOutcome::Created);

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(passive_mock(), unused_resolver()),
        );

        let summary = service.collect_batch(vec![stake()], 2, ResolveStrategy::Passive).await;

        assert_eq!(summary.created, 2);
    }

    #[tokio::test]
    async fn test_budget_stops_remaining_keywords() {
        let config = MerchantConfig::new(
            "1xbet",
            "in",
            vec!["cricket betting".into(), "betting".into()],
            Some("1xbet".into()),
        );

        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .withf(|q| q.query == "1xbet cricket betting")
            .times(1)
            .returning(|_| vec!["https://1xbet.com/a".into(), "https://1xbet.com/b".into()]);
        search
            .expect_search()
            .withf(|q| q.query == "1xbet betting")
            .never();

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert()
            .times(2)
            .returning(|_| UpsertOutcome::Created);

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(passive_mock(), unused_resolver()),
        );

        let summary = service.collect_batch(vec![config], 2, ResolveStrategy::Passive).await;

        assert_eq!(summary.created, 2);
    }

    #[tokio::test]
    async fn test_discarded_upserts_do_not_consume_budget() {
        let search = search_returning(vec![
            "https://stake.com/1",
            "https://stake.com/2",
            "https://stake.com/3",
        ]);

        let mut repo = MockMirrorRepository::new();
        let mut seq = Sequence::new();
        repo.expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| UpsertOutcome::Discarded);
        repo.expect_upsert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| UpsertOutcome::Created);

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(passive_mock(), unused_resolver()),
        );

        let summary = service.collect_batch(vec![stake()], 2, ResolveStrategy::Passive).await;

        assert_eq!(summary.created, 2);
        assert_eq!(summary.updated, 0);
    }

    #[tokio::test]
    async fn test_query_shape_and_quota() {
        let config = MerchantConfig::new(
            "dafabet",
            "br",
            vec!["cricket betting".into(), "sports betting".into(), "casino".into()],
            None,
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_mock = seen.clone();

        let mut search = MockSearchProvider::new();
        search.expect_search().times(3).returning(move |q| {
            seen_in_mock.lock().unwrap().push(q.clone());
            vec![]
        });

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert().never();

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(unused_resolver(), unused_resolver()),
        );

        service.collect_batch(vec![config], 10, ResolveStrategy::Http).await;

        let queries = seen.lock().unwrap();
        let texts: Vec<&str> = queries.iter().map(|q| q.query.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "dafabet cricket betting",
                "dafabet sports betting",
                "dafabet casino"
            ]
        );
        assert!(queries.iter().all(|q| q.count == 3));
        assert!(queries.iter().all(|q| q.country == "br" && q.lang == "en"));
    }

    #[tokio::test]
    async fn test_urls_processed_in_provider_order() {
        let search = search_returning(vec![
            "https://third.example/",
            "https://first.example/",
            "https://second.example/",
        ]);

        let order = Arc::new(Mutex::new(Vec::new()));
        let order_in_mock = order.clone();

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert().returning(move |m| {
            order_in_mock.lock().unwrap().push(m.key.source_url.clone());
            UpsertOutcome::Created
        });

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(passive_mock(), unused_resolver()),
        );

        service.collect_batch(vec![stake()], 10, ResolveStrategy::Passive).await;

        assert_eq!(
            *order.lock().unwrap(),
            vec![
                "https://third.example/",
                "https://first.example/",
                "https://second.example/"
            ]
        );
    }

    #[tokio::test]
    async fn test_passive_mode_stores_source_as_destination() {
        let search = search_returning(vec!["https://1win.pro/in"]);

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert()
            .withf(|m: &NewMirror| {
                m.final_url == "https://1win.pro/in"
                    && m.final_domain == "1win.pro"
                    && !m.is_redirector
                    && !m.is_mirror
            })
            .times(1)
            .returning(|_| UpsertOutcome::Created);

        let config = MerchantConfig::new("1win", "in", vec!["cricket betting".into()], None);
        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(passive_mock(), unused_resolver()),
        );

        let summary = service.collect_batch(vec![config], 10, ResolveStrategy::Passive).await;
        assert_eq!(summary.created, 1);
    }

    #[tokio::test]
    async fn test_collect_all_uses_builtin_merchants_passively() {
        let mut search = MockSearchProvider::new();
        search.expect_search().returning(|_| vec![]);

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert().never();

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(passive_mock(), unused_resolver()),
        );

        let summary = service.collect_all(DEFAULT_ALL_LIMIT).await;

        assert_eq!(summary.mode, RunMode::All);
        assert_eq!(summary.merchants_count, 5);
        assert_eq!(summary.limit, 50);
        assert!(summary.follow_redirects.is_none());
    }

    #[tokio::test]
    async fn test_unusable_merchant_is_skipped() {
        let mut search = MockSearchProvider::new();
        search.expect_search().never();

        let mut repo = MockMirrorRepository::new();
        repo.expect_upsert().never();

        let service = CollectorService::new(
            Arc::new(repo),
            Arc::new(search),
            resolvers(unused_resolver(), unused_resolver()),
        );

        let blank = MerchantConfig::new(" ", "in", vec!["betting".into()], None);
        let outcome = service
            .collect_for_merchant(&blank, 10, ResolveStrategy::Passive)
            .await;

        assert!(matches!(outcome, MerchantOutcome::Skipped { .. }));
        assert_eq!(outcome.tally(), MerchantTally::default());
    }

    #[tokio::test]
    async fn test_merchant_without_keywords_does_nothing() {
        let mut search = MockSearchProvider::new();
        search.expect_search().never();

        let service = CollectorService::new(
            Arc::new(MockMirrorRepository::new()),
            Arc::new(search),
            resolvers(unused_resolver(), unused_resolver()),
        );

        let config = MerchantConfig::new("stake", "in", vec![], None);
        let outcome = service
            .collect_for_merchant(&config, 10, ResolveStrategy::Http)
            .await;

        assert_eq!(outcome, MerchantOutcome::Processed(MerchantTally::default()));
    }
}
