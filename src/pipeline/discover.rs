//! Keyword-driven channel discovery.
//!
//! Walks the configured keyword list in order, paging through channel search
//! results and collecting unique channels until the global cap is reached.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::Result;
use crate::models::{ChannelCandidate, Config};
use crate::pipeline::rotation::{KeyRing, fetch_with_rotation};
use crate::services::ChannelApi;

/// Summary of a discovery run.
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    /// Unique channels in first-seen order, never longer than the cap
    pub candidates: Vec<ChannelCandidate>,
    /// Keywords abandoned because of a non-quota request failure
    pub keyword_failures: usize,
}

/// Collect unique channel candidates for every configured keyword.
///
/// Quota failures rotate credentials and replay the page; any other request
/// failure abandons the current keyword only. The courtesy delay runs
/// between the pages of one keyword, never after its last page.
pub async fn run_discovery(
    api: &dyn ChannelApi,
    keys: &mut KeyRing,
    config: &Config,
) -> Result<DiscoveryOutcome> {
    let cap = config.discovery.max_channels;
    let delay = Duration::from_millis(config.crawler.request_delay_ms);

    let mut outcome = DiscoveryOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    'keywords: for keyword in &config.discovery.keywords {
        let mut page_token: Option<String> = None;

        for _ in 0..config.discovery.pages_per_keyword {
            let token = page_token.clone();
            let fetched = fetch_with_rotation(keys, |key| {
                let token = token.clone();
                async move {
                    api.search_channels(&key, keyword, config.discovery.page_size, token.as_deref())
                        .await
                }
            })
            .await?;

            let page = match fetched {
                Ok(page) => page,
                Err(error) => {
                    log::warn!("Search for '{}' failed: {}; moving on", keyword, error);
                    outcome.keyword_failures += 1;
                    continue 'keywords;
                }
            };

            // First sighting wins; duplicates never overwrite the name.
            for candidate in page.candidates {
                if seen.insert(candidate.id.clone()) {
                    outcome.candidates.push(candidate);
                }
                if outcome.candidates.len() >= cap {
                    break;
                }
            }

            if outcome.candidates.len() >= cap {
                log::info!("Channel cap of {} reached at keyword '{}'", cap, keyword);
                break 'keywords;
            }

            page_token = page.next_page;
            if page_token.is_none() {
                break;
            }
            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        if config.logging.show_progress {
            log::info!(
                "Keyword '{}' done, {} unique channels so far",
                keyword,
                outcome.candidates.len()
            );
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::testing::ScriptedApi;

    fn test_config(keywords: &[&str], pages: u32, cap: usize) -> Config {
        let mut config = Config::default();
        config.discovery.keywords = keywords.iter().map(|k| k.to_string()).collect();
        config.discovery.pages_per_keyword = pages;
        config.discovery.max_channels = cap;
        config.crawler.request_delay_ms = 0;
        config.logging.show_progress = false;
        config
    }

    fn ring() -> KeyRing {
        KeyRing::new(vec!["k1".to_string(), "k2".to_string()]).unwrap()
    }

    #[tokio::test]
    async fn cap_stops_mid_page() {
        let api = ScriptedApi::new();
        api.push_search(
            "music",
            Ok(ScriptedApi::page(
                &[
                    ("UC1", "One"),
                    ("UC2", "Two"),
                    ("UC3", "Three"),
                    ("UC4", "Four"),
                    ("UC5", "Five"),
                ],
                Some("NEXT"),
            )),
        );
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music"], 3, 3))
            .await
            .unwrap();

        let ids: Vec<_> = outcome.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["UC1", "UC2", "UC3"]);
        // Cap reached mid-page: no follow-up request for the cursor.
        assert_eq!(api.search_call_count(), 1);
    }

    #[tokio::test]
    async fn duplicates_across_keywords_keep_first_name() {
        let api = ScriptedApi::new();
        api.push_search(
            "music",
            Ok(ScriptedApi::page(&[("UC1", "First"), ("UC2", "Two")], None)),
        );
        api.push_search(
            "gaming",
            Ok(ScriptedApi::page(&[("UC1", "Other"), ("UC3", "Three")], None)),
        );
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music", "gaming"], 3, 100))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 3);
        assert_eq!(outcome.candidates[0].id, "UC1");
        assert_eq!(outcome.candidates[0].name, "First");
        assert_eq!(outcome.candidates[1].id, "UC2");
        assert_eq!(outcome.candidates[2].id, "UC3");
    }

    #[tokio::test]
    async fn missing_cursor_ends_keyword_after_one_fetch() {
        let api = ScriptedApi::new();
        api.push_search(
            "music",
            Ok(ScriptedApi::page(&[("UC1", "One"), ("UC2", "Two")], None)),
        );
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music"], 3, 100))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(api.search_call_count(), 1);
    }

    #[tokio::test]
    async fn cursor_is_passed_to_the_next_page() {
        let api = ScriptedApi::new();
        api.push_search("music", Ok(ScriptedApi::page(&[("UC1", "One")], Some("T2"))));
        api.push_search("music", Ok(ScriptedApi::page(&[("UC2", "Two")], None)));
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music"], 3, 100))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 2);
        let calls = api.search_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].2, None);
        assert_eq!(calls[1].2, Some("T2".to_string()));
    }

    #[tokio::test]
    async fn page_limit_stops_pagination() {
        let api = ScriptedApi::new();
        api.push_search("music", Ok(ScriptedApi::page(&[("UC1", "One")], Some("T2"))));
        api.push_search("music", Ok(ScriptedApi::page(&[("UC2", "Two")], Some("T3"))));
        api.push_search("music", Ok(ScriptedApi::page(&[("UC3", "Three")], Some("T4"))));
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music"], 2, 100))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(api.search_call_count(), 2);
    }

    #[tokio::test]
    async fn failed_keyword_is_abandoned_and_run_continues() {
        let api = ScriptedApi::new();
        api.push_search("music", Err(ScriptedApi::rejected(500)));
        api.push_search("gaming", Ok(ScriptedApi::page(&[("UC9", "Nine")], None)));
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music", "gaming"], 3, 100))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].id, "UC9");
        assert_eq!(outcome.keyword_failures, 1);
        // No rotation on a non-quota failure.
        assert_eq!(keys.position(), 0);
    }

    #[tokio::test]
    async fn quota_rotates_and_replays_the_same_page() {
        let api = ScriptedApi::new();
        api.push_search("music", Err(ScriptedApi::quota()));
        api.push_search("music", Ok(ScriptedApi::page(&[("UC1", "One")], None)));
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music"], 3, 100))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(keys.position(), 1);
        let calls = api.search_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "k1");
        assert_eq!(calls[1].0, "k2");
        // The replay repeats the identical request.
        assert_eq!(calls[0].1, calls[1].1);
        assert_eq!(calls[0].2, calls[1].2);
    }

    #[tokio::test]
    async fn keyword_with_no_results_contributes_nothing() {
        let api = ScriptedApi::new();
        // "music" left unscripted: the double answers with an empty page.
        api.push_search("gaming", Ok(ScriptedApi::page(&[("UC7", "Seven")], None)));
        let mut keys = ring();

        let outcome = run_discovery(&api, &mut keys, &test_config(&["music", "gaming"], 3, 100))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.keyword_failures, 0);
    }

    #[tokio::test]
    async fn persistent_quota_aborts_discovery() {
        let api = ScriptedApi::new();
        api.push_search("music", Err(ScriptedApi::quota()));
        api.push_search("music", Err(ScriptedApi::quota()));
        let mut keys = ring();

        let error = run_discovery(&api, &mut keys, &test_config(&["music"], 3, 100))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            AppError::CredentialsExhausted { attempted: 2 }
        ));
    }
}
