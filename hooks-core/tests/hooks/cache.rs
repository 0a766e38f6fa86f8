use futures::FutureExt;
use hooks_core::{CycleOutcome, FetchConfig, FetchError, RequestOptions};
use reqwest::StatusCode;

use crate::{Harness, Payload};

async fn fetch_once(app: &Harness, url: &str) -> CycleOutcome {
    app.controller
        .on_url_change(
            app.fetcher.clone(),
            Some(url.to_string()),
            RequestOptions::get(),
            app.recorder.dispatcher(),
        )
        .expect("a url starts a cycle")
        .await
}

#[tokio::test]
async fn cached_url_is_fetched_once() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::cached());
    app.fetcher.respond_json("/a", &Payload::new("first"));

    assert_eq!(fetch_once(&app, "/a").await, CycleOutcome::Fetched);
    let first = app.recorder.state().into_data();

    // a changed server response must not be observed
    app.fetcher.respond_json("/a", &Payload::new("second"));
    assert_eq!(fetch_once(&app, "/a").await, CycleOutcome::CacheHit);
    let second = app.recorder.state().into_data();

    assert_eq!(app.fetcher.calls("/a"), 1);
    assert_eq!(first, Some(Payload::new("first")));
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn cache_hit_still_passes_through_loading() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::cached());
    fetch_once(&app, "/a").await;
    fetch_once(&app, "/a").await;

    use hooks_core::FetchStatus::*;
    assert_eq!(
        app.recorder.history(),
        vec![Loading, Fetched, Loading, Fetched]
    );
    Ok(())
}

#[tokio::test]
async fn without_cache_every_cycle_hits_the_network() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    fetch_once(&app, "/a").await;
    fetch_once(&app, "/a").await;

    assert_eq!(app.fetcher.calls("/a"), 2);
    assert!(app.controller.cache().is_none());
    Ok(())
}

#[tokio::test]
async fn failures_are_not_cached() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::cached());
    app.fetcher
        .respond_once("/flaky", Ok(test_helpers::json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            &(),
        )))
        .respond_once(
            "/flaky",
            Err(FetchError::Transport("reset".into())),
        );

    assert_eq!(fetch_once(&app, "/flaky").await, CycleOutcome::Failed);
    assert_eq!(fetch_once(&app, "/flaky").await, CycleOutcome::Failed);
    assert_eq!(fetch_once(&app, "/flaky").await, CycleOutcome::Fetched);
    assert_eq!(app.fetcher.calls("/flaky"), 3);

    let cache = app.controller.cache().expect("cache is enabled");
    assert_eq!(cache.get("/flaky"), Some(Payload::new("/flaky")));
    Ok(())
}

#[tokio::test]
async fn response_arriving_after_supersede_is_cached_not_applied()
-> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::cached());
    let mut cycle = app
        .controller
        .on_url_change(
            app.fetcher.clone(),
            Some("/a".into()),
            RequestOptions::get(),
            app.recorder.dispatcher(),
        )
        .expect("a url starts a cycle")
        .boxed_local();

    // runs up to the mock's yield, with the reply already decided
    assert!(futures::poll!(&mut cycle).is_pending());
    assert!(app.recorder.state().is_loading());

    app.controller.supersede();
    assert_eq!(cycle.await, CycleOutcome::Superseded);

    assert!(app.recorder.state().is_loading());
    let cache = app.controller.cache().expect("cache is enabled");
    assert_eq!(cache.get("/a"), Some(Payload::new("/a")));
    Ok(())
}
