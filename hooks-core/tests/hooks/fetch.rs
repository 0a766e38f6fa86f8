use hooks_core::{
    CycleOutcome, CycleTracker, FetchConfig, FetchError, FetchState,
    FetchStatus, RequestOptions, run_cycle,
};
use reqwest::StatusCode;
use test_helpers::{run_local, settle};

use crate::{Harness, Payload};

#[tokio::test]
async fn stays_idle_without_url() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    run_local(async {
        app.set_url(None);
        settle().await;
    })
    .await;

    let state = app.recorder.state();
    assert!(state.is_idle());
    assert!(!state.is_loading());
    assert!(!state.is_fetched());
    assert_eq!(app.fetcher.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn loading_then_fetched() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    let gate = app.fetcher.gate("X");

    run_local(async {
        app.set_url(Some("X"));
        settle().await;
        assert_eq!(app.recorder.state(), FetchState::Loading);

        assert!(gate.release_json(&Payload::new("X")));
        settle().await;
    })
    .await;

    let state = app.recorder.state();
    assert!(state.is_fetched());
    assert!(!state.is_loading());
    assert_eq!(state.data(), Some(&Payload::new("X")));
    assert_eq!(
        app.recorder.history(),
        vec![FetchStatus::Loading, FetchStatus::Fetched]
    );
    Ok(())
}

#[tokio::test]
async fn loading_is_dispatched_before_the_cycle_is_polled()
-> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    let cycle = app
        .controller
        .on_url_change(
            app.fetcher.clone(),
            Some("X".into()),
            RequestOptions::get(),
            app.recorder.dispatcher(),
        )
        .expect("a url starts a cycle");

    assert_eq!(app.recorder.state(), FetchState::Loading);
    assert_eq!(app.fetcher.total_calls(), 0);

    assert_eq!(cycle.await, CycleOutcome::Fetched);
    assert_eq!(
        app.recorder.history(),
        vec![FetchStatus::Loading, FetchStatus::Fetched]
    );
    Ok(())
}

#[tokio::test]
async fn echoes_url_from_default_mock() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    run_local(async {
        app.set_url(Some("test/mock"));
        settle().await;
    })
    .await;

    assert_eq!(
        app.recorder.state().into_data(),
        Some(Payload::new("test/mock"))
    );
    assert_eq!(app.fetcher.calls("test/mock"), 1);
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_an_error() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    app.fetcher.respond_status("/missing", StatusCode::NOT_FOUND);

    let outcome = app
        .controller
        .on_url_change(
            app.fetcher.clone(),
            Some("/missing".into()),
            RequestOptions::get(),
            app.recorder.dispatcher(),
        )
        .expect("a url starts a cycle")
        .await;

    assert_eq!(outcome, CycleOutcome::Failed);
    let state = app.recorder.state();
    assert_eq!(state.data(), None);
    let error = state.error().expect("error is set");
    assert!(error.is_response_failure());
    assert_eq!(error.to_string(), "Not Found");
    Ok(())
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    app.fetcher.respond_json("/list", &vec![1, 2, 3]);

    run_local(async {
        app.set_url(Some("/list"));
        settle().await;
    })
    .await;

    assert!(matches!(
        app.recorder.state().error(),
        Some(FetchError::Decode(_))
    ));
    Ok(())
}

#[tokio::test]
async fn transport_failure_is_an_error() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    app.fetcher.respond(
        "/offline",
        Err(FetchError::Transport("connection refused".into())),
    );

    run_local(async {
        app.set_url(Some("/offline"));
        settle().await;
    })
    .await;

    let state = app.recorder.state();
    assert_eq!(state.status(), FetchStatus::Error);
    assert!(!state.error().is_some_and(FetchError::is_response_failure));
    Ok(())
}

#[tokio::test]
async fn request_options_reach_the_fetcher() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    let options = RequestOptions::post(r#"{"name":"x"}"#)
        .header("Content-Type", "application/json");

    app.controller
        .on_url_change(
            app.fetcher.clone(),
            Some("/items".into()),
            options.clone(),
            app.recorder.dispatcher(),
        )
        .expect("a url starts a cycle")
        .await;

    assert_eq!(app.fetcher.last_options("/items"), Some(options));
    Ok(())
}

#[tokio::test]
async fn clearing_the_url_resets_to_idle() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    run_local(async {
        app.set_url(Some("/a"));
        settle().await;
        assert!(app.recorder.state().is_fetched());

        app.set_url(None);
        settle().await;
    })
    .await;

    assert!(app.recorder.state().is_idle());
    Ok(())
}

#[tokio::test]
async fn hung_request_stays_loading() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    app.fetcher.hang("/slow");

    run_local(async {
        app.set_url(Some("/slow"));
        settle().await;
    })
    .await;

    assert!(app.recorder.state().is_loading());
    Ok(())
}

#[tokio::test]
async fn run_cycle_reports_loading_then_fetched() -> anyhow::Result<()> {
    let app = Harness::new(FetchConfig::default());
    let tracker = CycleTracker::new();

    let outcome = run_cycle(
        app.fetcher.as_ref(),
        "/direct",
        &RequestOptions::get(),
        None,
        tracker.begin(),
        app.recorder.dispatcher(),
    )
    .await;

    assert_eq!(outcome, CycleOutcome::Fetched);
    assert_eq!(
        app.recorder.history(),
        vec![FetchStatus::Loading, FetchStatus::Fetched]
    );
    assert_eq!(
        app.recorder.state().into_data(),
        Some(Payload::new("/direct"))
    );
    Ok(())
}
