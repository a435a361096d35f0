mod assets;

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
};
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};

use crate::{
    app::{run_event_loop, App, InputEvent, Key},
    render::Frame,
};

const INPUT_QUEUE: usize = 64;

#[derive(Clone)]
struct WebState {
    input: mpsc::Sender<InputEvent>,
    frames: watch::Receiver<Frame>,
}

pub struct WebServerConfig {
    pub app: App,
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize)]
struct KeyRequest {
    key: Key,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig { app, host, port } = config;

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let (input_tx, input_rx) = mpsc::channel::<InputEvent>(INPUT_QUEUE);
    let (frame_tx, frame_rx) = watch::channel(app.render());

    let loop_handle = tokio::task::spawn_blocking(move || run_event_loop(app, input_rx, frame_tx));

    let state = Arc::new(WebState {
        input: input_tx.clone(),
        frames: frame_rx.clone(),
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/frame", get(latest_frame))
        .route("/api/input", post(send_key))
        .route("/api/close", post(close_window))
        .route("/api/events", get(stream_frames))
        .with_state(state);

    tracing::info!(%addr, "crop planner live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(input_tx, frame_rx))
        .await?;

    let summary = loop_handle.await.context("frame loop task failed")?;
    tracing::info!(frames = summary.frames, solves = summary.solves, "shut down");
    Ok(())
}

/// Resolves when the frame loop stops. Ctrl+C is turned into a close request
/// so the loop ends the same way a closed window does.
async fn shutdown_signal(input: mpsc::Sender<InputEvent>, mut frames: watch::Receiver<Frame>) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("ctrl+c received, closing window");
            let _ = input.send(InputEvent::CloseRequested).await;
        }
        _ = wait_for_loop_exit(&mut frames) => {}
    }
}

async fn wait_for_loop_exit(frames: &mut watch::Receiver<Frame>) {
    while frames.changed().await.is_ok() {}
}

async fn index() -> Html<&'static str> {
    Html(assets::PAGE)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLESHEET,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        assets::CLIENT_JS,
    )
}

async fn latest_frame(State(state): State<Arc<WebState>>) -> Json<Frame> {
    Json(state.frames.borrow().clone())
}

async fn send_key(
    State(state): State<Arc<WebState>>,
    Json(request): Json<KeyRequest>,
) -> StatusCode {
    enqueue(&state, InputEvent::from(request.key)).await
}

async fn close_window(State(state): State<Arc<WebState>>) -> StatusCode {
    enqueue(&state, InputEvent::CloseRequested).await
}

async fn enqueue(state: &WebState, event: InputEvent) -> StatusCode {
    match state.input.send(event).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn stream_frames(
    State(state): State<Arc<WebState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(state.frames.clone()).filter_map(|frame| {
        match serde_json::to_string(&frame) {
            Ok(payload) => Some(Ok(Event::default().data(payload))),
            Err(err) => {
                tracing::warn!(%err, "failed to encode frame");
                None
            }
        }
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
