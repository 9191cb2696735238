//! Dev server - static files over the output root plus live reload
//!
//! Connected WebSocket clients receive a JSON reload message whenever any
//! file under the output root changes. Pages opt in by loading the small
//! client helper served at `/__livereload.js`.

use crate::core::SiteConfig;
use futures_util::{SinkExt, StreamExt};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use warp::ws::{Message, WebSocket, Ws};
use warp::Filter;

const CLIENT_SCRIPT: &str = r#"(function () {
  var socket = new WebSocket("ws://" + location.host + "/__livereload");
  socket.onmessage = function () { location.reload(); };
})();
"#;

/// Routes served by the dev server: live-reload socket, client helper, and
/// the static output tree.
pub fn routes(
    root: PathBuf,
    reload_tx: broadcast::Sender<String>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_tx = warp::any().map(move || reload_tx.clone());

    let livereload = warp::path("__livereload")
        .and(warp::ws())
        .and(with_tx)
        .map(|ws: Ws, tx: broadcast::Sender<String>| {
            ws.on_upgrade(move |socket| client_connected(socket, tx.subscribe()))
        });

    let script = warp::path("__livereload.js").map(|| {
        warp::reply::with_header(CLIENT_SCRIPT, "content-type", "application/javascript")
    });

    livereload.or(script).or(warp::fs::dir(root))
}

/// Serve the output root until the process ends
pub async fn serve(config: Arc<SiteConfig>) -> anyhow::Result<()> {
    let root = config.output_path();
    // Serving (and watching) an output root that has not been built yet
    std::fs::create_dir_all(&root)?;

    let (reload_tx, _) = broadcast::channel(16);

    // Forward debounced output changes to every connected client
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut debouncer = new_debouncer(
        Duration::from_millis(config.watch.debounce_ms),
        move |result: DebounceEventResult| {
            let _ = event_tx.send(result);
        },
    )?;
    debouncer.watcher().watch(&root, RecursiveMode::Recursive)?;

    let notifier = reload_tx.clone();
    tokio::spawn(async move {
        while let Some(result) = event_rx.recv().await {
            match result {
                Ok(events) => {
                    for event in events
                        .iter()
                        .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                    {
                        debug!("output changed: {}", event.path.display());
                        let message = serde_json::json!({
                            "type": "reload",
                            "path": event.path.display().to_string(),
                        })
                        .to_string();
                        let _ = notifier.send(message);
                    }
                }
                Err(e) => warn!("reload watch error: {}", e),
            }
        }
    });

    let addr: SocketAddr = ([127, 0, 0, 1], config.server.port).into();
    info!("serving {} at http://{}", root.display(), addr);
    warp::serve(routes(root, reload_tx)).run(addr).await;

    Ok(())
}

async fn client_connected(socket: WebSocket, mut reload_rx: broadcast::Receiver<String>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    loop {
        tokio::select! {
            message = reload_rx.recv() => match message {
                Ok(text) => {
                    if ws_tx.send(Message::text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = ws_rx.next() => match incoming {
                Some(Ok(_)) => continue,
                _ => break,
            },
        }
    }
}
