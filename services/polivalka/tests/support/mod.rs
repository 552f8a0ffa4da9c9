#![allow(dead_code)]

use axum::{
    Router,
    http::{StatusCode, header},
    routing::{get, post},
};
use polivalka::config::parse_device_url;
use polivalka::{ControlState, DeviceClient};
use std::fmt::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub struct MockAppliance {
    pub addr: SocketAddr,
    /// Bodies received on POST /water, in arrival order.
    pub water_bodies: Arc<Mutex<Vec<String>>>,
    /// Most POST /water requests ever handled at the same time.
    pub max_concurrent_water: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockAppliance {
    pub fn device(&self) -> DeviceClient {
        let base = parse_device_url(&format!("http://{}", self.addr)).unwrap();
        DeviceClient::with_client(reqwest::Client::new(), &base).unwrap()
    }

    pub fn water_bodies(&self) -> Vec<String> {
        self.water_bodies.lock().unwrap().clone()
    }

    pub fn max_concurrent_water(&self) -> usize {
        self.max_concurrent_water.load(Ordering::SeqCst)
    }
}

impl Drop for MockAppliance {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Appliance answering GET /humidity with `humidity` and POST /water with
/// `water_status` plus a short text body.
pub async fn spawn_appliance(
    humidity: (StatusCode, &'static str),
    water_status: StatusCode,
) -> MockAppliance {
    spawn_slow_appliance(humidity, water_status, Duration::ZERO).await
}

/// Same as [`spawn_appliance`], but every response is held back by `delay`.
pub async fn spawn_slow_appliance(
    humidity: (StatusCode, &'static str),
    water_status: StatusCode,
    delay: Duration,
) -> MockAppliance {
    let water_bodies = Arc::new(Mutex::new(Vec::new()));
    let max_concurrent_water = Arc::new(AtomicUsize::new(0));
    let recorded = Arc::clone(&water_bodies);
    let max_seen = Arc::clone(&max_concurrent_water);
    let active = Arc::new(AtomicUsize::new(0));

    let router = Router::new()
        .route(
            "/humidity",
            get(move || async move {
                tokio::time::sleep(delay).await;
                let (status, body) = humidity;
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }),
        )
        .route(
            "/water",
            post(move |body: String| {
                let recorded = Arc::clone(&recorded);
                let max_seen = Arc::clone(&max_seen);
                let active = Arc::clone(&active);
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    let reply = format!("motor <- {body}");
                    recorded.lock().unwrap().push(body);
                    tokio::time::sleep(delay).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    (water_status, reply)
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockAppliance {
        addr,
        water_bodies,
        max_concurrent_water,
        handle,
    }
}

/// Device pointing at a port nothing listens on.
pub async fn unreachable_device() -> DeviceClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base = parse_device_url(&format!("http://{addr}")).unwrap();
    DeviceClient::with_client(reqwest::Client::new(), &base).unwrap()
}

pub fn fresh_state() -> ControlState {
    ControlState::new("IP Address: 127.0.0.1")
}

/// Log events emitted by the `polivalka` crate while the guard is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::registry().with(CaptureLayer(logs.clone()));
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("polivalka") {
            return;
        }
        let mut line = LineVisitor::default();
        event.record(&mut line);
        (self.0).0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), line.0));
    }
}

#[derive(Default)]
struct LineVisitor(String);

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}
