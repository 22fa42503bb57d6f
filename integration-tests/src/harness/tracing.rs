use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

/// One recorded event. Field values are kept in their `Display` form
/// (strings unquoted, numbers as written).
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

/// Events recorded on the current thread until the capture is dropped.
pub struct TracingCapture {
    sink: Sink,
    _guard: DefaultGuard,
}

impl TracingCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.fields.get("message").cloned())
            .collect()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.sink
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.message() == Some(message))
    }

    /// Events carrying `message`, in emission order.
    pub fn find(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message() == Some(message))
            .collect()
    }
}

/// Installs a capturing subscriber as the thread's default, at every level.
///
/// Thread-local, so tests running in parallel do not see each other's
/// events. Async tests must run on a current-thread runtime.
pub fn capture_tracing() -> TracingCapture {
    let sink = Sink::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer { sink: sink.clone() });

    TracingCapture {
        sink,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}

struct CaptureLayer {
    sink: Sink,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldMap::default();
        event.record(&mut fields);

        let meta = event.metadata();
        self.sink.lock().unwrap().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            fields: fields.0,
        });
    }
}

#[derive(Default)]
struct FieldMap(BTreeMap<String, String>);

impl FieldMap {
    fn put(&mut self, field: &Field, value: impl ToString) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}
