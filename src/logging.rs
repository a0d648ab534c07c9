//! Tracing subscriber setup and the JSON record format.
//!
//! Production records are one JSON object per line with the fields of every
//! enclosing span hoisted to top-level keys, so a record emitted inside the
//! request span reads `{"uuid": ..., "message": ...}` rather than nesting
//! the id under a `span` object.

use std::fmt::{self, Write as _};

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{JsonFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global subscriber.
///
/// Defaults to JSON records; `--verbose` switches to human-readable debug
/// output for local work.
pub fn init(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    if verbose {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .fmt_fields(JsonFields::new())
                    .event_format(JsonRecordFormat),
            )
            .init();
    }
}

/// One JSON object per record, span fields included as top-level keys.
pub struct JsonRecordFormat;

impl<S, N> FormatEvent<S, N> for JsonRecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut record = Map::new();
        record.insert(
            "timestamp".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        record.insert(
            "level".to_string(),
            Value::String(event.metadata().level().to_string()),
        );
        record.insert(
            "target".to_string(),
            Value::String(event.metadata().target().to_string()),
        );

        // Span fields from the root down, so the request span's uuid lands
        // as a top-level key. Event fields are recorded last and win on a
        // name collision.
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if let Ok(Value::Object(map)) = serde_json::from_str(&fields.fields) {
                        record.extend(map);
                    }
                }
            }
        }

        let mut visitor = RecordVisitor(&mut record);
        event.record(&mut visitor);

        writeln!(writer, "{}", Value::Object(record))
    }
}

struct RecordVisitor<'a>(&'a mut Map<String, Value>);

impl Visit for RecordVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0
            .insert(field.name().to_string(), Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            Value::String(format!("{:?}", value)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Capture {
            self.clone()
        }
    }

    #[test]
    fn request_uuid_is_a_top_level_key() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .fmt_fields(JsonFields::new())
                .event_format(JsonRecordFormat)
                .with_writer(capture.clone()),
        );

        tracing::subscriber::with_default(subscriber, || {
            let span =
                tracing::info_span!("request", uuid = "3f2e7c1a-9d4b-4d6a-8f0e-2b5c6d7e8f90");
            let _guard = span.enter();
            tracing::info!("Request started");
        });

        let bytes = capture.0.lock().unwrap().clone();
        let output = String::from_utf8(bytes).unwrap();
        let record: Value = serde_json::from_str(output.lines().next().unwrap()).unwrap();

        assert_eq!(record["uuid"], "3f2e7c1a-9d4b-4d6a-8f0e-2b5c6d7e8f90");
        assert_eq!(record["message"], "Request started");
        assert!(record.get("span").is_none());
    }

    #[test]
    fn event_fields_override_span_fields() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .fmt_fields(JsonFields::new())
                .event_format(JsonRecordFormat)
                .with_writer(capture.clone()),
        );

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("request", status = "open");
            let _guard = span.enter();
            tracing::info!(status = 204, "Request completed");
        });

        let bytes = capture.0.lock().unwrap().clone();
        let output = String::from_utf8(bytes).unwrap();
        let record: Value = serde_json::from_str(output.lines().next().unwrap()).unwrap();

        assert_eq!(record["status"], 204);
    }
}
