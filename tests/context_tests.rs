use chrono::{TimeDelta, Utc};
use invocation_context::prelude::*;
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing_subscriber::fmt::MakeWriter;

const ARN: &str = "arn:aws:lambda:eu-west-1:123456789012:function:resize-image";

// In-memory sink for formatted tracing output
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn json_records(captured: &Captured) -> Vec<Value> {
    captured
        .lines()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn new_context(request_id: &str, trace_id: &str, logger: Logger) -> ExecutionContext {
    ExecutionContext::new(
        request_id,
        trace_id,
        ARN,
        Utc::now() + TimeDelta::seconds(30),
        None,
        None,
        logger,
        Handle::current(),
    )
}

// Shaped like a handler a runtime would dispatch to
async fn resize_handler(ctx: &ExecutionContext, payload: Vec<u8>) -> usize {
    let mut buffer = ctx.allocator().buffer(payload.len());
    buffer.extend_from_slice(&payload);

    let remaining = ctx.remaining_time();
    let follow_up = ctx.event_loop().spawn(async move { remaining.num_milliseconds() > 0 });
    assert!(follow_up.await.unwrap());

    buffer.len()
}

#[tokio::test]
async fn test_handler_uses_context() {
    let ctx = new_context(&uuid::Uuid::new_v4().to_string(), "trace", Logger::default());
    let size = resize_handler(&ctx, vec![1, 2, 3, 4]).await;

    assert_eq!(size, 4);
}

#[tokio::test]
async fn test_remaining_time_decreases_with_wall_clock() {
    let ctx = new_context("req", "trace", Logger::default());

    let before = ctx.remaining_time();
    tokio::time::sleep(Duration::from_millis(200)).await;
    let after = ctx.remaining_time();

    let elapsed = (before - after).num_milliseconds();
    assert!(elapsed >= 190, "elapsed {}ms", elapsed);
    assert!(elapsed <= 5_000, "elapsed {}ms", elapsed);
}

#[tokio::test]
async fn test_contexts_enrich_independent_loggers() {
    let base = Logger::new("resize").with_level(LevelFilter::DEBUG);
    let first = new_context("req-a", "trace-a", base.clone());
    let second = new_context("req-b", "trace-b", base.clone());

    assert_eq!(first.logger().metadata_value(REQUEST_ID_KEY), Some("req-a"));
    assert_eq!(second.logger().metadata_value(REQUEST_ID_KEY), Some("req-b"));
    assert_eq!(first.logger().metadata_value(TRACE_ID_KEY), Some("trace-a"));
    assert_eq!(second.logger().metadata_value(TRACE_ID_KEY), Some("trace-b"));
    assert!(base.metadata().is_empty());

    let mut derived = first.logger().clone();
    derived.set_metadata(REQUEST_ID_KEY, "overwritten");
    derived.set_metadata("step", "thumbnail");

    assert_eq!(first.logger().metadata_value(REQUEST_ID_KEY), Some("req-a"));
    assert_eq!(first.logger().metadata_value("step"), None);
    assert_eq!(second.logger().metadata_value(REQUEST_ID_KEY), Some("req-b"));
    assert_eq!(second.logger().metadata().len(), 2);
}

#[tokio::test]
async fn test_every_record_carries_identifiers() {
    let ctx = new_context("req-log", "trace-log", Logger::new("resize").with_level(LevelFilter::TRACE));

    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        ctx.logger().trace("fetching source");
        ctx.logger().info("resized");
        ctx.logger().error("upload failed");
    });

    let lines = captured.lines();
    assert_eq!(lines.len(), 3);
    for line in &lines {
        assert!(line.contains(r#"awsRequestID="req-log""#), "{}", line);
        assert!(line.contains(r#"awsTraceID="trace-log""#), "{}", line);
    }
}

#[tokio::test]
async fn test_context_is_shareable_across_tasks() {
    let ctx = Arc::new(new_context("req-shared", "trace-shared", Logger::default()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            let event_loop = ctx.event_loop().clone();
            event_loop.spawn(async move { (ctx.request_id().to_string(), ctx.remaining_time()) })
        })
        .collect();

    for handle in handles {
        let (request_id, remaining) = handle.await.unwrap();
        assert_eq!(request_id, "req-shared");
        assert!(remaining > TimeDelta::zero());
    }
}

#[tokio::test]
async fn test_builder_from_envelope_fields() {
    let deadline_ms = Utc::now().timestamp_millis() + 5_000;
    let config = LoggerConfig::from_lookup(|key| (key == "LOG_LEVEL").then(|| "warn".into())).unwrap();

    let ctx = ContextBuilder::new()
        .request_id("req-env")
        .trace_id("trace-env")
        .invoked_function_arn(ARN)
        .deadline_ms(deadline_ms)
        .client_context("{\"client\":{\"app_title\":\"gallery\"}}")
        .logger(config.build_logger())
        .build()
        .unwrap();

    assert_eq!(ctx.logger().level(), LevelFilter::WARN);
    assert_eq!(ctx.client_context(), Some("{\"client\":{\"app_title\":\"gallery\"}}"));
    let remaining = ctx.remaining_time().num_milliseconds();
    assert!((0..=5_000).contains(&remaining), "remaining {}ms", remaining);
    assert_eq!(
        ctx.remaining_time_at(ctx.deadline() - TimeDelta::milliseconds(5_000)),
        TimeDelta::milliseconds(5_000)
    );
}

#[tokio::test]
async fn test_structured_records_carry_id_fields() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(captured.clone())
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let ctx = new_context("req-json", "trace-json", Logger::default().with_metadata("tenant", "acme"));
        ctx.logger().info("via context logger");
        ctx.span().in_scope(|| tracing::info!("via plain tracing"));
    });

    let records = json_records(&captured);
    assert_eq!(records.len(), 2);

    let logged = &records[0]["fields"];
    assert_eq!(logged["message"], "via context logger");
    assert_eq!(logged[REQUEST_ID_KEY], "req-json");
    assert_eq!(logged[TRACE_ID_KEY], "trace-json");
    let extra: Value = serde_json::from_str(logged["metadata"].as_str().unwrap()).unwrap();
    assert_eq!(extra["tenant"], "acme");

    let plain = &records[1];
    assert_eq!(plain["fields"]["message"], "via plain tracing");
    assert_eq!(plain["span"]["name"], "invocation");
    assert_eq!(plain["span"][REQUEST_ID_KEY], "req-json");
    assert_eq!(plain["span"][TRACE_ID_KEY], "trace-json");
}
