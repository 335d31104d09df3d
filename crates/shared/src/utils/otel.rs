use crate::utils::{Method, Metrics, Status};
use anyhow::{Context as _, Result};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource, logs::SdkLoggerProvider, metrics::SdkMeterProvider, trace::SdkTracerProvider,
};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};

pub struct Telemetry {
    resource: Resource,
    otel_endpoint: String,
    tracer: Option<SdkTracerProvider>,
    meter: Option<SdkMeterProvider>,
    logger: Option<SdkLoggerProvider>,
}

impl Telemetry {
    pub fn new(service_name: impl Into<String>, otel_endpoint: impl Into<String>) -> Self {
        Self {
            resource: Resource::builder()
                .with_service_name(service_name.into())
                .build(),
            otel_endpoint: otel_endpoint.into(),
            tracer: None,
            meter: None,
            logger: None,
        }
    }

    /// Installs global tracer and meter providers and returns the log provider
    /// for the tracing bridge.
    pub fn init(&mut self) -> Result<SdkLoggerProvider> {
        let span_exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create span exporter")?;

        let tracer = SdkTracerProvider::builder()
            .with_resource(self.resource.clone())
            .with_batch_exporter(span_exporter)
            .build();
        global::set_tracer_provider(tracer.clone());

        let metric_exporter = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create metric exporter")?;

        let meter = SdkMeterProvider::builder()
            .with_resource(self.resource.clone())
            .with_periodic_exporter(metric_exporter)
            .build();
        global::set_meter_provider(meter.clone());

        let log_exporter = LogExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create log exporter")?;

        let logger = SdkLoggerProvider::builder()
            .with_resource(self.resource.clone())
            .with_batch_exporter(log_exporter)
            .build();

        self.tracer = Some(tracer);
        self.meter = Some(meter);
        self.logger = Some(logger.clone());

        Ok(logger)
    }

    pub fn shutdown(self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(tracer) = self.tracer
            && let Err(e) = tracer.shutdown()
        {
            errors.push(format!("tracer provider: {e}"));
        }
        if let Some(meter) = self.meter
            && let Err(e) = meter.shutdown()
        {
            errors.push(format!("meter provider: {e}"));
        }
        if let Some(logger) = self.logger
            && let Err(e) = logger.shutdown()
        {
            errors.push(format!("logger provider: {e}"));
        }

        if !errors.is_empty() {
            anyhow::bail!("Failed to shutdown providers:\n{}", errors.join("\n"));
        }

        Ok(())
    }
}

pub struct TracingContext {
    pub cx: Context,
    pub operation: &'static str,
    pub method: Method,
    pub start_time: Instant,
}

/// Per-service span and latency bookkeeping. Every operation opens a span
/// with `start` and closes it with `success` or `failure`, which also records
/// the outcome in the shared request metrics.
#[derive(Clone)]
pub struct ServiceTracer {
    name: &'static str,
    metrics: Arc<Mutex<Metrics>>,
}

impl ServiceTracer {
    pub fn new(name: &'static str, metrics: Arc<Mutex<Metrics>>) -> Self {
        Self { name, metrics }
    }

    /// Gives the service its own request metrics, registered as
    /// `<prefix>_request_counter` and `<prefix>_request_duration`.
    pub async fn registered(
        name: &'static str,
        prefix: &str,
        registry: &Arc<Mutex<Registry>>,
    ) -> Self {
        let metrics = Metrics::new();
        {
            let mut registry = registry.lock().await;
            registry.register(
                format!("{prefix}_request_counter"),
                format!("Total number of requests to the {name}"),
                metrics.request_counter.clone(),
            );
            registry.register(
                format!("{prefix}_request_duration"),
                format!("Histogram of request durations for the {name}"),
                metrics.request_duration.clone(),
            );
        }

        Self::new(name, Arc::new(Mutex::new(metrics)))
    }

    fn tracer(&self) -> BoxedTracer {
        global::tracer(self.name)
    }

    pub fn start(
        &self,
        operation: &'static str,
        method: Method,
        attributes: Vec<KeyValue>,
    ) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.tracer();
        let mut span = tracer
            .span_builder(operation)
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation)],
        );

        TracingContext {
            cx: Context::current_with_span(span),
            operation,
            method,
            start_time,
        }
    }

    pub async fn success(&self, ctx: TracingContext, message: &str) {
        self.complete(ctx, true, message).await;
    }

    pub async fn failure(&self, ctx: TracingContext, message: &str) {
        self.complete(ctx, false, message).await;
    }

    /// Closes the span according to `result` and hands the result back.
    pub async fn finish<T, E: std::fmt::Display>(
        &self,
        ctx: TracingContext,
        result: Result<T, E>,
    ) -> Result<T, E> {
        match &result {
            Ok(_) => self.success(ctx, "completed").await,
            Err(e) => self.failure(ctx, &e.to_string()).await,
        }
        result
    }

    async fn complete(&self, ctx: TracingContext, is_success: bool, message: &str) {
        let (status_str, status) = if is_success {
            ("SUCCESS", Status::Success)
        } else {
            ("ERROR", Status::Error)
        };
        let elapsed = ctx.start_time.elapsed().as_secs_f64();

        let span = ctx.cx.span();
        span.add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("✅ {}::{} {message}", self.name, ctx.operation);
        } else {
            error!("❌ {}::{} failed: {message}", self.name, ctx.operation);
        }

        self.metrics
            .lock()
            .await
            .record(ctx.operation, ctx.method, status, elapsed);

        span.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finish_passes_result_through_and_counts_it() {
        let metrics = Arc::new(Mutex::new(Metrics::new()));
        let tracer = ServiceTracer::new("test-service", metrics.clone());

        let ctx = tracer.start("lookup", Method::Get, vec![]);
        let ok: Result<i32, String> = tracer.finish(ctx, Ok(7)).await;
        assert_eq!(ok, Ok(7));

        let ctx = tracer.start("lookup", Method::Get, vec![]);
        let err: Result<i32, String> = tracer.finish(ctx, Err("nope".into())).await;
        assert_eq!(err, Err("nope".to_string()));

        let guard = metrics.lock().await;
        let success = guard
            .request_counter
            .get_or_create(&crate::utils::metrics::Labels {
                operation: "lookup".into(),
                method: Method::Get,
                status: Status::Success,
            })
            .get();
        assert_eq!(success, 1);
    }
}
