use prometheus_client::metrics::{counter::Counter, family::Family, gauge::Gauge, histogram::Histogram};
use prometheus_client::registry::Registry;
use prometheus_client_derive_encode::{EncodeLabelSet, EncodeLabelValue};
use std::sync::{Arc, atomic::AtomicU64};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::debug;

const COLLECT_INTERVAL: Duration = Duration::from_secs(15);

/// Process-level gauges sampled in the background and exposed next to the
/// per-service request metrics on `/metrics`.
#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    resident_memory_bytes: Gauge,
    virtual_memory_bytes: Gauge,
    available_memory_bytes: Gauge,
    threads: Gauge,
    cpu_usage_percent: Gauge<f64, AtomicU64>,
    start_time_seconds: Gauge,
}

impl SystemMetrics {
    pub fn new() -> Self {
        let metrics = Self::default();
        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        metrics.start_time_seconds.set(started);
        metrics
    }

    pub fn register(&self, registry: &mut Registry) {
        let process = registry.sub_registry_with_prefix("marketplace_process");
        process.register(
            "resident_memory_bytes",
            "Resident memory of the server process",
            self.resident_memory_bytes.clone(),
        );
        process.register(
            "virtual_memory_bytes",
            "Virtual memory of the server process",
            self.virtual_memory_bytes.clone(),
        );
        process.register(
            "threads",
            "Threads owned by the server process",
            self.threads.clone(),
        );
        process.register(
            "start_time_seconds",
            "Process start time since the unix epoch",
            self.start_time_seconds.clone(),
        );

        let host = registry.sub_registry_with_prefix("marketplace_host");
        host.register(
            "available_memory_bytes",
            "Memory available to new allocations on the host",
            self.available_memory_bytes.clone(),
        );
        host.register(
            "cpu_usage_percent",
            "Global CPU usage across all cores",
            self.cpu_usage_percent.clone(),
        );
    }

    /// Refreshes every gauge from `sys`. CPU usage needs two refreshes
    /// to be meaningful, so the same `System` is reused across ticks.
    pub fn sample(&self, sys: &mut System) {
        let pid = Pid::from_u32(std::process::id());
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        self.available_memory_bytes
            .set(sys.available_memory() as i64);
        self.cpu_usage_percent.set(f64::from(sys.global_cpu_usage()));

        let Some(process) = sys.process(pid) else {
            debug!("Process {pid} not visible to sysinfo; skipping process gauges");
            return;
        };
        self.resident_memory_bytes.set(process.memory() as i64);
        self.virtual_memory_bytes.set(process.virtual_memory() as i64);
        if let Some(tasks) = process.tasks() {
            self.threads.set(tasks.len() as i64);
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Status {
    Success,
    Error,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct Labels {
    pub operation: String,
    pub method: Method,
    pub status: Status,
}

#[derive(Clone, Debug)]
pub struct Metrics {
    pub request_counter: Family<Labels, Counter>,
    pub request_duration: Family<Labels, Histogram>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            request_counter: Family::default(),
            request_duration: Family::new_with_constructor(|| {
                Histogram::new(vec![
                    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
                ])
            }),
        }
    }

    pub fn record(&self, operation: &str, method: Method, status: Status, duration_secs: f64) {
        let labels = Labels {
            operation: operation.to_string(),
            method,
            status,
        };
        self.request_counter.get_or_create(&labels).inc();
        self.request_duration
            .get_or_create(&labels)
            .observe(duration_secs);
    }
}

pub async fn run_metrics_collector(system_metrics: Arc<SystemMetrics>) {
    let mut sys = System::new();
    let mut interval = tokio::time::interval(COLLECT_INTERVAL);
    loop {
        interval.tick().await;
        system_metrics.sample(&mut sys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn records_are_labelled_by_operation_and_outcome() {
        let metrics = Metrics::new();
        metrics.record("checkout", Method::Post, Status::Success, 0.02);
        metrics.record("checkout", Method::Post, Status::Error, 0.01);

        let mut registry = Registry::default();
        registry.register(
            "marketplace_requests",
            "Requests",
            metrics.request_counter.clone(),
        );

        let mut out = String::new();
        encode(&mut out, &registry).unwrap();
        assert!(out.contains("operation=\"checkout\""));
        assert!(out.contains("status=\"Success\""));
        assert!(out.contains("status=\"Error\""));
    }

    #[test]
    fn process_gauges_are_prefixed() {
        let system = SystemMetrics::new();
        system.sample(&mut System::new());

        let mut registry = Registry::default();
        system.register(&mut registry);

        let mut out = String::new();
        encode(&mut out, &registry).unwrap();
        assert!(out.contains("marketplace_process_start_time_seconds"));
        assert!(out.contains("marketplace_host_available_memory_bytes"));
    }
}
