mod currency;
mod logs;
mod metrics;
mod otel;
mod random_string;
mod shutdown;
mod template;

pub use self::currency::format_vnd;
pub use self::logs::init_logger;
pub use self::metrics::{Method, Metrics, Status, SystemMetrics, run_metrics_collector};
pub use self::otel::{ServiceTracer, Telemetry, TracingContext};
pub use self::random_string::generate_random_string;
pub use self::shutdown::shutdown_signal;
pub use self::template::{EmailTemplate, EmailTemplateData, render_email};
