//! # Skalvakt Telemetry and Monitoring
//!
//! Crate for the autoscaling controller's metrics recording and logging.
//!
//! Reconciliation workers report scaler evaluations, errors, trigger and
//! resource counts through a shared [`MetricsRecorder`], which owns the
//! Prometheus registry and the full set of exported series.

pub mod logging;
pub mod metrics;
pub mod resource;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
pub use resource::ScalableResource;
