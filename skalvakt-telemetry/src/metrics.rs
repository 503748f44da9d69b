//! ## skalvakt-telemetry::metrics
//! **KEDA-compatible Prometheus recorder for the scaling control loop**
//!
//! One [`MetricsRecorder`] is constructed at process start and shared by all
//! reconciliation workers. It owns its own `prometheus::Registry` together
//! with every exported series, so tests and embedders can run isolated
//! instances instead of touching process-global state.
//!
//! Series names and label schemas follow the published `keda_*` schema
//! exactly, so existing dashboards and alerts keep working unchanged.
//!
//! Recording never fails from the caller's point of view: a rejected registry
//! write is logged at error severity and swallowed, since metrics must not
//! affect control-plane behavior.

use prometheus::{Encoder, GaugeVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::error;

use crate::resource::ScalableResource;

/// Prometheus namespace shared by every exported series.
pub const METRICS_NAMESPACE: &str = "keda";

const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};
const TOOLCHAIN_VERSION: &str = match option_env!("RUSTC_VERSION") {
    Some(version) => version,
    None => "unknown",
};

// Label keys are part of the published schema consumed by existing
// dashboards; the toolchain labels keep their historical names.
const BUILD_INFO_LABELS: [&str; 5] = ["version", "git_commit", "goversion", "goos", "goarch"];

const TRIGGER_TOTALS_LABELS: [&str; 1] = ["type"];
const RESOURCE_TOTALS_LABELS: [&str; 2] = ["type", "namespace"];
const LOOP_LATENCY_LABELS: [&str; 3] = ["namespace", "type", "resource"];

/// Recorder for the controller's operational metrics.
///
/// Cloning is cheap: clones share the same registry and series handles.
#[derive(Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,

    build_info: GaugeVec,
    scaler_errors_total: IntCounter,

    scaled_object_metrics_value: GaugeVec,
    scaled_object_metrics_latency: GaugeVec,
    scaled_object_active: GaugeVec,
    scaled_object_scaler_errors: IntCounterVec,
    scaled_object_errors: IntCounterVec,

    scaled_job_metrics_value: GaugeVec,
    scaled_job_metrics_latency: GaugeVec,
    scaled_job_active: GaugeVec,
    scaled_job_scaler_errors: IntCounterVec,
    scaled_job_errors: IntCounterVec,

    trigger_totals: GaugeVec,
    resource_totals: GaugeVec,
    internal_loop_latency: GaugeVec,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    /// Create a recorder with a fresh registry and register every series.
    ///
    /// Series descriptors are static, so registration on the fresh registry
    /// cannot conflict; a duplicate here is a programming error.
    pub fn new() -> Self {
        let registry = Registry::new();

        let build_info = register_gauge_vec(
            &registry,
            None,
            "build_info",
            "A metric with a constant '1' value labeled by version, git_commit and toolchain from which the controller was built.",
            &BUILD_INFO_LABELS,
        );
        let scaler_errors_total = register_counter(
            &registry,
            "scaler",
            "errors_total",
            "Total number of errors for all scalers",
        );

        let scaled_object_metrics_value = register_gauge_vec(
            &registry,
            Some("scaler"),
            "scaledobject_metrics_value",
            "Metric Value used for HPA",
            ScalableResource::ScaledObject.metric_label_names(),
        );
        let scaled_object_metrics_latency = register_gauge_vec(
            &registry,
            Some("scaler"),
            "scaledobject_metrics_latency",
            "Scaler Metrics Latency",
            ScalableResource::ScaledObject.metric_label_names(),
        );
        let scaled_object_active = register_gauge_vec(
            &registry,
            Some("scaler"),
            "scaledobject_active",
            "Activity of a Scaler Metric",
            ScalableResource::ScaledObject.metric_label_names(),
        );
        let scaled_object_scaler_errors = register_counter_vec(
            &registry,
            Some("scaler"),
            "scaledobject_errors",
            "Number of scaler errors",
            ScalableResource::ScaledObject.metric_label_names(),
        );
        let scaled_object_errors = register_counter_vec(
            &registry,
            Some("scaled_object"),
            "errors",
            "Number of scaled object errors",
            ScalableResource::ScaledObject.error_label_names(),
        );

        let scaled_job_metrics_value = register_gauge_vec(
            &registry,
            Some("scaler"),
            "scaledjob_metrics_value",
            "Metric Value used for HPA",
            ScalableResource::ScaledJob.metric_label_names(),
        );
        let scaled_job_metrics_latency = register_gauge_vec(
            &registry,
            Some("scaler"),
            "scaledjob_metrics_latency",
            "Scaler Metrics Latency",
            ScalableResource::ScaledJob.metric_label_names(),
        );
        let scaled_job_active = register_gauge_vec(
            &registry,
            Some("scaler"),
            "scaledjob_active",
            "Activity of a Scaler Metric",
            ScalableResource::ScaledJob.metric_label_names(),
        );
        let scaled_job_scaler_errors = register_counter_vec(
            &registry,
            Some("scaler"),
            "scaledjob_errors",
            "Number of scaler errors",
            ScalableResource::ScaledJob.metric_label_names(),
        );
        let scaled_job_errors = register_counter_vec(
            &registry,
            Some("scaled_job"),
            "errors",
            "Number of scaled job errors",
            ScalableResource::ScaledJob.error_label_names(),
        );

        let trigger_totals = register_gauge_vec(
            &registry,
            Some("trigger"),
            "totals",
            "Total number of triggers per trigger type",
            &TRIGGER_TOTALS_LABELS,
        );
        let resource_totals = register_gauge_vec(
            &registry,
            Some("resource"),
            "totals",
            "Total number of custom resources per namespace",
            &RESOURCE_TOTALS_LABELS,
        );
        let internal_loop_latency = register_gauge_vec(
            &registry,
            Some("internal_scale_loop"),
            "latency",
            "Internal latency of ScaledObject/ScaledJob loop execution",
            &LOOP_LATENCY_LABELS,
        );

        let recorder = Self {
            registry,
            build_info,
            scaler_errors_total,
            scaled_object_metrics_value,
            scaled_object_metrics_latency,
            scaled_object_active,
            scaled_object_scaler_errors,
            scaled_object_errors,
            scaled_job_metrics_value,
            scaled_job_metrics_latency,
            scaled_job_active,
            scaled_job_scaler_errors,
            scaled_job_errors,
            trigger_totals,
            resource_totals,
            internal_loop_latency,
        };
        recorder.record_build_info();
        recorder
    }

    /// Record the value of an external metric as evaluated by a scaler.
    pub fn record_scaler_metric(
        &self,
        namespace: &str,
        scaled_resource: &str,
        scaler: &str,
        scaler_index: usize,
        metric: &str,
        value: f64,
        resource: ScalableResource,
    ) {
        let index = scaler_index.to_string();
        let labels = scaler_label_values(namespace, scaled_resource, scaler, &index, metric);
        self.metrics_value(resource)
            .with_label_values(&labels)
            .set(value);
    }

    /// Record the latency of retrieving an external metric, in seconds.
    pub fn record_scaler_latency(
        &self,
        namespace: &str,
        scaled_resource: &str,
        scaler: &str,
        scaler_index: usize,
        metric: &str,
        value: f64,
        resource: ScalableResource,
    ) {
        let index = scaler_index.to_string();
        let labels = scaler_label_values(namespace, scaled_resource, scaler, &index, metric);
        self.metrics_latency(resource)
            .with_label_values(&labels)
            .set(value);
    }

    /// Record whether a scaler currently reports activity.
    pub fn record_scaler_active(
        &self,
        namespace: &str,
        scaled_resource: &str,
        scaler: &str,
        scaler_index: usize,
        metric: &str,
        active: bool,
        resource: ScalableResource,
    ) {
        let active_value = if active { 1.0 } else { 0.0 };
        let index = scaler_index.to_string();
        let labels = scaler_label_values(namespace, scaled_resource, scaler, &index, metric);
        self.scaler_active(resource)
            .with_label_values(&labels)
            .set(active_value);
    }

    /// Record the outcome of a scaler evaluation.
    ///
    /// A failure increments the per-scaler error series, the resource-level
    /// error series, and the global error total. A success zero-initializes
    /// the per-scaler series so consumers see an explicit `0` rather than a
    /// missing series.
    pub fn record_scaler_error(
        &self,
        namespace: &str,
        scaled_resource: &str,
        scaler: &str,
        scaler_index: usize,
        metric: &str,
        err: Option<&dyn std::error::Error>,
        resource: ScalableResource,
    ) {
        let index = scaler_index.to_string();
        let labels = scaler_label_values(namespace, scaled_resource, scaler, &index, metric);
        match err {
            Some(err) => {
                self.scaler_errors(resource).with_label_values(&labels).inc();
                self.record_scaled_object_error(namespace, scaled_resource, Some(err), resource);
                self.scaler_errors_total.inc();
            }
            None => self.ensure_observed(self.scaler_errors(resource), &labels),
        }
    }

    /// Record the outcome of a reconciliation at resource granularity.
    ///
    /// Same zero-init/increment duality as [`Self::record_scaler_error`],
    /// scoped to the `(namespace, resource)` label tuple.
    pub fn record_scaled_object_error(
        &self,
        namespace: &str,
        scaled_resource: &str,
        err: Option<&dyn std::error::Error>,
        resource: ScalableResource,
    ) {
        let labels = [namespace, scaled_resource];
        if err.is_some() {
            self.resource_errors(resource)
                .with_label_values(&labels)
                .inc();
        } else {
            self.ensure_observed(self.resource_errors(resource), &labels);
        }
    }

    /// Record the wall-clock latency of one scalable-object loop execution,
    /// in seconds.
    pub fn record_scalable_object_latency(
        &self,
        namespace: &str,
        name: &str,
        is_scaled_object: bool,
        value: f64,
    ) {
        let resource_type = if is_scaled_object {
            "scaledobject"
        } else {
            "scaledjob"
        };
        self.internal_loop_latency
            .with_label_values(&[namespace, resource_type, name])
            .set(value);
    }

    /// Publish version and platform metadata as a constant-1 gauge.
    ///
    /// Invoked once from the constructor; calling it again is harmless.
    pub fn record_build_info(&self) {
        self.build_info
            .with_label_values(&[
                VERSION,
                GIT_COMMIT,
                TOOLCHAIN_VERSION,
                std::env::consts::OS,
                std::env::consts::ARCH,
            ])
            .set(1.0);
    }

    /// Count one more live trigger of the given type. Empty types are ignored.
    pub fn increment_trigger_total(&self, trigger_type: &str) {
        if !trigger_type.is_empty() {
            self.trigger_totals
                .with_label_values(&[trigger_type])
                .inc();
        }
    }

    /// Count one less live trigger of the given type. Empty types are ignored.
    pub fn decrement_trigger_total(&self, trigger_type: &str) {
        if !trigger_type.is_empty() {
            self.trigger_totals
                .with_label_values(&[trigger_type])
                .dec();
        }
    }

    /// Count one more live custom resource of the given type.
    pub fn increment_crd_total(&self, crd_type: &str, namespace: &str) {
        self.resource_totals
            .with_label_values(&[crd_type, normalize_namespace(namespace)])
            .inc();
    }

    /// Count one less live custom resource of the given type.
    pub fn decrement_crd_total(&self, crd_type: &str, namespace: &str) {
        self.resource_totals
            .with_label_values(&[crd_type, normalize_namespace(namespace)])
            .dec();
    }

    /// Render every registered series in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("text exposition is UTF-8"))
    }

    /// Create the datapoint for `labels` at zero without incrementing it.
    ///
    /// An explicit `0` distinguishes "evaluated without errors" from "never
    /// evaluated"; a missing series would read as no data downstream. A
    /// rejected label tuple is logged and swallowed.
    fn ensure_observed(&self, series: &IntCounterVec, labels: &[&str]) {
        if let Err(err) = series.get_metric_with_label_values(labels) {
            error!(error = %err, "unable to initialize error series datapoint");
        }
    }

    fn metrics_value(&self, resource: ScalableResource) -> &GaugeVec {
        match resource {
            ScalableResource::ScaledObject => &self.scaled_object_metrics_value,
            ScalableResource::ScaledJob => &self.scaled_job_metrics_value,
        }
    }

    fn metrics_latency(&self, resource: ScalableResource) -> &GaugeVec {
        match resource {
            ScalableResource::ScaledObject => &self.scaled_object_metrics_latency,
            ScalableResource::ScaledJob => &self.scaled_job_metrics_latency,
        }
    }

    fn scaler_active(&self, resource: ScalableResource) -> &GaugeVec {
        match resource {
            ScalableResource::ScaledObject => &self.scaled_object_active,
            ScalableResource::ScaledJob => &self.scaled_job_active,
        }
    }

    fn scaler_errors(&self, resource: ScalableResource) -> &IntCounterVec {
        match resource {
            ScalableResource::ScaledObject => &self.scaled_object_scaler_errors,
            ScalableResource::ScaledJob => &self.scaled_job_scaler_errors,
        }
    }

    fn resource_errors(&self, resource: ScalableResource) -> &IntCounterVec {
        match resource {
            ScalableResource::ScaledObject => &self.scaled_object_errors,
            ScalableResource::ScaledJob => &self.scaled_job_errors,
        }
    }
}

/// Values ordered to match [`ScalableResource::metric_label_names`].
fn scaler_label_values<'a>(
    namespace: &'a str,
    scaled_resource: &'a str,
    scaler: &'a str,
    scaler_index: &'a str,
    metric: &'a str,
) -> [&'a str; 5] {
    [namespace, metric, scaled_resource, scaler, scaler_index]
}

fn normalize_namespace(namespace: &str) -> &str {
    if namespace.is_empty() {
        "default"
    } else {
        namespace
    }
}

fn register_gauge_vec(
    registry: &Registry,
    subsystem: Option<&str>,
    name: &str,
    help: &str,
    labels: &[&str],
) -> GaugeVec {
    let gauge = GaugeVec::new(build_opts(subsystem, name, help), labels)
        .expect("static gauge descriptor");
    registry
        .register(Box::new(gauge.clone()))
        .expect("fresh registry");
    gauge
}

fn register_counter_vec(
    registry: &Registry,
    subsystem: Option<&str>,
    name: &str,
    help: &str,
    labels: &[&str],
) -> IntCounterVec {
    let counter = IntCounterVec::new(build_opts(subsystem, name, help), labels)
        .expect("static counter descriptor");
    registry
        .register(Box::new(counter.clone()))
        .expect("fresh registry");
    counter
}

fn register_counter(registry: &Registry, subsystem: &str, name: &str, help: &str) -> IntCounter {
    let counter =
        IntCounter::with_opts(build_opts(Some(subsystem), name, help)).expect("static descriptor");
    registry
        .register(Box::new(counter.clone()))
        .expect("fresh registry");
    counter
}

fn build_opts(subsystem: Option<&str>, name: &str, help: &str) -> Opts {
    let mut opts = Opts::new(name, help).namespace(METRICS_NAMESPACE);
    if let Some(subsystem) = subsystem {
        opts = opts.subsystem(subsystem);
    }
    opts
}
