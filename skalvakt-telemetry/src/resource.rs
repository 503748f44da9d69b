//! ## skalvakt-telemetry::resource
//! **Scalable resource kinds and their label schemas**
//!
//! Scaler metrics are published per scaled resource. The two resource kinds
//! that carry scaler series (`ScaledObject` and `ScaledJob`) use parallel
//! series with a kind-specific resource label, so the kind decides both which
//! series a recording routes to and which label schema it uses.

/// Routing key for ScaledObject resources.
pub const SCALED_OBJECT_RESOURCE: &str = "scaled_object";
/// Routing key for ScaledJob resources.
pub const SCALED_JOB_RESOURCE: &str = "scaled_job";
/// Routing key for ClusterTriggerAuthentication resources.
pub const CLUSTER_TRIGGER_AUTHENTICATION_RESOURCE: &str = "cluster_trigger_authentication";
/// Routing key for TriggerAuthentication resources.
pub const TRIGGER_AUTHENTICATION_RESOURCE: &str = "trigger_authentication";

const SCALED_OBJECT_METRIC_LABELS: [&str; 5] =
    ["namespace", "metric", "scaledObject", "scaler", "scalerIndex"];
const SCALED_JOB_METRIC_LABELS: [&str; 5] =
    ["namespace", "metric", "scaledJob", "scaler", "scalerIndex"];

const SCALED_OBJECT_ERROR_LABELS: [&str; 2] = ["namespace", "scaledObject"];
const SCALED_JOB_ERROR_LABELS: [&str; 2] = ["namespace", "scaledJob"];

/// A scaled resource kind that carries per-scaler metric series.
///
/// Only these two kinds route to scaler series; trigger authentication
/// resources are counted through the resource totals gauge instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalableResource {
    ScaledObject,
    ScaledJob,
}

impl ScalableResource {
    /// Parse a routing key into a resource kind.
    ///
    /// Returns `None` for any key that does not carry scaler series, so
    /// callers at the string boundary skip recording instead of guessing.
    pub fn parse(resource_type: &str) -> Option<Self> {
        match resource_type {
            SCALED_OBJECT_RESOURCE => Some(Self::ScaledObject),
            SCALED_JOB_RESOURCE => Some(Self::ScaledJob),
            _ => None,
        }
    }

    /// The routing key for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScaledObject => SCALED_OBJECT_RESOURCE,
            Self::ScaledJob => SCALED_JOB_RESOURCE,
        }
    }

    /// Label names for the per-scaler series of this kind.
    pub(crate) fn metric_label_names(self) -> &'static [&'static str] {
        match self {
            Self::ScaledObject => &SCALED_OBJECT_METRIC_LABELS,
            Self::ScaledJob => &SCALED_JOB_METRIC_LABELS,
        }
    }

    /// Label names for the resource-level error series of this kind.
    pub(crate) fn error_label_names(self) -> &'static [&'static str] {
        match self {
            Self::ScaledObject => &SCALED_OBJECT_ERROR_LABELS,
            Self::ScaledJob => &SCALED_JOB_ERROR_LABELS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(
            ScalableResource::parse("scaled_object"),
            Some(ScalableResource::ScaledObject)
        );
        assert_eq!(
            ScalableResource::parse("scaled_job"),
            Some(ScalableResource::ScaledJob)
        );
    }

    #[test]
    fn parse_rejects_non_scalable_kinds() {
        assert_eq!(ScalableResource::parse(""), None);
        assert_eq!(ScalableResource::parse("bogus"), None);
        // Authentication resources exist as routing keys but carry no scaler series.
        assert_eq!(
            ScalableResource::parse(CLUSTER_TRIGGER_AUTHENTICATION_RESOURCE),
            None
        );
        assert_eq!(ScalableResource::parse(TRIGGER_AUTHENTICATION_RESOURCE), None);
    }

    #[test]
    fn round_trips_through_routing_key() {
        for kind in [ScalableResource::ScaledObject, ScalableResource::ScaledJob] {
            assert_eq!(ScalableResource::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn label_schemas_differ_only_in_resource_label() {
        let object = ScalableResource::ScaledObject.metric_label_names();
        let job = ScalableResource::ScaledJob.metric_label_names();
        assert_eq!(object[2], "scaledObject");
        assert_eq!(job[2], "scaledJob");
        assert_eq!(&object[..2], &job[..2]);
        assert_eq!(&object[3..], &job[3..]);
    }
}
