/// Service name reported to every downstream system (logs, Postgres, metrics).
pub const SERVICE_NAME: &str = "evaluation-coordinator";

/// Postgres schema owned by this service.
pub const SCHEMA_NAME: &str = "evaluation_coordinator";

/// Identifies this process to downstream infrastructure.
///
/// Set once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub service_name: String,
    pub schema_name: Option<String>,
}

impl ServiceIdentity {
    // ---
    /// The identity of the evaluation coordinator. Not configurable.
    pub fn evaluation_coordinator() -> Self {
        // ---
        Self {
            service_name: SERVICE_NAME.to_string(),
            schema_name: Some(SCHEMA_NAME.to_string()),
        }
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self::evaluation_coordinator()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn default_identity_is_evaluation_coordinator() {
        // ---
        let identity = ServiceIdentity::default();
        assert_eq!(identity.service_name, "evaluation-coordinator");
        assert_eq!(identity.schema_name.as_deref(), Some("evaluation_coordinator"));
    }
}
