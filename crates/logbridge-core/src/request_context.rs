use std::collections::HashMap;
use std::sync::Mutex;

/// Well-known key for the authoritative session id assigned by the host.
pub const HOST_SESSION_ID: &str = "host_session_id";

/// Well-known key for the session id self-reported by the browser agent.
pub const AGENT_SESSION_ID: &str = "agent_session_id";

/// Per-request context handed through the ingestion pipeline.
///
/// Carries the caller identity (empty for anonymous callers) and a
/// request-scoped key/value store that earlier pipeline steps use to pass
/// the host/agent session ids downstream. The store is interior-mutable so
/// the correlator can write the resolved session id back for the sink call.
#[derive(Debug, Default)]
pub struct RequestContext {
    identity: Option<String>,
    values: Mutex<HashMap<String, String>>,
}

impl RequestContext {
    pub fn new(identity: Option<String>) -> Self {
        Self {
            identity,
            values: Mutex::new(HashMap::new()),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// Identity label for sink calls; empty string for anonymous callers.
    pub fn identity_label(&self) -> String {
        self.identity.clone().unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.into());
    }

    pub fn host_session_id(&self) -> Option<String> {
        self.get(HOST_SESSION_ID).filter(|v| !v.is_empty())
    }

    pub fn agent_session_id(&self) -> Option<String> {
        self.get(AGENT_SESSION_ID).filter(|v| !v.is_empty())
    }
}
