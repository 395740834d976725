use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use logbridge_core::RequestContext;
use tracing::debug;

/// Default idle TTL for correlation entries. A tunable, not a contract:
/// callers that need a different window pass their own duration.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(600);

struct CorrelationEntry {
    host_session_id: String,
    last_seen: Instant,
}

/// Maps agent-declared session ids to the host's authoritative session ids.
///
/// The mapping is a best-effort cache, not a source of truth: the host
/// session id carried by the request context is always authoritative.
/// Entries are created on first sighting of an agent session, refreshed on
/// every subsequent sighting, and dropped once unseen for longer than the
/// idle TTL. Expiry is never observable as an error; a request that
/// re-associates an expired key transparently re-creates it.
///
/// All read-modify-write access goes through one lock, which serializes
/// upserts per key (and across keys, which is stronger than required but
/// harmless at this cache's scale).
pub struct SessionCorrelator {
    ttl: Duration,
    entries: RwLock<HashMap<String, CorrelationEntry>>,
}

impl SessionCorrelator {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the effective session id for a request.
    ///
    /// When the context carries both a host session id and a non-empty
    /// agent session id, the two are associated (idempotent upsert) and the
    /// host id wins. Without an agent id the context's host id is the best
    /// we have; without a host id we fall back to the cached mapping. An
    /// anonymous request with no session information resolves to an empty
    /// id rather than failing.
    pub fn resolve(&self, ctx: &RequestContext) -> String {
        let host_id = ctx.host_session_id();
        let agent_id = ctx.agent_session_id();

        match (host_id, agent_id) {
            (Some(host), Some(agent)) => {
                self.associate(&agent, &host);
                host
            }
            (Some(host), None) => host,
            (None, Some(agent)) => self.lookup(&agent).unwrap_or_default(),
            (None, None) => String::new(),
        }
    }

    /// Upsert the mapping for an agent session id, refreshing its TTL.
    pub fn associate(&self, agent_session_id: &str, host_session_id: &str) {
        if agent_session_id.is_empty() {
            return;
        }

        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .entry(agent_session_id.to_string())
            .or_insert_with(|| {
                debug!(
                    agent_session_id,
                    host_session_id, "creating session correlation entry"
                );
                CorrelationEntry {
                    host_session_id: host_session_id.to_string(),
                    last_seen: Instant::now(),
                }
            });
        entry.host_session_id = host_session_id.to_string();
        entry.last_seen = Instant::now();
    }

    /// Look up the host session id for an agent session id, refreshing the
    /// entry when found. Expired entries read as absent.
    pub fn lookup(&self, agent_session_id: &str) -> Option<String> {
        let mut entries = self.entries.write().unwrap();
        match entries.get_mut(agent_session_id) {
            Some(entry) if entry.last_seen.elapsed() <= self.ttl => {
                entry.last_seen = Instant::now();
                Some(entry.host_session_id.clone())
            }
            Some(_) => {
                entries.remove(agent_session_id);
                None
            }
            None => None,
        }
    }

    /// Drop every entry unseen for longer than the idle TTL.
    pub fn purge_expired(&self) {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.last_seen.elapsed() <= self.ttl);
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "purged expired session correlations");
        }
    }

    /// Remove all entries (test teardown / shutdown).
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

impl Default for SessionCorrelator {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logbridge_core::{AGENT_SESSION_ID, HOST_SESSION_ID};

    fn ctx_with(host: Option<&str>, agent: Option<&str>) -> RequestContext {
        let ctx = RequestContext::anonymous();
        if let Some(host) = host {
            ctx.set(HOST_SESSION_ID, host);
        }
        if let Some(agent) = agent {
            ctx.set(AGENT_SESSION_ID, agent);
        }
        ctx
    }

    #[test]
    fn host_id_wins_and_association_is_recorded() {
        let correlator = SessionCorrelator::default();
        let ctx = ctx_with(Some("host-1"), Some("agent-1"));

        assert_eq!(correlator.resolve(&ctx), "host-1");
        assert_eq!(correlator.lookup("agent-1"), Some("host-1".to_string()));
    }

    #[test]
    fn correlation_is_stable_across_requests() {
        let correlator = SessionCorrelator::default();

        let first = ctx_with(Some("host-1"), Some("agent-1"));
        assert_eq!(correlator.resolve(&first), "host-1");

        // Second request carries only the agent id; resolves from the cache.
        let second = ctx_with(None, Some("agent-1"));
        assert_eq!(correlator.resolve(&second), "host-1");
    }

    #[test]
    fn association_upsert_is_idempotent() {
        let correlator = SessionCorrelator::default();
        correlator.associate("agent-1", "host-1");
        correlator.associate("agent-1", "host-1");
        assert_eq!(correlator.len(), 1);
        assert_eq!(correlator.lookup("agent-1"), Some("host-1".to_string()));
    }

    #[test]
    fn reassociation_after_reconnect_overwrites() {
        let correlator = SessionCorrelator::default();
        correlator.associate("agent-1", "host-1");
        correlator.associate("agent-1", "host-2");
        assert_eq!(correlator.lookup("agent-1"), Some("host-2".to_string()));
    }

    #[test]
    fn anonymous_request_degrades_to_empty_id() {
        let correlator = SessionCorrelator::default();
        let ctx = ctx_with(None, None);
        assert_eq!(correlator.resolve(&ctx), "");
    }

    #[test]
    fn cleared_agent_session_falls_back_to_host_id() {
        let correlator = SessionCorrelator::default();
        // Client issued an explicit "clear": agent session id is empty.
        let ctx = ctx_with(Some("host-9"), None);
        assert_eq!(correlator.resolve(&ctx), "host-9");
        assert!(correlator.is_empty());
    }

    #[test]
    fn unknown_agent_session_resolves_empty() {
        let correlator = SessionCorrelator::default();
        let ctx = ctx_with(None, Some("never-seen"));
        assert_eq!(correlator.resolve(&ctx), "");
    }

    #[test]
    fn expired_entry_reads_as_absent_and_recreates_transparently() {
        let correlator = SessionCorrelator::new(Duration::from_millis(10));
        correlator.associate("agent-1", "host-1");

        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(correlator.lookup("agent-1"), None);

        // Re-association after expiry behaves exactly like a first sighting.
        correlator.associate("agent-1", "host-2");
        assert_eq!(correlator.lookup("agent-1"), Some("host-2".to_string()));
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let correlator = SessionCorrelator::new(Duration::from_millis(20));
        correlator.associate("old", "host-1");
        std::thread::sleep(Duration::from_millis(30));
        correlator.associate("fresh", "host-2");

        correlator.purge_expired();
        assert_eq!(correlator.len(), 1);
        assert_eq!(correlator.lookup("fresh"), Some("host-2".to_string()));
    }

    #[test]
    fn clear_removes_everything() {
        let correlator = SessionCorrelator::default();
        correlator.associate("a", "h1");
        correlator.associate("b", "h2");
        correlator.clear();
        assert!(correlator.is_empty());
    }
}
