use super::GuestDraft;
use dashmap::DashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Where a registration attempt ended up after one tool call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationStage {
    Unstaged,
    Prepared,
    Committed,
    Rejected,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RegistrationStage::Unstaged => "unstaged",
            RegistrationStage::Prepared => "prepared",
            RegistrationStage::Committed => "committed",
            RegistrationStage::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// Correlates a confirm with the prepare that showed the same four values.
/// The key is a digest, so guest details never show up in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CorrelationKey(u64);

impl CorrelationKey {
    pub fn for_draft(draft: &GuestDraft) -> Self {
        let mut hasher = DefaultHasher::new();
        draft.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuditStats {
    pub prepared: u64,
    pub committed: u64,
    pub rejected: u64,
    pub unmatched_confirms: u64,
}

/// Observes staged-commit transitions. It never blocks or alters a tool result:
/// the Prepared state stays advisory, this only makes it visible in the trace.
pub struct RegistrationAudit {
    prepared: DashMap<CorrelationKey, Instant>,
    ttl: Duration,
    prepared_total: AtomicU64,
    committed_total: AtomicU64,
    rejected_total: AtomicU64,
    unmatched_total: AtomicU64,
}

impl RegistrationAudit {
    pub fn new(ttl: Duration) -> Self {
        Self {
            prepared: DashMap::new(),
            ttl,
            prepared_total: AtomicU64::new(0),
            committed_total: AtomicU64::new(0),
            rejected_total: AtomicU64::new(0),
            unmatched_total: AtomicU64::new(0),
        }
    }

    pub fn record_prepared(&self, key: CorrelationKey) {
        self.evict_expired();
        self.prepared.insert(key, Instant::now());
        self.prepared_total.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            correlation = %key,
            stage = %RegistrationStage::Prepared,
            "guest registration staged"
        );
    }

    /// Returns whether a live prepare with the same values preceded this confirm.
    pub fn record_committed(&self, key: CorrelationKey) -> bool {
        self.evict_expired();
        let matched = self.prepared.remove(&key).is_some();
        self.committed_total.fetch_add(1, Ordering::Relaxed);

        if matched {
            tracing::info!(
                correlation = %key,
                stage = %RegistrationStage::Committed,
                "guest registration committed"
            );
        } else {
            self.unmatched_total.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                correlation = %key,
                stage = %RegistrationStage::Committed,
                "guest registration committed without a matching prepare"
            );
        }
        matched
    }

    pub fn record_rejected(&self, from: RegistrationStage, reason: &str) {
        self.rejected_total.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            %from,
            stage = %RegistrationStage::Rejected,
            reason,
            "guest registration rejected"
        );
    }

    pub fn is_pending(&self, key: &CorrelationKey) -> bool {
        self.prepared
            .get(key)
            .is_some_and(|staged_at| staged_at.elapsed() < self.ttl)
    }

    pub fn stats(&self) -> AuditStats {
        AuditStats {
            prepared: self.prepared_total.load(Ordering::Relaxed),
            committed: self.committed_total.load(Ordering::Relaxed),
            rejected: self.rejected_total.load(Ordering::Relaxed),
            unmatched_confirms: self.unmatched_total.load(Ordering::Relaxed),
        }
    }

    fn evict_expired(&self) {
        let ttl = self.ttl;
        self.prepared.retain(|_, staged_at| staged_at.elapsed() < ttl);
    }
}
