//! Server state management.
//!
//! `QuizStore` owns everything the gateway mutates: the quiz registry, the
//! progress tracker, the logical group of live connections per quiz and the
//! resume tokens of participants.
//! The server wraps it in a single mutex, so every event is applied to
//! completion before the next one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use super::registry::SessionRegistry;
use super::tracker::{AnswerPolicy, ProgressTracker};

/// Store shared by every connection.
pub type SharedStore = Arc<Mutex<QuizStore>>;

/// Volatile state of the quiz service. Lives from startup to shutdown.
pub struct QuizStore {
    pub registry: SessionRegistry,
    pub tracker: ProgressTracker,
    /// Live connections per quiz code.
    groups: HashMap<String, HashSet<Uuid>>,
    /// Resume token to participant id. Tokens never leave their connection.
    identities: HashMap<Uuid, Uuid>,
    policy: AnswerPolicy,
}

impl QuizStore {
    pub fn new(policy: AnswerPolicy) -> Self {
        Self::with_registry(SessionRegistry::new(), policy)
    }

    pub fn with_registry(registry: SessionRegistry, policy: AnswerPolicy) -> Self {
        Self {
            registry,
            tracker: ProgressTracker::new(),
            groups: HashMap::new(),
            identities: HashMap::new(),
            policy,
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn policy(&self) -> AnswerPolicy {
        self.policy
    }

    pub fn remember_identity(&mut self, resume_token: Uuid, participant: Uuid) {
        self.identities.insert(resume_token, participant);
    }

    /// Participant a resume token was issued for.
    pub fn resolve_identity(&self, resume_token: Uuid) -> Option<Uuid> {
        self.identities.get(&resume_token).copied()
    }

    /// Adds a connection to the group of a quiz.
    pub fn join_group(&mut self, code: &str, connection: Uuid) {
        self.groups
            .entry(code.to_string())
            .or_default()
            .insert(connection);
    }

    /// Removes a connection from every group it is part of.
    pub fn leave_all(&mut self, connection: Uuid) {
        self.groups.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
    }

    /// Number of live connections in the group of a quiz.
    pub fn group_size(&self, code: &str) -> usize {
        self.groups.get(code).map_or(0, HashSet::len)
    }
}

impl Default for QuizStore {
    fn default() -> Self {
        Self::new(AnswerPolicy::default())
    }
}
