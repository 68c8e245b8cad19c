//! Tags in-flight requests so late responses can be recognised.
//!
//! Requests are never cancelled: a response always arrives eventually, in
//! whatever order the network delivers it. Each issued request gets a
//! [`Ticket`]; the response handler asks the tracker whether that ticket may
//! still change the view.

/// What to do with a response whose request has been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponsePolicy {
    /// Only the most recently issued request may apply its response.
    #[default]
    LatestSelection,
    /// Every response applies, in arrival order (last arrival wins).
    ArrivalOrder,
}

/// Identifies one issued request and what it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }
}

#[derive(Debug, Clone)]
pub struct RequestTracker {
    policy: ResponsePolicy,
    current: u64,
}

impl RequestTracker {
    pub fn new(policy: ResponsePolicy) -> Self {
        Self { policy, current: 0 }
    }

    pub fn policy(&self) -> ResponsePolicy {
        self.policy
    }

    /// Issue a ticket for a new request, superseding all earlier ones.
    pub fn issue<K>(&mut self, key: K) -> Ticket<K> {
        self.current += 1;
        Ticket {
            generation: self.current,
            key,
        }
    }

    pub fn is_current<K>(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.current
    }

    /// Whether a response carrying `ticket` may apply under the policy.
    pub fn admits<K>(&self, ticket: &Ticket<K>) -> bool {
        match self.policy {
            ResponsePolicy::LatestSelection => self.is_current(ticket),
            ResponsePolicy::ArrivalOrder => true,
        }
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new(ResponsePolicy::default())
    }
}
