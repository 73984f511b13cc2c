// LeadDesk - store/requests.rs
//
// In-memory request collection with CRUD operations, timestamp stamping,
// and push-based change subscriptions. This layer is the in-process
// stand-in for the hosted document store's realtime listener: every
// mutation notifies all subscribers with a fresh full snapshot, and the
// core transforms are re-run on each push.
//
// Single-threaded and synchronous: callbacks run inline on the mutating
// call, there is no locking and no cancellation.

use crate::core::model::{Priority, Request, RequestStatus};
use crate::util::error::StoreError;
use chrono::Local;
use std::collections::HashSet;
use std::fmt;

/// Callback receiving the full request collection after each change.
pub type RequestSubscriber = Box<dyn FnMut(&[Request])>;

/// Handle returned by [`RequestStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Fields supplied when creating a request. The store assigns the id,
/// forces the status to `New`, and stamps both timestamps itself.
#[derive(Debug, Clone, Default)]
pub struct NewRequest {
    pub full_name: String,
    pub phone: String,
    pub birth_date: Option<String>,
    pub source: String,
    pub comment: Option<String>,
    pub tags: Vec<String>,
    pub assigned_to: Option<String>,
    pub priority: Priority,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

/// Partial update of a request's descriptive fields. `None` fields are
/// left unchanged; status changes go through
/// [`RequestStore::update_status`] instead.
#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub source: Option<String>,
    pub comment: Option<String>,
    pub tags: Option<Vec<String>>,
    pub assigned_to: Option<String>,
    pub priority: Option<Priority>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

/// The in-memory request collection.
pub struct RequestStore {
    requests: Vec<Request>,
    subscribers: Vec<(SubscriptionId, RequestSubscriber)>,
    next_subscription: u64,
    next_record: u64,
}

impl fmt::Debug for RequestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestStore")
            .field("requests", &self.requests.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for RequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 1,
            next_record: 1,
        }
    }

    /// Seed a store from an existing collection (e.g. a loaded snapshot).
    /// Record ids in the seed are kept verbatim; a repeated id is
    /// rejected with [`StoreError::DuplicateId`] so the id-uniqueness
    /// invariant holds from the first read.
    pub fn from_requests(requests: Vec<Request>) -> Result<Self, StoreError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for request in &requests {
            if !seen.insert(request.id.as_str()) {
                return Err(StoreError::DuplicateId {
                    collection: "requests",
                    id: request.id.clone(),
                });
            }
        }
        Ok(Self {
            requests,
            subscribers: Vec::new(),
            next_subscription: 1,
            next_record: 1,
        })
    }

    /// The current collection, in insertion order.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Look up a request by id.
    pub fn get(&self, id: &str) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Create a request: assigns a fresh id, forces status `New`, and
    /// stamps `created_at`/`updated_at` with the current local time.
    /// Returns the assigned id.
    pub fn add(&mut self, new: NewRequest) -> String {
        let id = self.fresh_id();
        let now = Local::now();
        self.requests.push(Request {
            id: id.clone(),
            full_name: new.full_name,
            phone: new.phone,
            birth_date: new.birth_date,
            status: RequestStatus::New,
            source: new.source,
            comment: new.comment,
            tags: new.tags,
            assigned_to: new.assigned_to,
            priority: new.priority,
            referrer: new.referrer,
            user_agent: new.user_agent,
            created_at: now,
            updated_at: Some(now),
        });
        tracing::debug!(id = %id, "Request created");
        self.notify();
        id
    }

    /// Change a request's status and stamp `updated_at`.
    ///
    /// Transitions are unrestricted: `New` moves to any terminal state
    /// and terminal states may be re-assigned to each other (operators
    /// correct mis-clicks this way).
    pub fn update_status(&mut self, id: &str, status: RequestStatus) -> Result<(), StoreError> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "requests",
                id: id.to_string(),
            })?;
        request.status = status;
        request.updated_at = Some(Local::now());
        tracing::debug!(id = %id, status = status.tag(), "Request status updated");
        self.notify();
        Ok(())
    }

    /// Apply a partial field update and stamp `updated_at`.
    pub fn update(&mut self, id: &str, patch: RequestPatch) -> Result<(), StoreError> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "requests",
                id: id.to_string(),
            })?;

        if let Some(full_name) = patch.full_name {
            request.full_name = full_name;
        }
        if let Some(phone) = patch.phone {
            request.phone = phone;
        }
        if let Some(birth_date) = patch.birth_date {
            request.birth_date = Some(birth_date);
        }
        if let Some(source) = patch.source {
            request.source = source;
        }
        if let Some(comment) = patch.comment {
            request.comment = Some(comment);
        }
        if let Some(tags) = patch.tags {
            request.tags = tags;
        }
        if let Some(assigned_to) = patch.assigned_to {
            request.assigned_to = Some(assigned_to);
        }
        if let Some(priority) = patch.priority {
            request.priority = priority;
        }
        if let Some(referrer) = patch.referrer {
            request.referrer = Some(referrer);
        }
        if let Some(user_agent) = patch.user_agent {
            request.user_agent = Some(user_agent);
        }

        request.updated_at = Some(Local::now());
        self.notify();
        Ok(())
    }

    /// Hard-delete a request.
    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        let position = self
            .requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "requests",
                id: id.to_string(),
            })?;
        self.requests.remove(position);
        tracing::debug!(id = %id, "Request removed");
        self.notify();
        Ok(())
    }

    /// Register a change listener. The callback fires immediately with
    /// the current collection (matching the hosted store's listener
    /// semantics) and again after every subsequent mutation.
    pub fn subscribe(&mut self, mut callback: RequestSubscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        callback(&self.requests);
        self.subscribers.push((id, callback));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() < before
    }

    /// Push the full current collection to every subscriber.
    fn notify(&mut self) {
        for (_, callback) in &mut self.subscribers {
            callback(&self.requests);
        }
    }

    /// Next unused sequential record id. Skips ids already present so a
    /// snapshot-seeded store never hands out a duplicate.
    fn fresh_id(&mut self) -> String {
        loop {
            let candidate = format!("req-{:06}", self.next_record);
            self.next_record += 1;
            if !self.requests.iter().any(|r| r.id == candidate) {
                return candidate;
            }
        }
    }
}
