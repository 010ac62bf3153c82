//! UserService - ユーザー registry と変更通知
//!
//! # フロー（mutation ごと）
//! 1. write lock を取る
//! 2. users map を更新
//! 3. DomainEvent を組み立てて dispatcher で全購読者に逐次配送
//! 4. lock を離して結果を返す（購読者の失敗は返さない）
//!
//! Steps 1-4 run in a spawned task that the caller only awaits. Dropping the
//! caller's future (timeout, `select!`, disconnected client) detaches from
//! that task; the mutation and its fan-out still run to completion.
//!
//! # Locking
//! `users`, `next_id` and the dispatcher share one `RwLock`. Mutations and
//! attach/detach hold the write lock across delivery, so no attach/detach can
//! interleave with an in-flight `notify`, and subscribers see events in the
//! order the mutations happened. `read`/`list_all` take the read lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::dispatcher::{DeliveryReport, EventDispatcher};
use crate::domain::{DomainEvent, RegistryError, User, UserId, UserPatch};
use crate::ports::{Clock, SubscriberHandle, SystemClock};

struct RegistryState {
    /// Keyed by id; ids only grow, so iteration is insertion order.
    users: BTreeMap<UserId, User>,

    /// Next id to hand out. Never decremented, so deleted ids are not reused.
    next_id: UserId,

    dispatcher: EventDispatcher,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: UserId::FIRST,
            dispatcher: EventDispatcher::new(),
        }
    }

    fn allocate_id(&mut self) -> UserId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }
}

/// In-memory user registry that publishes an event for every mutation.
pub struct UserService {
    state: Arc<RwLock<RegistryState>>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::new())),
            clock,
        }
    }

    pub async fn create(&self, name: impl Into<String>, email: impl Into<String>) -> User {
        let (name, email) = (name.into(), email.into());
        let state = self.state.clone();
        let clock = self.clock.clone();
        run_to_completion(async move {
            let mut state = state.write_owned().await;
            let id = state.allocate_id();
            let user = User::new(id, name, email, clock.now());
            state.users.insert(id, user.clone());
            tracing::info!(user_id = %id, "user created");

            let event = DomainEvent::created(&user, clock.now());
            publish(&state.dispatcher, &event).await;
            user
        })
        .await
    }

    pub async fn read(&self, id: UserId) -> Result<User, RegistryError> {
        let state = self.state.read().await;
        state.users.get(&id).cloned().ok_or(RegistryError::NotFound(id))
    }

    pub async fn update(&self, id: UserId, patch: &UserPatch) -> Result<User, RegistryError> {
        let patch = patch.clone();
        let state = self.state.clone();
        let clock = self.clock.clone();
        run_to_completion::<Result<User, RegistryError>, _>(async move {
            let mut state = state.write_owned().await;
            let user = state.users.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
            let before = user.clone();
            user.apply(&patch);
            let after = user.clone();
            tracing::info!(user_id = %id, "user updated");

            let event = DomainEvent::updated(&before, &after, clock.now());
            publish(&state.dispatcher, &event).await;
            Ok(after)
        })
        .await
    }

    pub async fn delete(&self, id: UserId) -> Result<User, RegistryError> {
        let state = self.state.clone();
        let clock = self.clock.clone();
        run_to_completion::<Result<User, RegistryError>, _>(async move {
            let mut state = state.write_owned().await;
            let removed = state.users.remove(&id).ok_or(RegistryError::NotFound(id))?;
            tracing::info!(user_id = %id, "user deleted");

            let event = DomainEvent::deleted(&removed, clock.now());
            publish(&state.dispatcher, &event).await;
            Ok(removed)
        })
        .await
    }

    /// All users, oldest first.
    pub async fn list_all(&self) -> Vec<User> {
        let state = self.state.read().await;
        state.users.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.users.is_empty()
    }

    /// Append `handle` to the subscriber list (duplicates allowed).
    pub async fn attach(&self, handle: SubscriberHandle) {
        self.state.write().await.dispatcher.attach(handle);
    }

    /// Check-then-append under a single write lock. Returns `false` if the
    /// handle was already attached.
    pub async fn attach_if_absent(&self, handle: SubscriberHandle) -> bool {
        let mut state = self.state.write().await;
        if state.dispatcher.contains(&handle) {
            return false;
        }
        state.dispatcher.attach(handle);
        true
    }

    /// Remove the first occurrence of `handle`; `false` if it was absent.
    pub async fn detach(&self, handle: &SubscriberHandle) -> bool {
        self.state.write().await.dispatcher.detach(handle)
    }

    pub async fn is_attached(&self, handle: &SubscriberHandle) -> bool {
        self.state.read().await.dispatcher.contains(handle)
    }

    /// Subscriber names in attachment order.
    pub async fn subscribers(&self) -> Vec<String> {
        self.state.read().await.dispatcher.names()
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn `task` and wait for it. The task keeps running if this future is
/// dropped.
async fn run_to_completion<T, F>(task: F) -> T
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(value) => value,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => panic!("registry task cancelled by runtime shutdown: {err}"),
    }
}

async fn publish(dispatcher: &EventDispatcher, event: &DomainEvent) -> DeliveryReport {
    let report = dispatcher.notify(event).await;
    if !report.is_clean() {
        tracing::warn!(
            topic = event.kind().topic(),
            attempted = report.attempted,
            failed = report.failures.len(),
            "event delivered with subscriber failures"
        );
    }
    report
}
