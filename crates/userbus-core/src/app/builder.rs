//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! `App` is the request layer in front of [`UserService`]: it validates
//! input, resolves subscriber tags through the [`SubscriberCatalog`] and
//! renders the results the way the former HTTP endpoints did.
//!
//! # Fail-fast 設計
//! - `expect_subscribers()` で必要な kind を宣言
//! - `build()` 時に「期待集合 ⊆ 登録済み集合」をチェック

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{SubscriberCatalog, SubscriberKind};
use super::user_service::UserService;
use crate::config::UserbusConfig;
use crate::domain::{RegistryError, User, UserId, UserPatch};
use crate::ports::{Clock, SubscriberHandle, SystemClock};

/// Errors raised while building an [`App`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing subscriber kinds: {0:?}. These kinds were expected but not registered.")]
    MissingSubscribers(Vec<SubscriberKind>),
}

/// Errors surfaced to callers of the request layer.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("invalid subscriber type '{0}'")]
    UnknownSubscriber(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachOutcome {
    Attached,
    AlreadyAttached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetachOutcome {
    Detached,
    NotAttached,
}

/// Response of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedUser {
    pub message: String,
    pub user: User,
}

pub struct AppBuilder {
    catalog: SubscriberCatalog,
    clock: Arc<dyn Clock>,
    expected: Option<Vec<SubscriberKind>>,
    attach_on_start: Vec<SubscriberKind>,
    dedup_attach: bool,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            catalog: SubscriberCatalog::with_defaults(),
            clock: Arc::new(SystemClock),
            expected: None,
            attach_on_start: Vec::new(),
            dedup_attach: true,
        }
    }

    /// Builder seeded from configuration: default catalog, configured
    /// startup subscribers (which are also expected to be registered).
    pub fn from_config(config: &UserbusConfig) -> Self {
        Self::new()
            .expect_subscribers(&config.subscribers)
            .attach_on_start(&config.subscribers)
            .dedup_attach(config.dedup_attach)
    }

    pub fn with_catalog(mut self, catalog: SubscriberCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn expect_subscribers(mut self, kinds: &[SubscriberKind]) -> Self {
        self.expected = Some(kinds.to_vec());
        self
    }

    /// Kinds attached, in order, when the app is built.
    pub fn attach_on_start(mut self, kinds: &[SubscriberKind]) -> Self {
        self.attach_on_start = kinds.to_vec();
        self
    }

    pub fn dedup_attach(mut self, enabled: bool) -> Self {
        self.dedup_attach = enabled;
        self
    }

    pub async fn build(self) -> Result<App, BuildError> {
        let registered = self.catalog.registered_kinds();
        let mut wanted = self.expected.clone().unwrap_or_default();
        wanted.extend(self.attach_on_start.iter().copied());
        let mut missing: Vec<SubscriberKind> = wanted
            .into_iter()
            .filter(|kind| !registered.contains(kind))
            .collect();
        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return Err(BuildError::MissingSubscribers(missing));
        }

        let app = App {
            users: UserService::with_clock(self.clock),
            catalog: self.catalog,
            dedup_attach: self.dedup_attach,
        };
        for &kind in &self.attach_on_start {
            let handle = app
                .catalog
                .get(kind)
                .ok_or_else(|| BuildError::MissingSubscribers(vec![kind]))?;
            let outcome = app.attach_handle(handle).await;
            tracing::debug!(subscriber = %kind, ?outcome, "startup subscriber");
        }
        Ok(app)
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Request layer over a [`UserService`].
pub struct App {
    users: UserService,
    catalog: SubscriberCatalog,
    dedup_attach: bool,
}

impl App {
    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn catalog(&self) -> &SubscriberCatalog {
        &self.catalog
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<User, AppError> {
        validate_name(name)?;
        validate_email(email)?;
        Ok(self.users.create(name.trim(), email.trim()).await)
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        Ok(self.users.read(id).await?)
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.users.list_all().await
    }

    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, AppError> {
        let patch = UserPatch {
            name: patch.name.map(|n| n.trim().to_string()),
            email: patch.email.map(|e| e.trim().to_string()),
        };
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }
        Ok(self.users.update(id, &patch).await?)
    }

    pub async fn delete_user(&self, id: UserId) -> Result<DeletedUser, AppError> {
        let user = self.users.delete(id).await?;
        Ok(DeletedUser {
            message: "User deleted successfully".to_string(),
            user,
        })
    }

    /// Attach the subscriber registered under `tag`.
    pub async fn attach(&self, tag: &str) -> Result<AttachOutcome, AppError> {
        let (kind, handle) = self
            .catalog
            .resolve(tag)
            .ok_or_else(|| AppError::UnknownSubscriber(tag.to_string()))?;

        let outcome = self.attach_handle(handle).await;
        tracing::info!(subscriber = %kind, ?outcome, "attach requested");
        Ok(outcome)
    }

    async fn attach_handle(&self, handle: SubscriberHandle) -> AttachOutcome {
        if !self.dedup_attach {
            self.users.attach(handle).await;
            return AttachOutcome::Attached;
        }
        if self.users.attach_if_absent(handle).await {
            AttachOutcome::Attached
        } else {
            AttachOutcome::AlreadyAttached
        }
    }

    /// Detach the subscriber registered under `tag`.
    pub async fn detach(&self, tag: &str) -> Result<DetachOutcome, AppError> {
        let (kind, handle) = self
            .catalog
            .resolve(tag)
            .ok_or_else(|| AppError::UnknownSubscriber(tag.to_string()))?;

        let outcome = if self.users.detach(&handle).await {
            DetachOutcome::Detached
        } else {
            DetachOutcome::NotAttached
        };
        tracing::info!(subscriber = %kind, ?outcome, "detach requested");
        Ok(outcome)
    }

    /// Names of the attached subscribers, in attachment order.
    pub async fn attached(&self) -> Vec<String> {
        self.users.subscribers().await
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::Validation(format!("invalid email '{email}'"))),
    }
}
