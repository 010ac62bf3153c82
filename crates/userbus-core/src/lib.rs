//! userbus-core
//!
//! In-process user registry that notifies subscribers of every change.
//!
//! # モジュール構成
//! - **domain**: 値型（UserId, User, UserPatch, DomainEvent, errors）
//! - **ports**: 抽象化レイヤー（Clock, Subscriber）
//! - **app**: EventDispatcher, UserService, SubscriberCatalog, AppBuilder
//! - **impls**: 購読者の実装（email, logging, slack, analytics, recording）
//! - **config**: figment による設定読み込み

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{App, AppBuilder, AppError, SubscriberKind, UserService};
pub use config::UserbusConfig;
pub use domain::{DomainEvent, EventKind, RegistryError, User, UserId, UserPatch};
pub use ports::{Subscriber, SubscriberHandle};
