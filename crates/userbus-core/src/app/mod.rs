//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **EventDispatcher**: 購読者リストと逐次配送
//! - **UserService**: ユーザー registry（変更ごとにイベントを発行）
//! - **SubscriberCatalog**: タグ → 購読者ハンドル
//! - **AppBuilder / App**: 入力検証とタグ解決を行うリクエスト層

pub mod builder;
pub mod catalog;
pub mod dispatcher;
pub mod user_service;

pub use self::builder::{
    App, AppBuilder, AppError, AttachOutcome, BuildError, DeletedUser, DetachOutcome,
};
pub use self::catalog::{CatalogError, SubscriberCatalog, SubscriberKind, UnknownTag};
pub use self::dispatcher::{DeliveryReport, EventDispatcher};
pub use self::user_service::UserService;
