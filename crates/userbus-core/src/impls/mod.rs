//! Impls - Subscriber の具体実装
//!
//! - **EmailSubscriber** / **SlackSubscriber**: 通知文面を組み立ててログへ
//! - **LoggingSubscriber**: イベントをそのまま記録
//! - **AnalyticsSubscriber**: 種別ごとのカウンタ
//! - **RecordingSubscriber**: 受信イベントを保持（テスト用）

pub mod analytics;
pub mod email;
pub mod logging;
pub mod recording;
pub mod slack;

pub use self::analytics::{AnalyticsCounts, AnalyticsSubscriber};
pub use self::email::{EmailMessage, EmailSubscriber};
pub use self::logging::LoggingSubscriber;
pub use self::recording::RecordingSubscriber;
pub use self::slack::SlackSubscriber;
