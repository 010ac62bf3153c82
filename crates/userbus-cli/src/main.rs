//! userbus demo
//!
//! Wires configuration, logging and the app, then replays a short session:
//! create → update → detach/attach → delete → list.
//!
//! Usage:
//!   userbus-cli --config userbus.toml --verbose

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use userbus_core::domain::SubscriberError;
use userbus_core::{AppBuilder, DomainEvent, Subscriber, UserPatch, UserbusConfig};

#[derive(Parser, Debug)]
#[command(name = "userbus-cli")]
#[command(about = "In-process user registry with change notifications (demo)")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging (overrides the configured filter)
    #[arg(short, long)]
    verbose: bool,
}

/// 受信したイベントを JSON で標準出力に出す
struct ConsoleSubscriber;

#[async_trait]
impl Subscriber for ConsoleSubscriber {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        let line = serde_json::to_string(event)
            .map_err(|e| SubscriberError::new(self.name(), format!("json encode: {e}")))?;
        println!("event: {line}");
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

fn init_tracing(config: &UserbusConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();
}

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to render response")?;
    println!("{label}: {json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = UserbusConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_tracing(&config, args.verbose);
    match &args.config {
        Some(path) => info!(path = %path.display(), "configuration file loaded"),
        None => info!("no configuration file given; using defaults and environment"),
    }

    let app = AppBuilder::from_config(&config)
        .build()
        .await
        .context("building app")?;
    app.users().attach(Arc::new(ConsoleSubscriber)).await;
    info!(subscribers = ?app.attached().await, "userbus ready");

    // (A) 作成・更新
    let ann = app.create_user("Ann", "ann@x.io").await?;
    print_json("created", &ann)?;
    let ann = app
        .update_user(ann.id(), UserPatch::new().email("a@x.io"))
        .await?;
    print_json("updated", &ann)?;

    // (B) 購読者の付け外し
    print_json("detach slack", &app.detach("slack").await?)?;
    let bob = app.create_user("Bob", "bob@x.io").await?;
    print_json("created", &bob)?;
    print_json("attach slack", &app.attach("slack").await?)?;
    print_json("attach slack", &app.attach("slack").await?)?;

    // (C) 削除と一覧
    print_json("deleted", &app.delete_user(ann.id()).await?)?;
    if let Err(err) = app.get_user(ann.id()).await {
        println!("get {}: {err}", ann.id());
    }
    print_json("users", &app.list_users().await)?;

    Ok(())
}
