//! Postboard demo binary
//!
//! Loads users and posts from the configured API, prints the newest posts and
//! adds a reaction to the first one.

use anyhow::Context;
use chrono::Utc;
use postboard::{ApiConfig, Postboard, ReactionKind, excerpt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How many posts to print
const SHOWN: usize = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postboard=info,postboard_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env().context("loading configuration")?;
    println!("=== Postboard: {} ===\n", config.base_url);

    let board = Postboard::connect(config).context("building http client")?;

    let users = board.fetch_users().await.context("fetching users")?;
    println!("Loaded {users} users");

    let loaded = board
        .ensure_posts_loaded()
        .await
        .context("fetching posts")?;
    println!("Fetched posts: {loaded} ({} in store)\n", board.posts().await.len());

    let now = Utc::now();
    for post in board.posts_by_recency().await.iter().take(SHOWN) {
        println!("#{} {}", post.id, post.title);
        println!(
            "   by {}, {}",
            board.author_name(post.user_id).await,
            post.timestamp.time_ago(now)
        );
        println!("   {}...", excerpt(post).replace('\n', " "));
    }

    if let Some(first) = board.posts_by_recency().await.first() {
        board.add_reaction(first.id, ReactionKind::ThumbsUp).await?;
        if let Some(post) = board.post(first.id).await {
            let counters: Vec<String> = post
                .reactions
                .iter()
                .map(|(kind, count)| format!("{} {count}", kind.emoji()))
                .collect();
            println!("\nReacted to #{}: {}", post.id, counters.join("  "));
        }
    }

    board.shutdown().await?;
    Ok(())
}
