//! Expired-session sweep command.
//!
//! The request path never deletes sessions; expiry is evaluated lazily
//! there. This command is the out-of-band maintenance entry point (run it
//! from cron or by hand).

use anyhow::Result;
use console::style;

use crate::state::Services;

/// Delete all expired sessions and print the count removed.
pub async fn cleanup(services: &Services, json: bool) -> Result<()> {
    let removed = services.chat_service.cleanup_expired_sessions().await?;

    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
        return Ok(());
    }

    println!();
    println!(
        "  {} Swept {} expired session{}",
        style("🧹").bold(),
        style(removed).cyan(),
        if removed == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
