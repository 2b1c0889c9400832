//! Storage status command.

use anyhow::Result;
use console::style;

use crate::state::Services;

/// Display session/message counts and storage location.
pub async fn status(services: &Services, json: bool) -> Result<()> {
    let sessions = services.chat_service.count_sessions().await?;
    let messages = services.chat_service.count_messages().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": services.data_dir.display().to_string(),
            "sessions": sessions,
            "messages": messages,
            "model": services.config.model,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Parley v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  Data dir:  {}", style(services.data_dir.display()).dim());
    println!("  Model:     {}", style(&services.config.model).cyan());
    println!("  Sessions:  {}", style(sessions).cyan());
    println!("  Messages:  {}", style(messages).cyan());
    println!();

    Ok(())
}
