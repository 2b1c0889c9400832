//! Conversation prompt builder.
//!
//! Flattens the stored history into a single text prompt for the provider:
//! a `Previous conversation:` block of `role: content` lines, followed by
//! the new user turn. The entire history is included -- no truncation or
//! token budgeting.

use parley_types::chat::ChatMessage;

/// Build the flattened prompt for a completion request.
///
/// With no history the user message is passed through bare; otherwise:
///
/// ```text
/// Previous conversation:
/// user: Hello
/// assistant: Hi there!
///
/// User: How are you?
/// ```
///
/// `user_message` may be empty for image-only turns; the images travel
/// separately on the request and no `User:` line is emitted.
pub fn build_prompt(history: &[ChatMessage], user_message: &str) -> String {
    if history.is_empty() {
        return user_message.to_string();
    }

    let mut prompt = String::from("Previous conversation:\n");
    for message in history {
        prompt.push_str(&format!("{}: {}\n", message.role, message.content));
    }
    prompt.push('\n');

    if !user_message.is_empty() {
        prompt.push_str(&format!("User: {user_message}"));
    }

    prompt
}
