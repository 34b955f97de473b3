//! Discord model values for unit tests, built from the same JSON shape the gateway sends.

use serde_json::{json, Value};
use serenity::all::{Message, UserId};

pub const BOT_ID: UserId = UserId::new(1000);
pub const AUTHOR_ID: UserId = UserId::new(2000);

fn user(id: UserId, name: &str) -> Value {
    json!({
        "id": id.to_string(),
        "username": name,
        "discriminator": "0001",
        "global_name": null,
        "avatar": null,
        "bot": false,
    })
}

/// An attachment hosted on Discord's CDN
pub fn attachment(id: u64, filename: &str) -> Value {
    let url = format!("https://cdn.discordapp.com/attachments/1/{id}/{filename}");
    json!({
        "id": id.to_string(),
        "filename": filename,
        "size": 1024,
        "url": url,
        "proxy_url": url,
    })
}

/// A guild message from an ordinary user, mentioning `mentions` and carrying `attachments`
pub fn message(content: &str, mentions: &[UserId], attachments: Vec<Value>) -> Message {
    let mentions: Vec<Value> = mentions
        .iter()
        .map(|id| user(*id, &format!("user{id}")))
        .collect();

    serde_json::from_value(json!({
        "id": "3000",
        "channel_id": "4000",
        "guild_id": "5000",
        "author": user(AUTHOR_ID, "author"),
        "content": content,
        "timestamp": "2024-01-01T00:00:00.000000+00:00",
        "edited_timestamp": null,
        "tts": false,
        "mention_everyone": false,
        "mentions": mentions,
        "mention_roles": [],
        "attachments": attachments,
        "embeds": [],
        "reactions": [],
        "components": [],
        "sticker_items": [],
        "pinned": false,
        "type": 0,
    }))
    .expect("message fixture deserializes")
}
