//! The Serenity crate we're using for the Discord API is designed around callbacks to handle
//! events.  `handler.rs` translates those callbacks into this `Event` enum, which is dispatched
//! through the ordered plugin list.

use crate::{context::Context, log_error};
use serenity::all::{CommandInteraction, Message, Ready, UserId};

/// A Discord event
pub enum Event {
    Ready(Ready),
    /// Slash command invocation
    Command(CommandInteraction),
    /// Any message not classified as a `Mention`
    Message(Message),
    /// Message mentioning the bot that carries at least one attachment
    Mention(Message),
}

impl Event {
    /// Classify an inbound message relative to the bot's own user id.
    pub fn from_message(msg: Message, bot_id: UserId) -> Self {
        if !msg.attachments.is_empty() && msg.mentions_user_id(bot_id) {
            Event::Mention(msg)
        } else {
            Event::Message(msg)
        }
    }

    // When an event occurs, iterate over all the plugins to see if any can/should handle it.
    pub async fn handle(self, ctx: Context<'_>) {
        for plugin in crate::plugin::plugins() {
            match plugin.handle(&ctx, &self).await {
                Ok(EventHandled::Yes) => return,
                Ok(EventHandled::No) => continue,
                Err(err) => log_error!("Error in plugin {}: {}", plugin.name(), err),
            }
        }
    }

    /// Check if a plain message is the text form of a bot command, e.g. `/yoshito`.
    pub fn is_bot_cmd(&self, ctx: &Context<'_>, cmd: &str) -> Option<&Message> {
        let Event::Message(msg) = self else {
            return None;
        };

        is_cmd_text(&msg.content, &ctx.cfg.general.command_prefix, cmd).then_some(msg)
    }

    /// Check if the event is the slash command `/cmd`.
    pub fn is_slash_cmd(&self, cmd: &str) -> Option<&CommandInteraction> {
        match self {
            Event::Command(interaction) if interaction.data.name == cmd => Some(interaction),
            _ => None,
        }
    }
}

pub enum EventHandled {
    Yes,
    No,
}

/// The whole message, apart from surrounding whitespace, must be `<prefix><cmd>`.
fn is_cmd_text(content: &str, prefix: &str, cmd: &str) -> bool {
    content.trim().strip_prefix(prefix) == Some(cmd)
}
