use crate::{event::*, plugin::*};
use anyhow::Result;

/// Drops messages from bots, including our own, so nothing later in the list answers them.
pub struct IgnoreBots;

#[serenity::async_trait]
impl Plugin for IgnoreBots {
    fn name(&self) -> &'static str {
        "ignore_bots"
    }

    fn usage(&self, _cfg: &Config) -> Option<Usage> {
        None
    }

    async fn handle(&self, _ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let (Event::Message(msg) | Event::Mention(msg)) = event else {
            return Ok(EventHandled::No);
        };

        if msg.author.bot {
            Ok(EventHandled::Yes)
        } else {
            Ok(EventHandled::No)
        }
    }
}
