use crate::{event::*, log_event, logging::*, plugin::*};
use anyhow::Result;

/// Prints debug information about event to stdout
pub struct Debug;

#[serenity::async_trait]
impl Plugin for Debug {
    fn name(&self) -> &'static str {
        "debug"
    }

    fn usage(&self, _cfg: &Config) -> Option<Usage> {
        None
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        match event {
            Event::Ready(ready) => {
                log_event!(
                    "Connected to {} server(s) as {}",
                    ready.guilds.len(),
                    ready.user.color(),
                );
            }
            Event::Command(command) => {
                log_event!(
                    "{}{}{}{}{} used /{}",
                    command.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    command.channel_id.color(ctx.http).await,
                    Glue {}.color(),
                    command.user.color(),
                    command.data.name,
                );
            }
            Event::Message(msg) => {
                log_event!(
                    "{}{}{}{}{}{} {}",
                    msg.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.channel_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.author.color(),
                    Glue {}.color(),
                    msg.content_safe(ctx.cache),
                );
            }
            Event::Mention(msg) => {
                let attachments: Vec<String> = msg
                    .attachments
                    .iter()
                    .map(|attachment| FileName(&attachment.filename).color())
                    .collect();
                log_event!(
                    "{}{}{}{}{}{} {} [{}]",
                    msg.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.channel_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.author.color(),
                    Glue {}.color(),
                    msg.content_safe(ctx.cache),
                    attachments.join(", "),
                );
            }
        }

        Ok(EventHandled::No)
    }
}
