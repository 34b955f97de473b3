use crate::{event::*, log_error, log_internal, plugin::*};
use anyhow::Result;
use serenity::all::Command;

/// Records who we are and registers slash commands once the connection to Discord is ready.
pub struct Ready;

#[serenity::async_trait]
impl Plugin for Ready {
    fn name(&self) -> &'static str {
        "ready"
    }

    fn usage(&self, _cfg: &Config) -> Option<Usage> {
        None
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Ready(ready) = event else {
            return Ok(EventHandled::No);
        };

        ctx.vstate.write().await.bot_user = Some(ready.user.tag());

        let commands: Vec<_> = plugins()
            .iter()
            .flat_map(|plugin| plugin.commands(ctx.cfg))
            .collect();
        let count = commands.len();

        // The bot is still useful through plain-message commands, so don't give up here.
        match Command::set_global_commands(ctx.http, commands).await {
            Ok(_) => log_internal!("Registered {} slash command(s)", count),
            Err(err) => log_error!("Could not register slash commands: {}", err),
        }

        Ok(EventHandled::Yes)
    }
}
