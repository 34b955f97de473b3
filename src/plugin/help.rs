use crate::{event::*, plugin::*};
use anyhow::Result;
use serenity::all::{
    CreateCommand, CreateEmbed, CreateEmbedFooter, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage,
};

const EMBED_COLOR: u32 = 0x00bfff;

pub struct Help;

#[serenity::async_trait]
impl Plugin for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self, _cfg: &Config) -> Option<Usage> {
        Some(Usage {
            invocation: format!("/{}", self.name()),
            description: "Show this help message".to_owned(),
        })
    }

    fn commands(&self, _cfg: &Config) -> Vec<CreateCommand> {
        vec![CreateCommand::new(self.name()).description("Explain what this bot can do")]
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        if let Some(command) = event.is_slash_cmd(self.name()) {
            let response = CreateInteractionResponseMessage::new().embed(help_embed(ctx));
            command
                .create_response(ctx.cache_http, CreateInteractionResponse::Message(response))
                .await?;
            return Ok(EventHandled::Yes);
        }

        if let Some(msg) = event.is_bot_cmd(ctx, self.name()) {
            msg.channel_id
                .send_message(ctx.cache_http, CreateMessage::new().embed(help_embed(ctx)))
                .await?;
            return Ok(EventHandled::Yes);
        }

        Ok(EventHandled::No)
    }
}

fn help_embed(ctx: &Context<'_>) -> CreateEmbed {
    let (bot_name, avatar) = {
        let me = ctx.cache.current_user();
        (me.name.clone(), me.face())
    };

    plugins()
        .iter()
        .filter_map(|plugin| plugin.usage(ctx.cfg))
        .fold(
            CreateEmbed::new()
                .title("How to use this bot")
                .description("This bot can do the following:"),
            |embed, usage| embed.field(usage.invocation, usage.description, false),
        )
        .color(EMBED_COLOR)
        .footer(CreateEmbedFooter::new(bot_name).icon_url(avatar))
}
