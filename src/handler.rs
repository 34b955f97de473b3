use crate::{config::Config, context::Context, event::Event, volatile_state::VolatileState};
use serenity::all::{Interaction, Message, Ready};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Discord event handler
pub struct Handler {
    cfg: Arc<Config>,
    vstate: Arc<RwLock<VolatileState>>,
}

impl<'a> Handler {
    /// The state is shared with the health endpoint, hence the `Arc`s.
    pub fn new(cfg: Arc<Config>, vstate: Arc<RwLock<VolatileState>>) -> Self {
        Self { cfg, vstate }
    }

    fn ctx(&'a self, discord_ctx: &'a serenity::all::Context) -> Context<'a> {
        Context {
            cfg: &self.cfg,
            vstate: &self.vstate,
            cache: &discord_ctx.cache,
            http: &discord_ctx.http,
            cache_http: discord_ctx,
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        Event::Ready(ready).handle(self.ctx(&discord_ctx)).await;
    }

    async fn interaction_create(&self, discord_ctx: serenity::all::Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        Event::Command(command).handle(self.ctx(&discord_ctx)).await;
    }

    async fn message(&self, discord_ctx: serenity::all::Context, msg: Message) {
        let bot_id = discord_ctx.cache.current_user().id;
        Event::from_message(msg, bot_id)
            .handle(self.ctx(&discord_ctx))
            .await;
    }
}
