use crate::{config::Config, context::Context, event::EventHandled};
use anyhow::Result;
use serenity::all::CreateCommand;

mod debug;
mod help;
mod ignore_bots;
mod random_image;
mod ready;
mod upload;

/// One entry of the help message
pub struct Usage {
    pub invocation: String,
    pub description: String,
}

#[serenity::async_trait]
pub trait Plugin: Sync + Send {
    /// Plugin name.  Used for debug
    fn name(&self) -> &'static str;
    /// Help message entry.  None if no help message
    fn usage(&self, cfg: &Config) -> Option<Usage>;
    /// Slash commands to register with Discord once connected
    fn commands(&self, _cfg: &Config) -> Vec<CreateCommand> {
        Vec::new()
    }
    /// Potentially handle event.  Returns:
    /// - Ok(EventHandled::Yes) if the event has been handled and no other plugin should attempt to
    ///   handle it
    /// - Ok(EventHandled::No) if another plugin should attempt to handle the event
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context<'_>, event: &crate::event::Event) -> Result<EventHandled>;
}

/// Ordered list of available plugins
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        // Core bot operations
        Box::new(debug::Debug),
        Box::new(ready::Ready),
        Box::new(ignore_bots::IgnoreBots),
        Box::new(help::Help),
        // Images
        Box::new(random_image::RandomImage),
        Box::new(upload::Upload),
    ]
}
