use crate::{
    event::*,
    log_error, log_internal,
    logging::{FileName, PrintColor},
    picker::{self, Pick},
    plugin::*,
};
use anyhow::Result;
use serenity::all::{CreateAttachment, CreateCommand, CreateMessage, EditInteractionResponse};

const FAILURE_MESSAGE: &str = "Failed to send an image.";

/// Sends a random image from the image folder, avoiding recently sent ones.
pub struct RandomImage;

/// What to answer a request with
enum Reply {
    Image(CreateAttachment),
    Notice(String),
}

#[serenity::async_trait]
impl Plugin for RandomImage {
    fn name(&self) -> &'static str {
        "random_image"
    }

    fn usage(&self, cfg: &Config) -> Option<Usage> {
        Some(Usage {
            invocation: format!("/{}", cfg.general.command_name),
            description: format!(
                "Send a random image from the image folder.  The last {} images are not repeated.",
                cfg.images.history_capacity
            ),
        })
    }

    fn commands(&self, cfg: &Config) -> Vec<CreateCommand> {
        vec![CreateCommand::new(&cfg.general.command_name).description("Send a random image")]
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let cmd = ctx.cfg.general.command_name.as_str();

        if let Some(command) = event.is_slash_cmd(cmd) {
            // Reading and uploading the file may take longer than Discord's initial response
            // window.
            command.defer(ctx.cache_http).await?;
            let response = match reply(ctx).await {
                Reply::Image(attachment) => EditInteractionResponse::new().new_attachment(attachment),
                Reply::Notice(text) => EditInteractionResponse::new().content(text),
            };
            command.edit_response(ctx.cache_http, response).await?;
            return Ok(EventHandled::Yes);
        }

        if let Some(msg) = event.is_bot_cmd(ctx, cmd) {
            let message = match reply(ctx).await {
                Reply::Image(attachment) => CreateMessage::new().add_file(attachment),
                Reply::Notice(text) => CreateMessage::new().content(text),
            };
            msg.channel_id.send_message(ctx.cache_http, message).await?;
            return Ok(EventHandled::Yes);
        }

        Ok(EventHandled::No)
    }
}

async fn reply(ctx: &Context<'_>) -> Reply {
    let dir = ctx.cfg.general.image_folder.as_path();

    let (name, path) = match picker::pick_image(dir, ctx.vstate).await {
        Ok(Pick::Image { name, path }) => (name, path),
        Ok(Pick::Exhausted) => {
            log_internal!("No unsent images left, image history reset");
            return Reply::Notice(format!(
                "Image history has been reset.  Please run `/{}` again.",
                ctx.cfg.general.command_name
            ));
        }
        Err(err) => {
            log_error!("Could not read image folder: {}", err);
            return Reply::Notice(FAILURE_MESSAGE.to_owned());
        }
    };

    match CreateAttachment::path(&path).await {
        Ok(attachment) => {
            log_internal!("Sending {}", FileName(&name).color());
            Reply::Image(attachment)
        }
        Err(err) => {
            log_error!("Could not read {}: {}", FileName(&name).color(), err);
            Reply::Notice(FAILURE_MESSAGE.to_owned())
        }
    }
}
