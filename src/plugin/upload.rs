use crate::{
    event::*,
    helper::MessageHelper,
    log_error, log_internal,
    logging::{FileName, PrintColor},
    plugin::*,
    upload::{self, ImageSource, Saved, UploadError, UploadRules},
};
use anyhow::Result;
use serenity::all::{CreateAttachment, CreateMessage, Message};
use std::{sync::LazyLock, time::Duration};

/// One connection pool for every attachment download
static HTTP: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// Saves images sent to the bot with a mention into the image folder, then posts them back.
pub struct Upload;

/// Attachment bytes downloaded from Discord's CDN
struct RemoteAttachment<'a> {
    client: &'a reqwest::Client,
    url: &'a str,
    timeout: Duration,
}

#[serenity::async_trait]
impl<'a> ImageSource for RemoteAttachment<'a> {
    async fn fetch(&self) -> Result<Vec<u8>, UploadError> {
        let fetch = async {
            let bytes = self
                .client
                .get(self.url)
                .timeout(self.timeout)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            Ok::<_, reqwest::Error>(bytes.to_vec())
        };

        fetch.await.map_err(|e| UploadError::Fetch(Box::new(e)))
    }
}

#[serenity::async_trait]
impl Plugin for Upload {
    fn name(&self) -> &'static str {
        "upload"
    }

    fn usage(&self, _cfg: &Config) -> Option<Usage> {
        Some(Usage {
            invocation: "@mention + image".to_owned(),
            description: "Mention the bot while attaching an image and the bot saves the image \
                          and posts it."
                .to_owned(),
        })
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Mention(msg) = event else {
            return Ok(EventHandled::No);
        };
        let Some(attachment) = msg.upload_candidate() else {
            return Ok(EventHandled::No);
        };

        let caption = msg.caption();
        let source = RemoteAttachment {
            client: &HTTP,
            url: &attachment.url,
            timeout: Duration::from_secs(ctx.cfg.images.download_timeout_seconds),
        };
        let rules = UploadRules {
            caption_max_chars: ctx.cfg.images.caption_max_chars,
        };

        let saved = match upload::ingest(
            &ctx.cfg.general.image_folder,
            ctx.vstate,
            &source,
            &attachment.filename,
            &caption,
            &rules,
        )
        .await
        {
            Ok(saved) => saved,
            Err(err) => {
                log_error!("Rejected upload {}: {}", FileName(&attachment.filename).color(), err);
                msg.channel_id.say(ctx.cache_http, err.user_message()).await?;
                return Ok(EventHandled::Yes);
            }
        };

        log_internal!(
            "Saved upload from {} as {}",
            msg.author.color(),
            FileName(&saved.file_name).color()
        );

        if let Err(err) = post_saved(ctx, msg, &saved, caption).await {
            log_error!("{}", err);
            msg.channel_id.say(ctx.cache_http, err.user_message()).await?;
        }

        Ok(EventHandled::Yes)
    }
}

/// Replace the user's message with the saved image.  The user's message stays if the image cannot
/// be read back.
async fn post_saved(
    ctx: &Context<'_>,
    msg: &Message,
    saved: &Saved,
    caption: String,
) -> Result<(), UploadError> {
    let repost = repost(saved, caption).await?;

    // Best-effort; we may lack permission to manage messages
    let _ = msg.delete(ctx.cache_http).await;

    msg.channel_id
        .send_message(ctx.cache_http, repost)
        .await
        .map_err(|source| UploadError::Repost {
            path: saved.path.clone(),
            source,
        })?;

    Ok(())
}

async fn repost(saved: &Saved, caption: String) -> Result<CreateMessage, UploadError> {
    let file = CreateAttachment::path(&saved.path)
        .await
        .map_err(|source| UploadError::Repost {
            path: saved.path.clone(),
            source,
        })?;

    let mut message = CreateMessage::new().add_file(file);
    if !caption.is_empty() {
        message = message.content(caption);
    }
    Ok(message)
}
