//! Miscellaneous convenience methods

use crate::image_set;
use regex::Regex;
use serenity::all::{Attachment, Message};
use std::sync::LazyLock;

pub trait MessageHelper {
    fn caption(&self) -> String;
    fn upload_candidate(&self) -> Option<&Attachment>;
}

impl MessageHelper for Message {
    /// Message text with user mentions removed, e.g. `<@123> nice cat` becomes `nice cat`.
    fn caption(&self) -> String {
        strip_user_mentions(&self.content).trim().to_owned()
    }

    /// The first attachment that looks like an image.  Falls back to the first attachment at all
    /// so the upload can be rejected with a useful message.
    fn upload_candidate(&self) -> Option<&Attachment> {
        self.attachments
            .iter()
            .find(|attachment| image_set::is_accepted(&attachment.filename))
            .or_else(|| self.attachments.first())
    }
}

/// Matches user mentions, `<@digits>` and the nickname form `<@!digits>`
static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?[0-9]+>").expect("user mention pattern is valid"));

/// Remove every user mention from `text`.  Role and channel mentions are left alone.
pub fn strip_user_mentions(text: &str) -> String {
    USER_MENTION.replace_all(text, "").into_owned()
}
