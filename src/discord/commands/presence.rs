// Bot presence, set once the gateway connection is ready.

use poise::serenity_prelude as serenity;

/// Shown under the bot's name in the member list.
pub fn status_line(guild_count: usize) -> String {
    match guild_count {
        1 => "/help • 1 server".to_string(),
        n => format!("/help • {} servers", n),
    }
}

/// Called once the bot is ready so the status reflects how many guilds it serves.
pub fn on_ready(ctx: &serenity::Context, ready: &serenity::Ready) {
    let activity = serenity::ActivityData::watching(status_line(ready.guilds.len()));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
