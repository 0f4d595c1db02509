// Privacy policy cards and the guild data wipe.

use crate::discord::checks::privacy_role;
use crate::discord::embeds::{card, success_card, BLURPLE, GOLD};
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

const POLICY_TEXT: &str = "At **Elura Utility**, we value your privacy and data security.\n\n\
We only store the minimal information needed for features like counting, economy, moderation and welcome messages. \
No message content or sensitive personal data is ever collected.\n\n\
**Data we store:**\n\
- Server, channel and user IDs\n\
- Counting progress and message totals\n\
- Credit balances and moderation cases\n\n\
**Your Rights:**\n\
Server staff can wipe everything stored for this server at any time with `/clearserverdata`.";

const NOTICE_TEXT: &str = "**Your privacy is our priority.**\n\n\
This bot collects **only non-personal configuration data** required for server features. \
We do **not store messages, DMs, or personal identifiers** beyond necessary technical data.\n\n\
You can request data removal at any time by contacting server administrators.";

/// View the bot's privacy and data policy.
#[poise::command(slash_command)]
pub async fn privacy(ctx: Context<'_>) -> Result<(), Error> {
    let embed = card("🔒 Privacy & Data Policy", POLICY_TEXT, BLURPLE);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Post the official privacy notice in a channel.
#[poise::command(slash_command, guild_only, check = "privacy_role")]
pub async fn privacynotice(
    ctx: Context<'_>,
    #[description = "Channel to post the notice in"]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let embed = card("🔐 Privacy Notice", NOTICE_TEXT, BLURPLE);
    channel
        .id
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await?;

    ctx.send(
        poise::CreateReply::default()
            .embed(success_card(format!(
                "Privacy notice has been sent in <#{}>.",
                channel.id
            )))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Delete every stored record for this server.
#[poise::command(slash_command, guild_only, check = "privacy_role")]
pub async fn clearserverdata(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    ctx.defer_ephemeral().await?;
    let removed = purge_guild(ctx.data(), guild_id).await?;
    tracing::info!(guild_id, removed, user_id = ctx.author().id.get(), "Guild data cleared");

    let embed = card(
        "🧹 Server Data Cleared",
        format!(
            "All stored data for this server has been deleted.\nRecords removed: **{}**",
            removed
        ),
        GOLD,
    );
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Remove the guild from every store. Returns the number of rows deleted.
async fn purge_guild(data: &Data, guild_id: u64) -> Result<u64, Error> {
    let mut removed = 0;
    removed += data.counting.purge_guild(guild_id).await?;
    removed += data.economy.purge_guild(guild_id).await?;
    removed += data.moderation.purge_guild(guild_id).await?;
    removed += data.activity.purge_guild(guild_id).await?;
    removed += data.welcome.purge_guild(guild_id).await?;
    removed += data.settings.purge_guild(guild_id).await?;
    Ok(removed)
}
