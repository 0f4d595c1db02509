// Welcome channel configuration. Join greetings are sent from discord/events.rs.

use crate::discord::embeds::success_card;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Set the welcome channel for this server.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn setwelcome(
    ctx: Context<'_>,
    #[description = "Channel for welcome messages"]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    ctx.data()
        .settings
        .set_welcome_channel(guild_id, channel.id.get())
        .await?;

    ctx.send(
        poise::CreateReply::default()
            .embed(success_card(format!(
                "Welcome messages will now be sent in <#{}>.",
                channel.id
            )))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Stop sending welcome messages.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn clearwelcome(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    ctx.data().settings.clear_welcome_channel(guild_id).await?;

    ctx.send(
        poise::CreateReply::default()
            .embed(success_card("Welcome messages have been turned off."))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}
