// Message counter commands. Messages are counted in discord/events.rs.

use crate::discord::embeds::{card, format_number, info_card, medal, BLURPLE, GOLD};
use crate::discord::{Context, Error};

const LEADERBOARD_SIZE: usize = 10;

/// Check your total message count in this server.
#[poise::command(slash_command, guild_only)]
pub async fn messages(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let count = ctx
        .data()
        .activity
        .message_count(ctx.author().id.get(), guild_id)
        .await?;

    let embed = card(
        "💬 Your Message Stats",
        format!(
            "You've sent **{}** messages in this server!",
            format_number(count as i64)
        ),
        BLURPLE,
    );
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

/// Show the top 10 most active members in this server.
#[poise::command(slash_command, guild_only)]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let entries = ctx
        .data()
        .activity
        .leaderboard(guild_id, LEADERBOARD_SIZE)
        .await?;

    if entries.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .embed(info_card("📭 No message data yet!"))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "{} <@{}>: **{} messages**",
                medal(i),
                e.user_id,
                format_number(e.count as i64)
            )
        })
        .collect();

    let embed = card("🏆 Top Chatters", lines.join("\n"), GOLD);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
