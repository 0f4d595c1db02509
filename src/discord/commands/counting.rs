// Discord commands for the counting game.
//
// The per-message rules run in the event handler (see discord/events.rs);
// these commands only configure and report.

use crate::discord::embeds::{card, info_card, medal, success_card, BLURPLE};
use crate::discord::{Context, Error};

/// Number of entries shown on the counting leaderboard.
const LEADERBOARD_SIZE: usize = 10;

/// Make this channel the counting channel and start from zero.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn setcountingchannel(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?;
    let channel_id = ctx.channel_id();

    ctx.data()
        .counting
        .configure_channel(guild_id.get(), channel_id.get())
        .await?;

    let guild_name = ctx
        .guild()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "this server".to_string());

    let embed = card(
        "📊 Counting Channel Set!",
        format!(
            "This channel is now the counting hub for **{}**. Start with **1**!",
            guild_name
        ),
        BLURPLE,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Reset the count back to zero.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn resetcount(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let embed = if ctx.data().counting.reset(guild_id).await? {
        success_card("🔄 The count has been reset. Next number is **1**.")
    } else {
        info_card("Counting isn't set up here yet. Use `/setcountingchannel` first.")
    };
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// View the top counters in this server.
#[poise::command(slash_command, guild_only)]
pub async fn countingleaderboard(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let counting = &ctx.data().counting;
    let scores = counting.leaderboard(guild_id, LEADERBOARD_SIZE).await?;

    if scores.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .embed(info_card("📊 No leaderboard data yet. Start counting!"))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let lines: Vec<String> = scores
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{} <@{}> — **{}** correct counts",
                medal(i),
                s.user_id,
                s.count
            )
        })
        .collect();

    let mut description = lines.join("\n");
    if let Some(current) = counting.current_number(guild_id).await? {
        description.push_str(&format!("\n\nCurrent count: **{}**", current));
    }

    let embed = card("🏆 Counting Leaderboard", description, BLURPLE);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
