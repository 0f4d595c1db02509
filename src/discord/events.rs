use crate::core::counting::CountOutcome;
use crate::discord::embeds::{card, GOLD, GREEN};
use crate::discord::Data;
use anyhow::Result;
use poise::serenity_prelude::{self as serenity, Context, Mentionable};
use std::time::Duration;

/// How long the "ruined it" notice stays in the counting channel.
const RESET_NOTICE_TTL: Duration = Duration::from_secs(6);

/// Count the message for activity stats, then run it through the counting game.
pub async fn handle_message(ctx: &Context, data: &Data, message: &serenity::Message) -> Result<()> {
    if message.author.bot {
        return Ok(());
    }
    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };
    let guild_id = guild_id.get();
    let user_id = message.author.id.get();

    // Stats are best-effort; a failed write must not block counting.
    if let Err(e) = data.activity.record_message(user_id, guild_id).await {
        tracing::warn!(guild_id, user_id, "Failed to record message activity: {}", e);
    }

    let outcome = data
        .counting
        .process_message(guild_id, message.channel_id.get(), user_id, &message.content)
        .await?;

    match outcome {
        CountOutcome::Ignored => {}
        CountOutcome::Accepted {
            number, milestone, ..
        } => {
            message.react(ctx, '✅').await?;
            if milestone {
                let embed = card(
                    "🏆 Milestone Reached!",
                    format!("**{}** helped reach **{}**!", message.author.mention(), number),
                    GOLD,
                );
                message
                    .channel_id
                    .send_message(ctx, serenity::CreateMessage::new().embed(embed))
                    .await?;
            }
        }
        CountOutcome::SameUser | CountOutcome::WrongNumber { .. } => {
            message.react(ctx, '❌').await?;
            let text = ruined_notice(&message.author.mention().to_string(), &outcome);
            let notice = message.channel_id.say(&ctx.http, text).await?;

            let http = ctx.http.clone();
            tokio::spawn(async move {
                tokio::time::sleep(RESET_NOTICE_TTL).await;
                if let Err(e) = notice.delete(&*http).await {
                    tracing::debug!("Failed to delete counting notice: {}", e);
                }
            });
        }
    }

    Ok(())
}

/// Log the join and greet the member in the welcome channel, if one is set.
pub async fn handle_member_join(ctx: &Context, data: &Data, member: &serenity::Member) -> Result<()> {
    if member.user.bot {
        return Ok(());
    }
    let guild_id = member.guild_id.get();

    if let Err(e) = data
        .welcome
        .record_join(guild_id, member.user.id.get(), &member.user.tag())
        .await
    {
        tracing::warn!(guild_id, user_id = member.user.id.get(), "Failed to log join: {}", e);
    }

    let settings = data.settings.get(guild_id).await?;
    let Some(channel_id) = settings.welcome_channel else {
        return Ok(());
    };

    let cached_count = ctx.cache.guild(member.guild_id).map(|g| g.member_count);
    let member_number = match cached_count {
        Some(count) => Some(count),
        None => match data.welcome.joins_count(guild_id).await {
            Ok(joins) => logged_member_number(joins),
            Err(e) => {
                tracing::warn!(guild_id, "Failed to count logged joins: {}", e);
                None
            }
        },
    };

    let embed = card(
        format!("🎉 Welcome {}!", member.user.name),
        welcome_description(&member.mention().to_string(), member_number),
        GREEN,
    )
    .thumbnail(member.face());

    serenity::ChannelId::new(channel_id)
        .send_message(ctx, serenity::CreateMessage::new().embed(embed))
        .await?;

    Ok(())
}

/// Posting twice in a row gets the ❌ prefix; a wrong number doesn't.
fn ruined_notice(mention: &str, outcome: &CountOutcome) -> String {
    let prefix = match outcome {
        CountOutcome::SameUser => "❌ ",
        _ => "",
    };
    format!("{}{} RUINED IT!! Next number is **1**.", prefix, mention)
}

/// Member number from the join log, for guilds missing from the cache.
fn logged_member_number(joins: u64) -> Option<u64> {
    (joins > 0).then_some(joins)
}

fn welcome_description(mention: &str, member_number: Option<u64>) -> String {
    match member_number {
        Some(n) => format!("We're glad you're here, {}!\nYou're member **#{}**!", mention, n),
        None => format!("We're glad you're here, {}!", mention),
    }
}
