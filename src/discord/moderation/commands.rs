// Moderation slash commands.
//
// The Discord action runs first. A case is only written once the action went
// through, then the case card is mirrored to the guild's modlog channel.

use crate::core::moderation::{normalize_reason, validate_timeout, CaseType, ModCase};
use crate::discord::embeds::{card, case_card, error_card, info_card, success_card, BLURPLE};
use crate::discord::{Context, Error};
use chrono::{Duration, Utc};
use poise::serenity_prelude as serenity;

/// How many cases /cases lists.
const HISTORY_SIZE: usize = 10;

/// Log the case and post it to the modlog channel if one is set.
async fn record_case(
    ctx: Context<'_>,
    case_type: CaseType,
    target: &serenity::User,
    reason: Option<&str>,
) -> Result<ModCase, Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let case = ctx
        .data()
        .moderation
        .log_case(
            guild_id,
            case_type,
            target.id.get(),
            ctx.author().id.get(),
            reason,
        )
        .await?;

    let settings = ctx.data().settings.get(guild_id).await?;
    if let Some(channel_id) = settings.modlog_channel {
        if let Err(e) = serenity::ChannelId::new(channel_id)
            .send_message(
                ctx.http(),
                serenity::CreateMessage::new().embed(case_card(&case)),
            )
            .await
        {
            tracing::warn!(guild_id, channel_id, case_id = case.case_id, "Failed to post case to modlog: {}", e);
        }
    }

    Ok(case)
}

async fn confirm(ctx: Context<'_>, title: &str, description: String) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(card(title, description, BLURPLE)))
        .await?;
    Ok(())
}

/// Warn a user for breaking server rules.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "Member to warn"] user: serenity::User,
    #[description = "Why they are being warned"] reason: Option<String>,
) -> Result<(), Error> {
    let case = record_case(ctx, CaseType::Warning, &user, reason.as_deref()).await?;
    confirm(
        ctx,
        "⚠️ User Warned",
        format!("<@{}> has been warned.\nCase ID: **#{}**", user.id, case.case_id),
    )
    .await
}

/// Kick a member from the server.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "KICK_MEMBERS",
    required_bot_permissions = "KICK_MEMBERS"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] user: serenity::User,
    #[description = "Why they are being kicked"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;
    let audit_reason = normalize_reason(reason.as_deref());

    guild_id
        .kick_with_reason(ctx.http(), user.id, &audit_reason)
        .await?;

    let case = record_case(ctx, CaseType::Kick, &user, reason.as_deref()).await?;
    confirm(
        ctx,
        "👢 User Kicked",
        format!("<@{}> has been kicked.\nCase ID: **#{}**", user.id, case.case_id),
    )
    .await
}

/// Ban a member from the server.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS",
    required_bot_permissions = "BAN_MEMBERS"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "Member to ban"] user: serenity::User,
    #[description = "Why they are being banned"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;
    let audit_reason = normalize_reason(reason.as_deref());

    guild_id
        .ban_with_reason(ctx.http(), user.id, 0, &audit_reason)
        .await?;

    let case = record_case(ctx, CaseType::Ban, &user, reason.as_deref()).await?;
    confirm(
        ctx,
        "🔨 User Banned",
        format!("<@{}> has been banned.\nCase ID: **#{}**", user.id, case.case_id),
    )
    .await
}

/// Timeout a member for a number of minutes.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MODERATE_MEMBERS",
    required_bot_permissions = "MODERATE_MEMBERS"
)]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "Member to time out"] user: serenity::User,
    #[description = "Length in minutes (max 40320)"] minutes: u32,
    #[description = "Why they are being timed out"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    if let Err(e) = validate_timeout(minutes) {
        ctx.send(
            poise::CreateReply::default()
                .embed(error_card(e.to_string()))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let until = Utc::now() + Duration::minutes(i64::from(minutes));
    let until = serenity::Timestamp::from_unix_timestamp(until.timestamp())?;
    let audit_reason = normalize_reason(reason.as_deref());

    guild_id
        .edit_member(
            ctx.http(),
            user.id,
            serenity::EditMember::new()
                .disable_communication_until_datetime(until)
                .audit_log_reason(&audit_reason),
        )
        .await?;

    let case = record_case(ctx, CaseType::Timeout { minutes }, &user, reason.as_deref()).await?;
    confirm(
        ctx,
        "⏱️ User Timed Out",
        format!(
            "<@{}> was timed out for {} minutes.\nCase ID: **#{}**",
            user.id, minutes, case.case_id
        ),
    )
    .await
}

/// Unban a previously banned user by ID.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "BAN_MEMBERS",
    required_bot_permissions = "BAN_MEMBERS"
)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "ID of the banned user"] user_id: String,
    #[description = "Why they are being unbanned"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    let Some(user_id) = parse_user_id(&user_id) else {
        ctx.send(
            poise::CreateReply::default()
                .embed(error_card("❗ That doesn't look like a user ID."))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    };

    let user = user_id.to_user(&ctx).await?;
    guild_id.unban(ctx.http(), user.id).await?;

    let case = record_case(ctx, CaseType::Unban, &user, reason.as_deref()).await?;
    confirm(
        ctx,
        "✅ User Unbanned",
        format!("<@{}> has been unbanned.\nCase ID: **#{}**", user.id, case.case_id),
    )
    .await
}

/// Set the moderation log channel.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn setmodlog(
    ctx: Context<'_>,
    #[description = "Channel that receives case cards"]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    ctx.data()
        .settings
        .set_modlog_channel(guild_id, channel.id.get())
        .await?;

    ctx.send(
        poise::CreateReply::default()
            .embed(success_card(format!(
                "Moderation cases will be logged in <#{}>",
                channel.id
            )))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Show a member's most recent cases.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn cases(
    ctx: Context<'_>,
    #[description = "Member to look up"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let history = ctx
        .data()
        .moderation
        .cases_for_user(guild_id, user.id.get(), HISTORY_SIZE)
        .await?;

    let embed = if history.is_empty() {
        info_card(format!("<@{}> has a clean record.", user.id))
    } else {
        let lines: Vec<String> = history.iter().map(history_line).collect();
        card(
            format!("📂 Cases for {}", user.name),
            lines.join("\n"),
            BLURPLE,
        )
    };

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Look up a single case by number.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn case(
    ctx: Context<'_>,
    #[description = "Case number"]
    #[min = 1]
    id: u64,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let embed = match ctx.data().moderation.get_case(guild_id, id).await? {
        Some(case) => case_card(&case),
        None => error_card(format!("Case #{} doesn't exist.", id)),
    };

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

fn history_line(case: &ModCase) -> String {
    format!(
        "**#{}** {} • {} • by <@{}>",
        case.case_id,
        case.case_type,
        case.reason,
        case.moderator_id
    )
}

/// Accepts a raw ID or a `<@id>` / `<@!id>` mention.
fn parse_user_id(input: &str) -> Option<serenity::UserId> {
    let trimmed = input
        .trim()
        .trim_start_matches("<@")
        .trim_start_matches('!')
        .trim_end_matches('>');
    trimmed
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(serenity::UserId::new)
}
