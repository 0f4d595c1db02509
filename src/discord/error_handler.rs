// Global poise error handler.
//
// Every user-facing failure becomes an ephemeral card. Unexpected command
// errors are also logged and, when configured, reported to the developer log
// channel.

use crate::discord::embeds::{card, error_card, info_card, truncate, RED};
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// Longest error text copied into the developer log card.
const DEV_LOG_ERROR_CHARS: usize = 1800;

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            reply(ctx, info_card(cooldown_message(remaining_cooldown))).await;
        }
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            let message = match missing_permissions {
                Some(p) => format!("🚫 You're missing permissions: `{}`.", p),
                None => "🚫 You're missing permissions for this command.".to_string(),
            };
            reply(ctx, error_card(message)).await;
        }
        poise::FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            reply(
                ctx,
                error_card(format!(
                    "⚠️ I don't have permissions: `{}`.",
                    missing_permissions
                )),
            )
            .await;
        }
        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
            reply(ctx, error_card(format!("❗ Invalid argument: {}", error))).await;
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(error) = error {
                tracing::error!(command = %ctx.command().name, "Command check errored: {}", error);
            }
            reply(
                ctx,
                error_card("🚫 You don't have permission to run this command."),
            )
            .await;
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().name,
                user_id = ctx.author().id.get(),
                guild_id = ctx.guild_id().map(|g| g.get()),
                "Command failed: {}",
                error
            );
            reply(
                ctx,
                error_card("An unexpected error occurred. The issue has been logged."),
            )
            .await;
            report_to_dev_log(ctx, &error.to_string()).await;
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

fn cooldown_message(remaining: Duration) -> String {
    format!(
        "⏳ Please wait **{:.1} seconds** before using this again.",
        remaining.as_secs_f32()
    )
}

async fn reply(ctx: Context<'_>, embed: serenity::CreateEmbed) {
    let reply = poise::CreateReply::default().embed(embed).ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        tracing::warn!("Failed to send error card: {}", e);
    }
}

async fn report_to_dev_log(ctx: Context<'_>, error_text: &str) {
    let Some(channel_id) = ctx.data().config.dev_log_channel_id else {
        return;
    };

    let guild = ctx
        .guild_id()
        .map(|g| g.get().to_string())
        .unwrap_or_else(|| "DM".to_string());

    let embed = card(
        "🐞 Command Error",
        format!("```\n{}\n```", truncate(error_text, DEV_LOG_ERROR_CHARS)),
        RED,
    )
    .field("Command", format!("/{}", ctx.command().name), true)
    .field("User", format!("<@{}>", ctx.author().id.get()), true)
    .field("Guild", guild, true);

    if let Err(e) = serenity::ChannelId::new(channel_id)
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await
    {
        tracing::warn!(channel_id, "Failed to post to developer log: {}", e);
    }
}
