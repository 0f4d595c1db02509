// This is the entry point of the Elura Utility bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (SQLite stores)
// - `discord/` = Discord-specific adapters (commands, events, cards)
//
// This file's job is to:
// 1. Load configuration
// 2. Open the database and run migrations
// 3. Initialize services (dependency injection)
// 4. Set up the Discord framework and register commands

mod config;
// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::config::BotConfig;
use crate::discord::commands::presence;
use crate::discord::error_handler::on_error;
use crate::discord::events;
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = events::handle_message(ctx, data, new_message).await {
                tracing::error!(
                    guild_id = new_message.guild_id.map(|g| g.get()),
                    "Error handling message: {}",
                    e
                );
            }
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if let Err(e) = events::handle_member_join(ctx, data, new_member).await {
                tracing::error!(
                    guild_id = new_member.guild_id.get(),
                    "Error handling member join: {}",
                    e
                );
            }
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // One SQLite pool shared by every store. This is the "composition root"
    // where everything gets wired together.

    let pool = infra::database::connect(&config.database_url).await?;
    infra::database::migrate_all(&pool).await?;

    let token = config.discord_token.clone();
    let dev_guild_id = config.dev_guild_id;
    let data = Data::new(config, pool);

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read counting numbers
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS; // Required for welcome messages

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::debug!(
                        command = %ctx.command().qualified_name,
                        user_id = ctx.author().id.get(),
                        "Running command"
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}", ready.user.name);

                // Global registration can take up to an hour to propagate
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                // The development guild gets the commands immediately
                if let Some(guild_id) = dev_guild_id {
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        serenity::GuildId::new(guild_id),
                    )
                    .await?;
                    tracing::info!(guild_id, "Commands registered in development guild");
                }

                tracing::info!(
                    "Registered {} commands",
                    framework.options().commands.len()
                );
                presence::on_ready(ctx, ready);

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
