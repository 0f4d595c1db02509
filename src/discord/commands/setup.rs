// /setup - checks the database and registers the guild, reporting progress by
// editing a single card.

use crate::discord::checks::admin_role;
use crate::discord::embeds::{card, BLURPLE, GREEN};
use crate::discord::{Context, Error};
use crate::infra::database::{migrate_all, verify_tables};

/// Initialize Elura Utility for this server.
#[poise::command(slash_command, guild_only, check = "admin_role")]
pub async fn setup(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();
    let guild_name = ctx
        .guild()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| guild_id.to_string());

    let progress = card(
        "🚀 Elura Setup In Progress",
        "Checking required tables...",
        BLURPLE,
    );
    let handle = ctx
        .send(poise::CreateReply::default().embed(progress))
        .await?;

    let pool = &ctx.data().pool;
    let missing = verify_tables(pool).await;
    if !missing.is_empty() {
        tracing::warn!(guild_id, ?missing, "Tables missing during setup, migrating");
        migrate_all(pool).await?;
    }

    let newly_registered = ctx.data().settings.register_guild(guild_id).await?;
    tracing::info!(guild_id, newly_registered, "Guild setup complete");

    let done = card(
        "✅ Elura Setup Complete!",
        setup_report(&missing, newly_registered, &guild_name),
        GREEN,
    )
    .field("Server", guild_name, false)
    .field("Status", "All systems operational.", false);

    handle
        .edit(ctx, poise::CreateReply::default().embed(done))
        .await?;

    Ok(())
}

fn setup_report(missing: &[&str], newly_registered: bool, guild_name: &str) -> String {
    let tables = if missing.is_empty() {
        "✅ All tables already exist.".to_string()
    } else {
        format!("🆕 Created tables: {}", missing.join(", "))
    };
    let guild = if newly_registered {
        format!("🏠 Registered guild: `{}`", guild_name)
    } else {
        format!("🔁 Guild `{}` already registered.", guild_name)
    };
    format!("✅ Connected to the database.\n\n{}\n\n{}", tables, guild)
}
