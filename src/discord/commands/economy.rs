// Discord commands for the economy system
//
// Following the same pattern as the other command files:
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response

use crate::discord::embeds::{card, format_number, info_card, medal, BLURPLE, GOLD, GREEN};
use crate::discord::{Context, Error};

/// Number of wallets shown by /richest.
const RICHEST_SIZE: usize = 10;

/// Check your current balance.
#[poise::command(slash_command, guild_only)]
pub async fn balance(ctx: Context<'_>) -> Result<(), Error> {
    let user = ctx.author();
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let balance = ctx.data().economy.get_balance(user.id.get(), guild_id).await?;

    let embed = card(
        "💰 Balance",
        format!(
            "**{}**, you currently have **{} credits.**",
            user.display_name(),
            format_number(balance)
        ),
        GOLD,
    );
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

/// Work to earn credits (cooldown 1h).
#[poise::command(slash_command, guild_only, user_cooldown = 3600)]
pub async fn work(ctx: Context<'_>) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let result = ctx.data().economy.work(user_id, guild_id).await?;

    let embed = card(
        "🧰 Work Complete",
        format!(
            "You worked hard and earned **{} credits!**\nNew balance: **{}**",
            result.earned,
            format_number(result.new_balance)
        ),
        GREEN,
    );
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

/// Claim your daily credits reward
#[poise::command(slash_command, guild_only)]
pub async fn daily(ctx: Context<'_>) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    // Attempt to claim daily reward
    let result = ctx.data().economy.claim_daily(user_id, guild_id).await?;

    if let Some(claim) = result {
        let embed = card(
            "✅ Daily Reward Claimed!",
            format!("You received **{} credits**!", claim.coins_awarded),
            GREEN,
        )
        .field(
            "New Balance",
            format!("🪙 {}", format_number(claim.new_balance)),
            true,
        )
        .field(
            "Next Claim",
            format!("<t:{}:R>", claim.next_claim_time.timestamp()),
            true,
        );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
    } else {
        // On cooldown
        let next_claim = ctx
            .data()
            .economy
            .next_daily_time(user_id, guild_id)
            .await?;

        let description = match next_claim {
            Some(next_time) => format!(
                "You've already claimed your daily reward. Come back <t:{}:R>!",
                next_time.timestamp()
            ),
            None => "You've already claimed your daily reward today!".to_string(),
        };

        let embed = card("⏰ Daily Reward Already Claimed", description, BLURPLE);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
    }

    Ok(())
}

/// Show the richest members in this server.
#[poise::command(slash_command, guild_only)]
pub async fn richest(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let wallets = ctx
        .data()
        .economy
        .leaderboard(guild_id, RICHEST_SIZE)
        .await?;

    if wallets.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .embed(info_card("No economy data found yet."))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let lines: Vec<String> = wallets
        .iter()
        .enumerate()
        .map(|(i, w)| {
            format!(
                "{} <@{}> — **{} credits**",
                medal(i),
                w.user_id,
                format_number(w.balance)
            )
        })
        .collect();

    let embed = card("🏆 Richest Members", lines.join("\n"), GOLD);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
