use crate::core::fun;
use crate::discord::embeds::{card, BLURPLE, GOLD};
use crate::discord::{Context, Error};

/// Flip a coin: heads or tails?
#[poise::command(slash_command)]
pub async fn coinflip(ctx: Context<'_>) -> Result<(), Error> {
    // ThreadRng isn't Send, so it must not live across the await below.
    let side = fun::coin_flip(&mut rand::thread_rng());

    let embed = card(
        "Coin Flip Result",
        format!("<@{}> flipped **🪙 {}**!", ctx.author().id, side),
        GOLD,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Ask the magic 8-ball a question.
#[poise::command(slash_command, rename = "8ball")]
pub async fn eight_ball(
    ctx: Context<'_>,
    #[description = "Your question"] question: String,
) -> Result<(), Error> {
    let answer = fun::eight_ball(&mut rand::thread_rng());

    let embed = card(
        "🎱 Magic 8-Ball",
        format!("**Question:** {}\n**Answer:** {}", question, answer),
        BLURPLE,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
