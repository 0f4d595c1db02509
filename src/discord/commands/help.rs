use crate::discord::checks::has_restricted_access;
use crate::discord::embeds::{card, BLURPLE, RED};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

// Category definitions with emojis and order
const CATEGORY_ORDER: &[&str] = &[
    "Counting",
    "Economy",
    "Activity",
    "Moderation",
    "Welcome",
    "Fun",
    "Privacy",
];

/// Commands that need the admin or privacy role. They go on their own card.
const RESTRICTED: &[&str] = &["setup", "privacynotice", "clearserverdata"];

fn get_category_emoji(category: &str) -> &'static str {
    match category {
        "Counting" => "🔢",
        "Economy" => "🪙",
        "Activity" => "💬",
        "Moderation" => "🛡️",
        "Welcome" => "👋",
        "Fun" => "🎉",
        "Privacy" => "🔐",
        _ => "•",
    }
}

struct CommandMetadata {
    category: &'static str,
    priority: i32,
    note: Option<&'static str>,
}

fn get_command_metadata(name: &str) -> CommandMetadata {
    let (category, priority, note) = match name {
        "setcountingchannel" => ("Counting", 30, Some("Run it in the channel you want to use.")),
        "countingleaderboard" => ("Counting", 20, None),
        "resetcount" => ("Counting", 10, None),
        "balance" => ("Economy", 40, None),
        "daily" => ("Economy", 30, None),
        "work" => ("Economy", 20, Some("Once per hour.")),
        "richest" => ("Economy", 10, None),
        "messages" => ("Activity", 20, None),
        "leaderboard" => ("Activity", 10, None),
        "warn" => ("Moderation", 80, None),
        "timeout" => ("Moderation", 70, Some("Up to 40320 minutes (28 days).")),
        "kick" => ("Moderation", 60, None),
        "ban" => ("Moderation", 50, None),
        "unban" => ("Moderation", 40, None),
        "cases" => ("Moderation", 30, None),
        "case" => ("Moderation", 20, None),
        "setmodlog" => ("Moderation", 10, None),
        "setwelcome" => ("Welcome", 20, None),
        "clearwelcome" => ("Welcome", 10, None),
        "coinflip" => ("Fun", 20, None),
        "8ball" => ("Fun", 10, None),
        "privacy" => ("Privacy", 10, None),
        _ => ("Other", 0, None),
    };
    CommandMetadata {
        category,
        priority,
        note,
    }
}

/// Show all Elura Utility commands by category.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let mut categories: HashMap<&str, Vec<(i32, String)>> = HashMap::new();
    let mut restricted_entries = Vec::new();

    for command in &ctx.framework().options().commands {
        if command.hide_in_help || command.name == "help" {
            continue;
        }

        let description = command
            .description
            .as_deref()
            .unwrap_or("No description provided.");
        let mut entry = format!("• **/{}**: {}", command.name, description);

        if RESTRICTED.contains(&command.name.as_str()) {
            restricted_entries.push(entry);
            continue;
        }

        let metadata = get_command_metadata(&command.name);
        if let Some(note) = metadata.note {
            entry.push_str(&format!("\n  ⤷ {}", note));
        }

        categories
            .entry(metadata.category)
            .or_default()
            .push((metadata.priority, entry));
    }

    let mut embed = card(
        "💠 Elura Utility – Command Directory",
        "Your all-in-one utility system. Use slash commands with `/`.",
        BLURPLE,
    );

    if let Ok(user) = ctx.framework().bot_id.to_user(&ctx).await {
        embed = embed.thumbnail(user.face());
    }

    // Sort categories based on defined order, then alphabetically for others
    let mut sorted_categories: Vec<_> = categories.keys().cloned().collect();
    sorted_categories.sort_by(|a, b| {
        let pos_a = CATEGORY_ORDER.iter().position(|&x| x == *a).unwrap_or(999);
        let pos_b = CATEGORY_ORDER.iter().position(|&x| x == *b).unwrap_or(999);
        pos_a.cmp(&pos_b).then(a.cmp(b))
    });

    for category in sorted_categories {
        if let Some(entries) = categories.get_mut(category) {
            // Sort by priority (descending), then name (ascending)
            entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

            let title = format!("{} {}", get_category_emoji(category), category);
            let formatted_entries: Vec<String> = entries.iter().map(|(_, s)| s.clone()).collect();

            // Chunk entries to avoid hitting 1024 char limit per field
            for (i, chunk) in chunk_entries(&formatted_entries).iter().enumerate() {
                let field_name = if i == 0 {
                    title.clone()
                } else {
                    format!("{} (cont.)", title)
                };
                embed = embed.field(field_name, chunk.join("\n"), false);
            }
        }
    }

    let mut reply = poise::CreateReply::default().embed(embed).ephemeral(true);

    if !restricted_entries.is_empty() && has_restricted_access(ctx).await {
        let restricted = card(
            "🔒 Restricted Commands",
            restricted_entries.join("\n"),
            RED,
        )
        .footer(serenity::CreateEmbedFooter::new(
            "Restricted Access • Authorized Role Only",
        ));
        reply = reply.embed(restricted);
    }

    ctx.send(reply).await?;

    Ok(())
}

fn chunk_entries(entries: &[String]) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current_chunk = Vec::new();
    let mut current_length = 0;

    for entry in entries {
        let entry_len = entry.len();
        // Discord field value limit is 1024. We leave a bit of buffer.
        if current_length + entry_len + 1 > 1000 && !current_chunk.is_empty() {
            chunks.push(current_chunk);
            current_chunk = Vec::new();
            current_length = 0;
        }

        current_chunk.push(entry.clone());
        current_length += entry_len + 1; // +1 for newline
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    chunks
}
