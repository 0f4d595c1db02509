// Shared card builders so every reply looks the same.

use crate::core::moderation::{CaseType, ModCase};
use poise::serenity_prelude as serenity;

pub const FOOTER_TEXT: &str = "Elura Utility • Powered by r4e";

pub const BLURPLE: u32 = 0x5865F2;
pub const GOLD: u32 = 0xFFD700;
pub const RED: u32 = 0xED4245;
pub const GREEN: u32 = 0x57F287;

/// Base card: title, description, color, UTC timestamp and the common footer.
pub fn card(
    title: impl Into<String>,
    description: impl Into<String>,
    color: u32,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(color)
        .timestamp(serenity::Timestamp::now())
        .footer(serenity::CreateEmbedFooter::new(FOOTER_TEXT))
}

pub fn error_card(message: impl Into<String>) -> serenity::CreateEmbed {
    card("❌ Error", message, RED)
}

pub fn success_card(message: impl Into<String>) -> serenity::CreateEmbed {
    card("✅ Success", message, GREEN)
}

pub fn info_card(message: impl Into<String>) -> serenity::CreateEmbed {
    card("ℹ️ Information", message, BLURPLE)
}

/// The card posted to a guild's modlog channel.
pub fn case_card(case: &ModCase) -> serenity::CreateEmbed {
    let description = format!(
        "**User:** <@{}>\n**Moderator:** <@{}>\n**Reason:** {}",
        case.user_id, case.moderator_id, case.reason
    );

    card(
        format!("🧾 Case #{} | {}", case.case_id, case.case_type),
        description,
        case_color(&case.case_type),
    )
    .footer(serenity::CreateEmbedFooter::new(format!(
        "Timestamp: {} UTC • {}",
        case.timestamp_label(),
        FOOTER_TEXT
    )))
}

pub fn case_color(case_type: &CaseType) -> u32 {
    match case_type {
        CaseType::Warning | CaseType::Timeout { .. } => GOLD,
        CaseType::Kick | CaseType::Ban => RED,
        CaseType::Unban => GREEN,
    }
}

/// 🥇🥈🥉 for the podium, then `#N`. `rank` is zero-based.
pub fn medal(rank: usize) -> String {
    match rank {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("#{}", n + 1),
    }
}

/// Format a number with commas for readability
pub fn format_number(n: i64) -> String {
    let s = n.to_string();
    let negative = s.starts_with('-');
    let s = if negative { &s[1..] } else { &s };

    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }

    if negative {
        result.insert(0, '-');
    }

    result
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(100), "100");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-1234567), "-1,234,567");
    }

    #[test]
    fn test_medals() {
        assert_eq!(medal(0), "🥇");
        assert_eq!(medal(2), "🥉");
        assert_eq!(medal(3), "#4");
        assert_eq!(medal(9), "#10");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 10), "abcdefghij");
        assert_eq!(truncate("abcdefghijk", 10), "abcdefg...");
        // Counts characters, not bytes
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_case_colors() {
        assert_eq!(case_color(&CaseType::Ban), RED);
        assert_eq!(case_color(&CaseType::Timeout { minutes: 5 }), GOLD);
        assert_eq!(case_color(&CaseType::Unban), GREEN);
    }
}
