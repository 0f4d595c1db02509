// Discord commands module.
// Each feature gets its own command file.

use crate::discord::{moderation, Data, Error};

pub mod activity;

pub mod counting;

pub mod economy;

pub mod fun;

pub mod help;

// Bot presence management
pub mod presence;

pub mod privacy;

pub mod setup;

pub mod welcome;

/// Every slash command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        setup::setup(),
        counting::setcountingchannel(),
        counting::resetcount(),
        counting::countingleaderboard(),
        economy::balance(),
        economy::work(),
        economy::daily(),
        economy::richest(),
        moderation::warn(),
        moderation::kick(),
        moderation::ban(),
        moderation::timeout(),
        moderation::unban(),
        moderation::setmodlog(),
        moderation::cases(),
        moderation::case(),
        activity::messages(),
        activity::leaderboard(),
        welcome::setwelcome(),
        welcome::clearwelcome(),
        privacy::privacy(),
        privacy::privacynotice(),
        privacy::clearserverdata(),
        fun::coinflip(),
        fun::eight_ball(),
        help::help(),
    ]
}
