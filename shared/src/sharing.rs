use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    LinkedIn,
    Instagram,
    #[default]
    General,
}

impl SharePlatform {
    /// Unknown platforms (twitter, facebook, ...) get the general text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "linkedin" => SharePlatform::LinkedIn,
            "instagram" => SharePlatform::Instagram,
            _ => SharePlatform::General,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pre-filled post text for a completed door.
pub fn viral_message(platform: SharePlatform, task_title: Option<&str>, quest_title: Option<&str>) -> String {
    let quest_line = match non_empty(quest_title) {
        Some(title) => format!("Quest: {}", title),
        None => "Join the quest!".to_string(),
    };
    let challenge_line = |label: &str| match non_empty(task_title) {
        Some(title) => format!("{}: {}", label, title),
        None => "Another day, another adventure!".to_string(),
    };

    match platform {
        SharePlatform::LinkedIn => format!(
            "🎄 I just completed a Questmas challenge! 🎄\n\n\
             {}\n\n\
             {}\n\n\
             This interactive Christmas calendar experience combines real-world exploration with digital challenges. \
             Each day unlocks a new location-based quest that takes you on an adventure in your city.\n\n\
             Perfect for:\n\
             ✨ Team building activities\n\
             ✨ Community engagement\n\
             ✨ Holiday marketing campaigns\n\
             ✨ Family fun and bonding\n\n\
             Who else is up for the challenge? 🎯\n\n\
             #Questmas #ChristmasCalendar #Adventure #TeamBuilding #CommunityEngagement #HolidayMarketing \
             #InteractiveExperience #DigitalInnovation #LocationBased #Gamification",
            challenge_line("Today's challenge"),
            quest_line,
        ),
        SharePlatform::Instagram => format!(
            "🎄✨ Just completed a Questmas challenge! ✨🎄\n\n\
             {}\n\n\
             {}\n\n\
             This is SO fun! 🔥 Each day unlocks a new location-based challenge. \
             It's like a treasure hunt meets Christmas calendar!\n\n\
             Who's joining me? 👇\n\n\
             #Questmas #ChristmasCalendar #Adventure #QuestChallenge #HolidayFun #LocationBased #Gamification \
             #ChristmasAdventure #DailyChallenge #ExploreYourCity #HolidayVibes #ChristmasQuest #AdventureTime",
            challenge_line("Challenge"),
            quest_line,
        ),
        SharePlatform::General => format!(
            "🎄✨ I just completed a Questmas challenge! ✨🎄\n\n\
             {}\n\n\
             {}\n\n\
             This is SO fun! 🔥 Each day unlocks a new location-based challenge that takes you on an adventure. \
             It's like a treasure hunt meets Christmas calendar!\n\n\
             Who's joining me? 👇\n\n\
             #Questmas #ChristmasCalendar #Adventure #QuestChallenge #HolidayFun #LocationBased #Gamification \
             #ChristmasAdventure #DailyChallenge #ExploreYourCity #HolidayVibes",
            challenge_line("Challenge"),
            quest_line,
        ),
    }
}

const WEATHER_GREETINGS: &[&str] = &[
    "Happy snowy day,",
    "Cozy evening greetings,",
    "Frosty morning wishes,",
    "Warm afternoon hugs,",
    "A magical moment for you,",
    "Festive greetings,",
    "Hello from the winter wonderland,",
    "Holiday cheer to you,",
];

pub fn weather_greeting<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WEATHER_GREETINGS.choose(rng).copied().unwrap_or("Festive greetings,")
}

/// Invitation text a sharer sends along with the share link.
pub fn personalized_greeting<R: Rng + ?Sized>(
    recipient_name: &str,
    sharer_name: &str,
    quest_title: &str,
    is_christmas_calendar: bool,
    rng: &mut R,
) -> String {
    let greeting = format!("{} {}", weather_greeting(rng), recipient_name.trim());
    let sharer = sharer_name.trim();

    if is_christmas_calendar {
        format!(
            "{}! {} made you a Christmas calendar: 24 doors, one surprise every day until Christmas Eve. 🎄",
            greeting, sharer
        )
    } else {
        format!(
            "{}! {} invites you to the quest \"{}\". Are you ready for the adventure? 🎯",
            greeting,
            sharer,
            quest_title.trim()
        )
    }
}
