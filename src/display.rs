//! Terminal rendering of profiles, listings and character details.

use chrono::DateTime;
use colored::{ColoredString, Colorize};

use crate::{
    catalog::{Character, CharacterPage, Gender, Status},
    pagination::{PageItem, PageWindow},
    profile::UserProfile,
};

/// Episodes listed by code before collapsing into "+N more"
const MAX_LISTED_EPISODES: usize = 10;

/// Header line naming the signed-in user
pub fn header_line(profile: &UserProfile) -> String {
    format!(
        "[{}] {} - {}",
        profile.initials().bold(),
        profile.username,
        profile.job_title.dimmed()
    )
}

/// Coloured dot for a status
pub fn status_marker(status: Status) -> ColoredString {
    match status {
        Status::Alive => "●".green(),
        Status::Dead => "●".red(),
        Status::Unknown => "●".bright_black(),
    }
}

pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Alive => "Alive",
        Status::Dead => "Dead",
        Status::Unknown => "unknown",
    }
}

pub fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Female => "Female",
        Gender::Male => "Male",
        Gender::Genderless => "Genderless",
        Gender::Unknown => "unknown",
    }
}

/// Species, with the subtype appended when there is one
fn species_line(character: &Character) -> String {
    if character.kind.is_empty() {
        character.species.clone()
    } else {
        format!("{} - {}", character.species, character.kind)
    }
}

/// Compact listing entry for one character
pub fn character_card(character: &Character) -> String {
    format!(
        "#{:<4} {} {} ({})\n      {}\n      at {}",
        character.id,
        status_marker(character.status),
        character.name.bold(),
        status_label(character.status),
        species_line(character),
        character.location.name
    )
}

/// Full overlay for one character
pub fn character_detail(character: &Character) -> String {
    let mut lines: Vec<String> = vec![
        character.name.bold().to_string(),
        format!(
            "{} {} - {}",
            status_marker(character.status),
            status_label(character.status),
            character.species
        ),
        format!("Gender: {}", gender_label(character.gender)),
    ];
    if !character.kind.is_empty() {
        lines.push(format!("Type: {}", character.kind));
    }
    lines.push(format!("Origin: {}", character.origin.name));
    lines.push(format!("Last Known Location: {}", character.location.name));
    lines.push(episode_summary(character));
    lines.push(format!("Image: {}", character.image));
    lines.push(format!("First seen: {}", first_seen(&character.created)).dimmed().to_string());
    lines.join("\n")
}

fn episode_summary(character: &Character) -> String {
    let count = character.episode.len();
    let plural = if count == 1 { "" } else { "s" };
    let mut labels: Vec<String> = character
        .episode
        .iter()
        .take(MAX_LISTED_EPISODES)
        .map(|ep| ep.episode.clone().unwrap_or_else(|| ep.name.clone()))
        .collect();
    if count > MAX_LISTED_EPISODES {
        labels.push(format!("+{} more", count - MAX_LISTED_EPISODES));
    }

    if labels.is_empty() {
        format!("Featured in {count} episode{plural}")
    } else {
        format!("Featured in {count} episode{plural}: {}", labels.join(", "))
    }
}

/// Creation timestamp as a long date, or the raw value when it does not parse
pub fn first_seen(created: &str) -> String {
    DateTime::parse_from_rfc3339(created)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| created.to_string())
}

/// Pagination controls, e.g. `‹ 1 … 4 [5] 6 … 10 ›`
pub fn page_window_line(window: &PageWindow) -> String {
    let previous = if window.has_previous {
        "‹".normal()
    } else {
        "‹".dimmed()
    };
    let next = if window.has_next {
        "›".normal()
    } else {
        "›".dimmed()
    };

    let mut parts: Vec<String> = vec![previous.to_string()];
    for item in &window.items {
        parts.push(match item {
            PageItem::Page(page) if *page == window.current_page => {
                format!("[{page}]").bold().to_string()
            }
            PageItem::Page(page) => page.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        });
    }
    parts.push(next.to_string());
    parts.join(" ")
}

/// Whole listing view for one page
///
/// # Arguments
/// * `page` - Page returned by the data source
/// * `window` - Page window computed for the same page
pub fn listing(page: &CharacterPage, window: &PageWindow) -> String {
    if page.results.is_empty() {
        return "No characters found".dimmed().to_string();
    }

    let mut sections: Vec<String> = page.results.iter().map(character_card).collect();
    if page.info.pages > 1 {
        sections.push(page_window_line(window));
    }
    sections.push(
        format!(
            "Showing page {} of {} ({} total characters)",
            window.current_page, page.info.pages, page.info.count
        )
        .dimmed()
        .to_string(),
    );
    sections.join("\n\n")
}

/// Error block that replaces a failed view
///
/// # Arguments
/// * `what` - Noun for the content that failed to load
/// * `message` - Raw failure message
pub fn fetch_failure(what: &str, message: &str) -> String {
    format!("{}\n{}", format!("Failed to load {what}").red(), message)
}
