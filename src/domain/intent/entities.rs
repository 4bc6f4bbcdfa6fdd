//! Age, gender and duration extraction.
//!
//! Runs independently of intent scoring and always contributes to the
//! classification result.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Entity, EntityKind};

const MAX_PLAUSIBLE_AGE: u32 = 120;

static AGE_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(\d{1,3})\s*-?\s*(?:years?|yrs?)[\s-]*old|(\d{1,3})\s*(?:y/o|yo)|aged?\s*(?:is\s*)?(\d{1,3}))\b",
    )
    .expect("valid age regex")
});

static AGE_HI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3})\s*(?:साल|वर्ष)").expect("valid hindi age regex"));

static GENDER_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(male|female|man|woman|boy|girl|pregnant)\b").expect("valid gender regex")
});

static GENDER_HI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(पुरुष|लड़का|लड़की|महिला|औरत|गर्भवती)").expect("valid hindi gender regex")
});

static DURATION_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,3}|a|an|one|two|three|four|five|six|seven|ten)\s+(hours?|days?|weeks?|months?)\b",
    )
    .expect("valid duration regex")
});

static DURATION_HI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3})\s*(घंटे|घंटा|दिन|हफ्ते|हफ़्ते|सप्ताह|महीने|महीना)")
        .expect("valid hindi duration regex")
});

/// Extracts all recognised entities, at most one per kind, in kind order.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    [extract_age(text), extract_gender(text), extract_duration(text)]
        .into_iter()
        .flatten()
        .collect()
}

fn extract_age(text: &str) -> Option<Entity> {
    let from_english = AGE_EN.captures_iter(text).find_map(|caps| {
        let number = (1..=3).find_map(|i| caps.get(i))?;
        plausible_age(&caps, number.as_str())
    });
    from_english.or_else(|| {
        AGE_HI
            .captures_iter(text)
            .find_map(|caps| plausible_age(&caps, caps.get(1)?.as_str()))
    })
}

fn plausible_age(caps: &Captures<'_>, number: &str) -> Option<Entity> {
    let age: u32 = number.parse().ok()?;
    if age == 0 || age > MAX_PLAUSIBLE_AGE {
        return None;
    }
    let whole = caps.get(0)?;
    Some(Entity::new(
        EntityKind::Age,
        age.to_string(),
        whole.start(),
        whole.end(),
    ))
}

fn extract_gender(text: &str) -> Option<Entity> {
    let found = GENDER_EN.find(text).or_else(|| GENDER_HI.find(text))?;
    let value = match found.as_str().to_lowercase().as_str() {
        "male" | "man" | "boy" | "पुरुष" | "लड़का" => "male",
        _ => "female",
    };
    Some(Entity::new(EntityKind::Gender, value, found.start(), found.end()))
}

fn extract_duration(text: &str) -> Option<Entity> {
    if let Some(caps) = DURATION_EN.captures(text) {
        let whole = caps.get(0)?;
        let amount = word_to_number(&caps[1].to_lowercase())?;
        let unit = singular_unit(&caps[2].to_lowercase());
        return Some(Entity::new(
            EntityKind::Duration,
            format!("{} {}", amount, pluralize(unit, amount)),
            whole.start(),
            whole.end(),
        ));
    }

    let caps = DURATION_HI.captures(text)?;
    let whole = caps.get(0)?;
    let amount: u32 = caps[1].parse().ok()?;
    let unit = match &caps[2] {
        "घंटे" | "घंटा" => "hour",
        "दिन" => "day",
        "महीने" | "महीना" => "month",
        _ => "week",
    };
    Some(Entity::new(
        EntityKind::Duration,
        format!("{} {}", amount, pluralize(unit, amount)),
        whole.start(),
        whole.end(),
    ))
}

fn word_to_number(word: &str) -> Option<u32> {
    match word {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "ten" => Some(10),
        digits => digits.parse().ok(),
    }
}

fn singular_unit(unit: &str) -> &'static str {
    if unit.starts_with("hour") {
        "hour"
    } else if unit.starts_with("day") {
        "day"
    } else if unit.starts_with("week") {
        "week"
    } else {
        "month"
    }
}

fn pluralize(unit: &str, amount: u32) -> String {
    if amount == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}
