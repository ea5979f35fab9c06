//! Plain-text rendering of search results, details and the Persian section.

use crate::content::{ContentRecord, CreditsRecord, ScalarField, SearchResults};
use crate::pipeline::TranslatedRecord;

/// Labels for the Persian section
pub mod labels {
    pub const TITLE: &str = "عنوان";
    pub const SUMMARY: &str = "خلاصه";
    pub const ORIGINAL_TITLE: &str = "عنوان اصلی";
    pub const STATUS: &str = "وضعیت";
    pub const PLACE_OF_BIRTH: &str = "محل تولد";
    pub const TAGLINE: &str = "شعار";
    pub const CAST: &str = "بازیگران";
    pub const CREW: &str = "عوامل";
    pub const CHARACTER: &str = "نقش";
    pub const JOB: &str = "سمت";
    pub const GENRES: &str = "ژانرها";
    pub const PRODUCTION_COMPANIES: &str = "شرکت‌های تولید";
    pub const SPOKEN_LANGUAGES: &str = "زبان‌های گفتاری";
    pub const UNKNOWN: &str = "نامشخص";
    pub const NO_OVERVIEW: &str = "خلاصه‌ای موجود نیست";
}

pub fn render_search_results(results: &SearchResults) -> String {
    if results.results.is_empty() {
        return "No results found for your search\n".to_string();
    }

    let mut lines: Vec<String> = results
        .results
        .iter()
        .map(|item| {
            format!(
                "{:<7} {:>8}  {}  ({}, popularity {:.1})",
                item.media_type.map(|k| k.as_str()).unwrap_or("?"),
                item.id,
                item.display_title(),
                item.date().unwrap_or("-"),
                item.popularity.unwrap_or(0.0)
            )
        })
        .collect();
    lines.push(format!("{} results", results.total_results));
    finish(lines)
}

pub fn render_details(record: &ContentRecord, credits: &CreditsRecord) -> String {
    let mut lines = vec![format!(
        "{} [{} {}]",
        record.title().unwrap_or("Unknown"),
        record.kind(),
        record.id()
    )];
    if let Some(overview) = record.overview().filter(|o| !o.trim().is_empty()) {
        lines.push(format!("\n{}\n", overview));
    }

    let genres: Vec<&str> = record.genres().iter().map(|g| g.name.as_str()).collect();
    if !genres.is_empty() {
        lines.push(format!("Genres: {}", genres.join(", ")));
    }
    if !credits.cast.is_empty() {
        lines.push("Cast:".to_string());
        lines.extend(credits.cast.iter().map(|member| match &member.character {
            Some(character) if !character.is_empty() => format!("  {} as {}", member.name, character),
            _ => format!("  {}", member.name),
        }));
    }
    if !credits.crew.is_empty() {
        lines.push("Crew:".to_string());
        lines.extend(credits.crew.iter().map(|member| format!("  {} ({})", member.name, member.job)));
    }
    finish(lines)
}

/// Translated value of a scalar field, or the original when it was omitted
fn field_or_original(field: ScalarField, record: &ContentRecord, translated: &TranslatedRecord) -> Option<String> {
    translated
        .field(field)
        .map(str::to_string)
        .or_else(|| field.value_in(record).and_then(|v| v.as_str().map(str::to_string)))
        .filter(|s| !s.trim().is_empty())
}

pub fn render_translation(record: &ContentRecord, translated: &TranslatedRecord) -> String {
    let title = field_or_original(ScalarField::Title, record, translated);
    let summary = field_or_original(ScalarField::Overview, record, translated);
    let mut lines = vec![
        format!("{}: {}", labels::TITLE, title.as_deref().unwrap_or(labels::UNKNOWN)),
        format!("{}: {}", labels::SUMMARY, summary.as_deref().unwrap_or(labels::NO_OVERVIEW)),
    ];

    for (field, label) in [
        (ScalarField::OriginalTitle, labels::ORIGINAL_TITLE),
        (ScalarField::Tagline, labels::TAGLINE),
        (ScalarField::Status, labels::STATUS),
        (ScalarField::PlaceOfBirth, labels::PLACE_OF_BIRTH),
    ] {
        if let Some(value) = field_or_original(field, record, translated) {
            lines.push(format!("{}: {}", label, value));
        }
    }

    for (label, items) in [
        (labels::GENRES, &translated.genres),
        (labels::PRODUCTION_COMPANIES, &translated.companies),
        (labels::SPOKEN_LANGUAGES, &translated.languages),
    ] {
        if !items.is_empty() {
            lines.push(format!("{}: {}", label, items.join("، ")));
        }
    }

    if !translated.cast.is_empty() {
        lines.push(format!("{}:", labels::CAST));
        lines.extend(translated.cast.iter().map(|member| match &member.translated_character {
            Some(character) => format!("  {} ({}: {})", member.translated_name, labels::CHARACTER, character),
            None => format!("  {}", member.translated_name),
        }));
    }
    if !translated.crew.is_empty() {
        lines.push(format!("{}:", labels::CREW));
        lines.extend(
            translated
                .crew
                .iter()
                .map(|member| format!("  {} ({}: {})", member.translated_name, labels::JOB, member.translated_job)),
        );
    }
    finish(lines)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
