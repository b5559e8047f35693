//! Client-side pre-submit validation mirroring the backend's constraints on
//! vinyl records.

use crate::{CreateRecord, UpdateRecord, MIN_RELEASE_YEAR};
use chrono::{Datelike, Utc};
use std::collections::HashMap;

const MAX_TEXT_LEN: usize = 255;

/// Validate a create payload. An empty map means the payload is acceptable.
pub fn validate_new_record(record: &CreateRecord) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    check_text("title", "Title", Some(record.title.as_str()), &mut errors);
    check_text("artist", "Artist", Some(record.artist.as_str()), &mut errors);
    check_release_year(Some(record.release_year), &mut errors);

    errors
}

/// Validate a partial update; only present fields are checked.
pub fn validate_record_patch(patch: &UpdateRecord) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    check_text("title", "Title", patch.title.as_deref(), &mut errors);
    check_text("artist", "Artist", patch.artist.as_deref(), &mut errors);
    check_release_year(patch.release_year, &mut errors);

    errors
}

fn check_text(
    field: &str,
    display: &str,
    value: Option<&str>,
    errors: &mut HashMap<String, String>,
) {
    let Some(value) = value else { return };
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{display} is required"));
    } else if value.len() > MAX_TEXT_LEN {
        errors.insert(
            field.to_string(),
            format!("{display} must be less than 255 characters"),
        );
    }
}

fn check_release_year(year: Option<i32>, errors: &mut HashMap<String, String>) {
    let Some(year) = year else { return };
    let current_year = Utc::now().year();
    if year < MIN_RELEASE_YEAR {
        errors.insert(
            "releaseYear".to_string(),
            format!("Release year must be {MIN_RELEASE_YEAR} or later"),
        );
    } else if year > current_year {
        errors.insert(
            "releaseYear".to_string(),
            format!("Release year cannot be in the future (max: {current_year})"),
        );
    }
}
