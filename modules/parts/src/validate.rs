//! Client-side pre-submit validation mirroring the backend's constraints,
//! so forms can reject bad input before a round trip. The backend remains
//! the authority; these checks only have to agree with it, not replace it.

use crate::{CreatePart, UpdatePart};
use std::collections::HashMap;

const MAX_TEXT_LEN: usize = 255;

/// Validate a create payload. An empty map means the payload is acceptable.
pub fn validate_new_part(part: &CreatePart) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    check_name(Some(part.name.as_str()), &mut errors);
    check_location(Some(part.location.as_str()), &mut errors);
    check_quantity(Some(part.quantity), &mut errors);

    errors
}

/// Validate a partial update; only present fields are checked.
pub fn validate_part_patch(patch: &UpdatePart) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    check_name(patch.name.as_deref(), &mut errors);
    check_location(patch.location.as_deref(), &mut errors);
    check_quantity(patch.quantity, &mut errors);

    errors
}

fn check_name(name: Option<&str>, errors: &mut HashMap<String, String>) {
    let Some(name) = name else { return };
    if name.trim().is_empty() {
        errors.insert("name".to_string(), "Name is required".to_string());
    } else if name.len() > MAX_TEXT_LEN {
        errors.insert(
            "name".to_string(),
            "Name must be less than 255 characters".to_string(),
        );
    }
}

fn check_location(location: Option<&str>, errors: &mut HashMap<String, String>) {
    let Some(location) = location else { return };
    if location.trim().is_empty() {
        errors.insert("location".to_string(), "Location is required".to_string());
    } else if location.len() > MAX_TEXT_LEN {
        errors.insert(
            "location".to_string(),
            "Location must be less than 255 characters".to_string(),
        );
    }
}

fn check_quantity(quantity: Option<u32>, errors: &mut HashMap<String, String>) {
    if quantity == Some(0) {
        errors.insert(
            "quantity".to_string(),
            "Quantity must be at least 1".to_string(),
        );
    }
}
