use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed categorical type of a bicycle part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartType {
    Frame,
    Brake,
    Tire,
    Pump,
    Other,
}

impl PartType {
    pub const ALL: [PartType; 5] = [
        PartType::Frame,
        PartType::Brake,
        PartType::Tire,
        PartType::Pump,
        PartType::Other,
    ];

    /// Wire name, as used in JSON bodies and the `/parts/type/{type}` path.
    pub fn as_str(self) -> &'static str {
        match self {
            PartType::Frame => "FRAME",
            PartType::Brake => "BRAKE",
            PartType::Tire => "TIRE",
            PartType::Pump => "PUMP",
            PartType::Other => "OTHER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartType::Frame => "Frame",
            PartType::Brake => "Brake",
            PartType::Tire => "Tire",
            PartType::Pump => "Pump",
            PartType::Other => "Other",
        }
    }
}

impl std::str::FromStr for PartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FRAME" => Ok(PartType::Frame),
            "BRAKE" => Ok(PartType::Brake),
            "TIRE" => Ok(PartType::Tire),
            "PUMP" => Ok(PartType::Pump),
            "OTHER" => Ok(PartType::Other),
            other => Err(format!("unknown part type: {other}")),
        }
    }
}

impl std::fmt::Display for PartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical condition of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartCondition {
    New,
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PartCondition {
    pub const ALL: [PartCondition; 5] = [
        PartCondition::New,
        PartCondition::Excellent,
        PartCondition::Good,
        PartCondition::Fair,
        PartCondition::Poor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PartCondition::New => "NEW",
            PartCondition::Excellent => "EXCELLENT",
            PartCondition::Good => "GOOD",
            PartCondition::Fair => "FAIR",
            PartCondition::Poor => "POOR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartCondition::New => "New",
            PartCondition::Excellent => "Excellent",
            PartCondition::Good => "Good",
            PartCondition::Fair => "Fair",
            PartCondition::Poor => "Poor",
        }
    }
}

impl std::str::FromStr for PartCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NEW" => Ok(PartCondition::New),
            "EXCELLENT" => Ok(PartCondition::Excellent),
            "GOOD" => Ok(PartCondition::Good),
            "FAIR" => Ok(PartCondition::Fair),
            "POOR" => Ok(PartCondition::Poor),
            other => Err(format!("unknown condition: {other}")),
        }
    }
}

impl std::fmt::Display for PartCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bicycle part as returned by the backend. `id` and the timestamps are
/// server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub part_type: PartType,
    pub location: String,
    pub quantity: u32,
    pub condition: PartCondition,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /parts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePart {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub part_type: PartType,
    pub location: String,
    pub quantity: u32,
    pub condition: PartCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial payload for `PUT /parts/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub part_type: Option<PartType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<PartCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_deserializes_from_backend_wire_form() {
        let part: Part = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "Chain",
                "description": null,
                "type": "OTHER",
                "location": "Shelf B",
                "quantity": 3,
                "condition": "GOOD",
                "notes": "half-link",
                "createdAt": "2024-03-01T10:00:00Z",
                "updatedAt": "2024-03-02T09:30:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(part.id, 42);
        assert_eq!(part.part_type, PartType::Other);
        assert_eq!(part.condition, PartCondition::Good);
        assert_eq!(part.notes.as_deref(), Some("half-link"));
    }

    #[test]
    fn create_payload_omits_absent_optionals() {
        let body = serde_json::to_value(CreatePart {
            name: "Chain".to_string(),
            description: None,
            part_type: PartType::Other,
            location: "Shelf B".to_string(),
            quantity: 3,
            condition: PartCondition::Good,
            notes: None,
        })
        .unwrap();

        assert_eq!(body["type"], "OTHER");
        assert_eq!(body["quantity"], 3);
        assert!(body.get("description").is_none());
        assert!(body.get("notes").is_none());
    }

    #[test]
    fn update_payload_carries_only_set_fields() {
        let body = serde_json::to_value(UpdatePart {
            quantity: Some(7),
            ..UpdatePart::default()
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "quantity": 7 }));
    }

    #[test]
    fn part_type_parses_case_insensitively() {
        assert_eq!("frame".parse::<PartType>().unwrap(), PartType::Frame);
        assert_eq!("TIRE".parse::<PartType>().unwrap(), PartType::Tire);
        assert!("WHEELIE".parse::<PartType>().is_err());
    }
}
