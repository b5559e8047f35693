use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Musical genre of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Rock,
    Jazz,
    Blues,
    Classical,
    Electronic,
    Pop,
    HipHop,
    Country,
    Folk,
    Soul,
    Punk,
    Metal,
    Other,
}

impl Genre {
    pub const ALL: [Genre; 13] = [
        Genre::Rock,
        Genre::Jazz,
        Genre::Blues,
        Genre::Classical,
        Genre::Electronic,
        Genre::Pop,
        Genre::HipHop,
        Genre::Country,
        Genre::Folk,
        Genre::Soul,
        Genre::Punk,
        Genre::Metal,
        Genre::Other,
    ];

    /// Wire name, as used in JSON bodies and the `/records/genre/{genre}` path.
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Rock => "ROCK",
            Genre::Jazz => "JAZZ",
            Genre::Blues => "BLUES",
            Genre::Classical => "CLASSICAL",
            Genre::Electronic => "ELECTRONIC",
            Genre::Pop => "POP",
            Genre::HipHop => "HIP_HOP",
            Genre::Country => "COUNTRY",
            Genre::Folk => "FOLK",
            Genre::Soul => "SOUL",
            Genre::Punk => "PUNK",
            Genre::Metal => "METAL",
            Genre::Other => "OTHER",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Rock => "Rock",
            Genre::Jazz => "Jazz",
            Genre::Blues => "Blues",
            Genre::Classical => "Classical",
            Genre::Electronic => "Electronic",
            Genre::Pop => "Pop",
            Genre::HipHop => "Hip Hop",
            Genre::Country => "Country",
            Genre::Folk => "Folk",
            Genre::Soul => "Soul",
            Genre::Punk => "Punk",
            Genre::Metal => "Metal",
            Genre::Other => "Other",
        }
    }
}

impl std::str::FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_uppercase().replace(['-', ' '], "_");
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| format!("unknown genre: {s}"))
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media condition using the usual grading ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordCondition {
    Mint,
    NearMint,
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl RecordCondition {
    pub const ALL: [RecordCondition; 7] = [
        RecordCondition::Mint,
        RecordCondition::NearMint,
        RecordCondition::Excellent,
        RecordCondition::VeryGood,
        RecordCondition::Good,
        RecordCondition::Fair,
        RecordCondition::Poor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordCondition::Mint => "MINT",
            RecordCondition::NearMint => "NEAR_MINT",
            RecordCondition::Excellent => "EXCELLENT",
            RecordCondition::VeryGood => "VERY_GOOD",
            RecordCondition::Good => "GOOD",
            RecordCondition::Fair => "FAIR",
            RecordCondition::Poor => "POOR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordCondition::Mint => "Mint",
            RecordCondition::NearMint => "Near Mint",
            RecordCondition::Excellent => "Excellent",
            RecordCondition::VeryGood => "Very Good",
            RecordCondition::Good => "Good",
            RecordCondition::Fair => "Fair",
            RecordCondition::Poor => "Poor",
        }
    }
}

impl std::str::FromStr for RecordCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_uppercase().replace(['-', ' '], "_");
        RecordCondition::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("unknown condition: {s}"))
    }
}

impl std::fmt::Display for RecordCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vinyl record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VinylRecord {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub release_year: i32,
    pub genre: Genre,
    pub purchase_source: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub condition: RecordCondition,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecord {
    pub title: String,
    pub artist: String,
    pub release_year: i32,
    pub genre: Genre,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    pub condition: RecordCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial payload for `PUT /records/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<RecordCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_from_backend_wire_form() {
        let record: VinylRecord = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "Kind of Blue",
                "artist": "Miles Davis",
                "releaseYear": 1959,
                "genre": "JAZZ",
                "purchaseSource": "Record fair",
                "purchaseDate": "2023-06-10",
                "condition": "NEAR_MINT",
                "notes": null,
                "createdAt": "2024-03-01T10:00:00Z",
                "updatedAt": "2024-03-01T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(record.genre, Genre::Jazz);
        assert_eq!(record.condition, RecordCondition::NearMint);
        assert_eq!(record.release_year, 1959);
        assert_eq!(
            record.purchase_date,
            NaiveDate::from_ymd_opt(2023, 6, 10)
        );
    }

    #[test]
    fn multi_word_wire_names_round_trip() {
        assert_eq!(serde_json::to_string(&Genre::HipHop).unwrap(), "\"HIP_HOP\"");
        assert_eq!(
            serde_json::to_string(&RecordCondition::VeryGood).unwrap(),
            "\"VERY_GOOD\""
        );
        assert_eq!("hip hop".parse::<Genre>().unwrap(), Genre::HipHop);
        assert_eq!(
            "near-mint".parse::<RecordCondition>().unwrap(),
            RecordCondition::NearMint
        );
    }

    #[test]
    fn create_payload_omits_absent_optionals() {
        let body = serde_json::to_value(CreateRecord {
            title: "Nevermind".to_string(),
            artist: "Nirvana".to_string(),
            release_year: 1991,
            genre: Genre::Rock,
            purchase_source: None,
            purchase_date: None,
            condition: RecordCondition::Good,
            notes: None,
        })
        .unwrap();

        assert_eq!(body["releaseYear"], 1991);
        assert!(body.get("purchaseSource").is_none());
        assert!(body.get("purchaseDate").is_none());
    }
}
