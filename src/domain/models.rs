use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interface language offered on the splash screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Malayalam,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Malayalam];

    /// Native name, as shown in the language picker.
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Malayalam => "മലയാളം",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoilType {
    Clay,
    Sandy,
    #[default]
    Loamy,
    Silt,
    Peaty,
    Chalky,
}

impl SoilType {
    pub const ALL: [SoilType; 6] = [
        SoilType::Clay,
        SoilType::Sandy,
        SoilType::Loamy,
        SoilType::Silt,
        SoilType::Peaty,
        SoilType::Chalky,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
            SoilType::Loamy => "Loamy",
            SoilType::Silt => "Silt",
            SoilType::Peaty => "Peaty",
            SoilType::Chalky => "Chalky",
        };
        f.write_str(name)
    }
}

/// Crops offered for the "previous crop" field, already sorted.
pub const KERALA_CROPS: [&str; 20] = [
    "Arecanut",
    "Banana",
    "Black Pepper",
    "Cardamom",
    "Cashew",
    "Cassava (Tapioca)",
    "Clove",
    "Cocoa",
    "Coconut",
    "Coffee",
    "Jackfruit",
    "Mango",
    "Nutmeg",
    "Papaya",
    "Pineapple",
    "Plantain",
    "Rice (Paddy)",
    "Rubber",
    "Sugarcane",
    "Tea",
];

/// Agricultural season derived from the calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Monsoon,
    Summer,
}

impl Season {
    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "Winter (Rabi Season)",
            Season::Monsoon => "Monsoon (Kharif Season)",
            Season::Summer => "Summer (Zaid Season)",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Farm profile captured by the registration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub land_size: f64,
    pub soil_type: SoilType,
    pub previous_crop: Option<String>,
}

/// Persisted farmer record, keyed by mobile number in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub mobile: String,
    pub password_hash: String,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    #[serde(default)]
    pub profile_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<SoilType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Builds the record written at signup: no profile yet.
    pub fn new(
        mobile: impl Into<String>,
        password_hash: impl Into<String>,
        external_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            mobile: mobile.into(),
            password_hash: password_hash.into(),
            external_id: external_id.into(),
            created_at: now,
            last_login: now,
            profile_completed: false,
            name: None,
            land_size: None,
            soil_type: None,
            previous_crop: None,
            season: None,
            updated_at: None,
        }
    }

    /// Applies a partial update in place. Fields absent from the update are kept.
    pub fn apply(&mut self, update: &RecordUpdate) {
        if let Some(last_login) = update.last_login {
            self.last_login = last_login;
        }
        if let Some(profile) = &update.profile {
            self.name = Some(profile.name.clone());
            self.land_size = Some(profile.land_size);
            self.soil_type = Some(profile.soil_type);
            self.previous_crop = profile.previous_crop.clone();
            self.profile_completed = true;
        }
        if let Some(season) = update.season {
            self.season = Some(season);
        }
        if let Some(updated_at) = update.updated_at {
            self.updated_at = Some(updated_at);
        }
    }
}

/// Partial field set for `FarmerStore::update_record`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    pub last_login: Option<DateTime<Utc>>,
    pub profile: Option<Profile>,
    pub season: Option<Season>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecordUpdate {
    pub fn last_login(now: DateTime<Utc>) -> Self {
        Self {
            last_login: Some(now),
            ..Self::default()
        }
    }

    /// Profile completion: sets the profile fields and marks the record complete.
    pub fn profile(profile: Profile, season: Season, now: DateTime<Utc>) -> Self {
        Self {
            profile: Some(profile),
            season: Some(season),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Flat `field -> value` map of what this update writes, in record field names.
    ///
    /// A profile with no previous crop writes an explicit `null` so a
    /// document store clears any earlier value.
    pub fn fields(&self) -> serde_json::Map<String, serde_json::Value> {
        use serde_json::{Value, json};

        let mut fields = serde_json::Map::new();
        if let Some(last_login) = self.last_login {
            fields.insert("last_login".to_string(), json!(last_login));
        }
        if let Some(profile) = &self.profile {
            fields.insert("name".to_string(), json!(profile.name));
            fields.insert("land_size".to_string(), json!(profile.land_size));
            fields.insert("soil_type".to_string(), json!(profile.soil_type));
            fields.insert(
                "previous_crop".to_string(),
                profile.previous_crop.clone().map_or(Value::Null, Value::String),
            );
            fields.insert("profile_completed".to_string(), Value::Bool(true));
        }
        if let Some(season) = self.season {
            fields.insert("season".to_string(), json!(season));
        }
        if let Some(updated_at) = self.updated_at {
            fields.insert("updated_at".to_string(), json!(updated_at));
        }
        fields
    }
}

/// Session-local copy of the profile. Not authoritative; the store is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserData {
    pub name: Option<String>,
    pub land_size: Option<f64>,
    pub soil_type: Option<SoilType>,
    pub previous_crop: Option<String>,
    pub profile_completed: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserData {
    pub fn merge_profile(&mut self, profile: &Profile) {
        self.name = Some(profile.name.clone());
        self.land_size = Some(profile.land_size);
        self.soil_type = Some(profile.soil_type);
        self.previous_crop = profile.previous_crop.clone();
        self.profile_completed = true;
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Farmer")
    }
}

impl From<&UserRecord> for UserData {
    fn from(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            land_size: record.land_size,
            soil_type: record.soil_type,
            previous_crop: record.previous_crop.clone(),
            profile_completed: record.profile_completed,
            created_at: Some(record.created_at),
            last_login: Some(record.last_login),
        }
    }
}
