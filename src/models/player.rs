use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub gender: String,
    #[serde(default)]
    pub year: Option<String>, // e.g. "Freshman", "Senior"
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlayer {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
    pub year: Option<String>,
}

// Also the `$set` document for roster updates
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdatePlayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl UpdatePlayer {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.gender.is_none() && self.year.is_none()
    }

    pub fn apply_to(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(gender) = &self.gender {
            player.gender = gender.clone();
        }
        if let Some(year) = &self.year {
            player.year = Some(year.clone());
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub year: Option<String>,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        PlayerResponse {
            id: player.id,
            name: player.name.clone(),
            gender: player.gender.clone(),
            year: player.year.clone(),
        }
    }
}
