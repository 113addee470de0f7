use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One note on the community help board (row of the `help_requests` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpRequest {
    /// uuid or bigint primary key, kept as text
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub content: String,
    pub emoji: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub likes: u32,
}

impl HelpRequest {
    /// Long notes take a double-width card on the board
    pub fn is_long(&self) -> bool {
        self.content.chars().count() > 100
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Insert payload; id and created_at are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHelpRequest {
    pub content: String,
    pub emoji: String,
    pub author: String,
    pub views: u32,
    pub likes: u32,
}

/// Board listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpRequestOrder {
    /// Newest first
    #[default]
    Latest,
    /// Oldest first
    Oldest,
    /// Most liked first, newest breaking ties
    Popular,
}

impl fmt::Display for HelpRequestOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HelpRequestOrder::Latest => "latest",
            HelpRequestOrder::Oldest => "oldest",
            HelpRequestOrder::Popular => "popular",
        };
        f.write_str(name)
    }
}

impl FromStr for HelpRequestOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(HelpRequestOrder::Latest),
            "oldest" => Ok(HelpRequestOrder::Oldest),
            "popular" => Ok(HelpRequestOrder::Popular),
            other => Err(format!(
                "unknown order '{}' (expected latest, oldest or popular)",
                other
            )),
        }
    }
}
