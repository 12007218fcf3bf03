use crate::error::PriceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who is signed in; decides which price list the screen manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Serviceman,
    Brahman,
}

impl Role {
    pub fn kind(self) -> ItemKind {
        match self {
            Role::Serviceman => ItemKind::Service,
            Role::Brahman => ItemKind::Puja,
        }
    }
}

impl FromStr for Role {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serviceman" => Ok(Role::Serviceman),
            "brahman" => Ok(Role::Brahman),
            other => Err(PriceError::Config(format!("unknown role {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Service,
    Puja,
}

impl ItemKind {
    pub fn noun(self) -> &'static str {
        match self {
            ItemKind::Service => "service",
            ItemKind::Puja => "puja",
        }
    }

    /// Only puja prices may carry a material PDF.
    pub fn supports_material(self) -> bool {
        matches!(self, ItemKind::Puja)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePriceEntry {
    pub id: i64,
    pub serviceman_id: i64,
    pub service_id: i64,
    pub service_name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub price: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PujaPriceEntry {
    pub id: i64,
    pub puja_id: i64,
    pub puja_name: String,
    #[serde(default)]
    pub puja_type_id: Option<i64>,
    #[serde(default)]
    pub puja_type_name: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    pub price: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub material_file: Option<String>,
    #[serde(default)]
    pub material_file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One priced item of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceEntry {
    Service(ServicePriceEntry),
    Puja(PujaPriceEntry),
}

impl PriceEntry {
    pub fn kind(&self) -> ItemKind {
        match self {
            PriceEntry::Service(_) => ItemKind::Service,
            PriceEntry::Puja(_) => ItemKind::Puja,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            PriceEntry::Service(e) => e.id,
            PriceEntry::Puja(e) => e.id,
        }
    }

    /// Id of the priced service or puja (what the form selects).
    pub fn item_id(&self) -> i64 {
        match self {
            PriceEntry::Service(e) => e.service_id,
            PriceEntry::Puja(e) => e.puja_id,
        }
    }

    pub fn price(&self) -> &str {
        match self {
            PriceEntry::Service(e) => &e.price,
            PriceEntry::Puja(e) => &e.price,
        }
    }
}

impl From<ServicePriceEntry> for PriceEntry {
    fn from(entry: ServicePriceEntry) -> Self {
        PriceEntry::Service(entry)
    }
}

impl From<PujaPriceEntry> for PriceEntry {
    fn from(entry: PujaPriceEntry) -> Self {
        PriceEntry::Puja(entry)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_selects_kind() {
        assert_eq!("serviceman".parse::<Role>().unwrap().kind(), ItemKind::Service);
        assert_eq!(" BRAHMAN ".parse::<Role>().unwrap().kind(), ItemKind::Puja);
        assert!("priest".parse::<Role>().is_err());
    }

    #[test]
    fn deserializes_puja_entry_with_material() {
        let json = r#"{
            "id": 3,
            "puja_id": 12,
            "puja_name": "Satyanarayan",
            "puja_type_id": 4,
            "puja_type_name": "Katha",
            "duration": "3 hours",
            "price": "1500.00",
            "material_file": "materials/list.pdf",
            "material_file_url": "https://cdn.example.org/materials/list.pdf",
            "created_at": "2024-05-01T08:00:00Z",
            "updated_at": "2024-05-02T08:00:00Z"
        }"#;
        let entry: PujaPriceEntry = serde_json::from_str(json).unwrap();
        let entry = PriceEntry::from(entry);
        assert_eq!(entry.kind(), ItemKind::Puja);
        assert_eq!(entry.id(), 3);
        assert_eq!(entry.item_id(), 12);
        assert_eq!(entry.price(), "1500.00");
    }
}
