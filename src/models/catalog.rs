use serde::{Deserialize, Serialize};

/// A service a serviceman can put a price on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// A puja a brahman can put a price on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puja {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub puja_type_name: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Dropdown row of the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOption {
    pub id: i64,
    pub label: String,
}

impl From<Service> for CatalogOption {
    fn from(service: Service) -> Self {
        let label = match service.category_name {
            Some(category) => format!("{} ({category})", service.name),
            None => service.name,
        };
        Self { id: service.id, label }
    }
}

impl From<Puja> for CatalogOption {
    fn from(puja: Puja) -> Self {
        let label = match (puja.puja_type_name, puja.duration) {
            (Some(kind), Some(duration)) => format!("{} ({kind}, {duration})", puja.name),
            (Some(kind), None) => format!("{} ({kind})", puja.name),
            (None, Some(duration)) => format!("{} ({duration})", puja.name),
            (None, None) => puja.name,
        };
        Self { id: puja.id, label }
    }
}
