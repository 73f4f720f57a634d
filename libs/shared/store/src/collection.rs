use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The flat collections the document engine persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Doctors,
    Hospitals,
    Appointments,
    Brands,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Doctors,
        Collection::Hospitals,
        Collection::Appointments,
        Collection::Brands,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Doctors => "doctors",
            Collection::Hospitals => "hospitals",
            Collection::Appointments => "appointments",
            Collection::Brands => "brands",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Collection::Users),
            "doctors" => Ok(Collection::Doctors),
            "hospitals" => Ok(Collection::Hospitals),
            "appointments" => Ok(Collection::Appointments),
            "brands" => Ok(Collection::Brands),
            other => Err(format!("unknown collection: {}", other)),
        }
    }
}
