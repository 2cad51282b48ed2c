//! Role Model

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::types::RecordId;

/// Employee role as returned by `GET /api/employeeRoles`
///
/// The role name travels under the JSON key `role`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Validated role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Option<RecordId>,
    pub name: String,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl TryFrom<RoleResponse> for Role {
    type Error = RecordError;

    fn try_from(value: RoleResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            name: value.role.ok_or(RecordError::missing("role"))?,
        })
    }
}
