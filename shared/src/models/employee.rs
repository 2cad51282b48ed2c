//! Employee Model

use serde::{Deserialize, Serialize};

use super::role::{Role, RoleResponse};
use crate::error::RecordError;
use crate::types::RecordId;

/// Employee as returned by `GET /api/employees`, role embedded by value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<RoleResponse>,
}

/// Validated employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub role: Role,
}

impl Employee {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            role: Role::new(role),
        }
    }
}

impl TryFrom<EmployeeResponse> for Employee {
    type Error = RecordError;

    fn try_from(value: EmployeeResponse) -> Result<Self, Self::Error> {
        let role = value.role.ok_or(RecordError::missing("role"))?;
        let role_name = role.role.ok_or(RecordError::missing("role.role"))?;
        Ok(Self {
            id: value.id,
            name: value.name,
            role: Role {
                id: role.id,
                name: role_name,
            },
        })
    }
}
