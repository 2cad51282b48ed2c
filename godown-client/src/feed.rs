//! API collections consumed by the dashboard

use serde::Serialize;
use std::fmt;

/// One read-only collection endpoint of the inventory API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Feed {
    Employees,
    #[serde(rename = "employeeRoles")]
    Roles,
    Outwards,
    Inwards,
    Returns,
}

impl Feed {
    pub const ALL: [Feed; 5] = [
        Feed::Employees,
        Feed::Roles,
        Feed::Outwards,
        Feed::Inwards,
        Feed::Returns,
    ];

    /// Path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Feed::Employees => "api/employees",
            Feed::Roles => "api/employeeRoles",
            Feed::Outwards => "api/outwards",
            Feed::Inwards => "api/inwards",
            Feed::Returns => "api/returns",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feed::Employees => "employees",
            Feed::Roles => "employeeRoles",
            Feed::Outwards => "outwards",
            Feed::Inwards => "inwards",
            Feed::Returns => "returns",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_names_agree() {
        for feed in Feed::ALL {
            assert_eq!(feed.path(), format!("api/{}", feed.name()));
            assert_eq!(serde_json::to_value(feed).unwrap(), feed.name());
        }
    }
}
