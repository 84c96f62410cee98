use serde::{Deserialize, Serialize};

/// Caller privilege, ordered `None < Read < Write < Admin`.
///
/// Variant order is the comparison order; access checks rely on the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    None,
    #[default]
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 4] = [
        AccessLevel::None,
        AccessLevel::Read,
        AccessLevel::Write,
        AccessLevel::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(AccessLevel::None),
            "read" => Some(AccessLevel::Read),
            "write" => Some(AccessLevel::Write),
            "admin" => Some(AccessLevel::Admin),
            _ => None,
        }
    }

    pub fn satisfies(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub name: String,
    pub description: String,
    pub conditions: Vec<String>,
    pub granted_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessControl {
    pub current_access: AccessLevel,
    pub required_permissions: Vec<String>,
    pub request_access_url: Option<String>,
    pub access_policies: Vec<AccessPolicy>,
    #[serde(default)]
    pub audit_log: bool,
}

impl AccessControl {
    pub fn new(current_access: AccessLevel) -> Self {
        Self {
            current_access,
            required_permissions: Vec::new(),
            request_access_url: None,
            access_policies: Vec::new(),
            audit_log: false,
        }
    }

    pub fn with_audit_log(mut self, enabled: bool) -> Self {
        self.audit_log = enabled;
        self
    }
}

impl Default for AccessControl {
    fn default() -> Self {
        Self::new(AccessLevel::Read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_total_order() {
        for (i, current) in AccessLevel::ALL.iter().enumerate() {
            for (j, required) in AccessLevel::ALL.iter().enumerate() {
                assert_eq!(
                    current.satisfies(*required),
                    i >= j,
                    "{} vs {}",
                    current,
                    required
                );
            }
        }
    }

    #[test]
    fn test_access_level_parse() {
        assert_eq!(AccessLevel::parse("ADMIN"), Some(AccessLevel::Admin));
        assert_eq!(AccessLevel::parse("owner"), None);
    }

    #[test]
    fn test_default_access_control_is_read_without_audit() {
        let access = AccessControl::default();

        assert_eq!(access.current_access, AccessLevel::Read);
        assert!(!access.audit_log);
        assert!(access.access_policies.is_empty());
    }
}
