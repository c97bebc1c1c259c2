use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::values::UnknownValue;

/// Directory-wide role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Editor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Editor => "EDITOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Editors and admins may decide submissions and publish directly
    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Editor | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "EDITOR" => Ok(Role::Editor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownValue::new("role", s)),
        }
    }
}

/// Role of a user inside one venue team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VenueRole {
    Owner,
    Editor,
    Viewer,
}

impl VenueRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueRole::Owner => "OWNER",
            VenueRole::Editor => "EDITOR",
            VenueRole::Viewer => "VIEWER",
        }
    }

    /// Owners and editors may edit and submit venue content
    pub fn can_edit(&self) -> bool {
        matches!(self, VenueRole::Owner | VenueRole::Editor)
    }
}

impl fmt::Display for VenueRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueRole {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(VenueRole::Owner),
            "EDITOR" => Ok(VenueRole::Editor),
            "VIEWER" => Ok(VenueRole::Viewer),
            _ => Err(UnknownValue::new("venue role", s)),
        }
    }
}

/// Onboarding progress markers, set once per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingFlag {
    HasSubmitted,
}

impl OnboardingFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingFlag::HasSubmitted => "HAS_SUBMITTED",
        }
    }
}

impl fmt::Display for OnboardingFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderators_are_editors_and_admins() {
        assert!(!Role::User.is_moderator());
        assert!(Role::Editor.is_moderator());
        assert!(Role::Admin.is_moderator());
    }

    #[test]
    fn venue_viewers_cannot_edit() {
        assert!(VenueRole::Owner.can_edit());
        assert!(VenueRole::Editor.can_edit());
        assert!(!VenueRole::Viewer.can_edit());
        assert_eq!("VIEWER".parse::<VenueRole>().unwrap(), VenueRole::Viewer);
        assert!("viewer".parse::<VenueRole>().is_err());
    }
}
