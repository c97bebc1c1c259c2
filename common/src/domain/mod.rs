use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod roles;
pub mod submissions;
pub mod values;

pub use roles::{OnboardingFlag, Role, VenueRole};
pub use submissions::{SubmissionKind, SubmissionStatus, SubmissionType};
pub use values::{DecisionReason, DisplayText, Note, WebUrl};

/// Declares a uuid backed identifier.
/// Wrapper to prevent ID confusion between the different tables.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = anyhow::Error;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let uuid = Uuid::parse_str(value)?;
                Ok(Self(uuid))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id!(
    /// Account of a person using the directory
    UserId
);
entity_id!(ArtistId);
entity_id!(VenueId);
entity_id!(EventId);
entity_id!(ArtworkId);
entity_id!(SubmissionId);
entity_id!(
    /// Reference to an uploaded image in the asset store
    AssetId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_from_strings() {
        let id = ArtistId::try_from("6f1c1a5e-7f7a-4d2b-9a55-0b8cf3d1c2aa").unwrap();
        assert_eq!(id.to_string(), "6f1c1a5e-7f7a-4d2b-9a55-0b8cf3d1c2aa");
        assert!(VenueId::try_from("not-a-uuid").is_err());
    }

    #[test]
    fn ids_serialize_as_plain_uuid() {
        let id = EventId::try_from("00000000-0000-0000-0000-000000000001").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000001\"");
    }
}
