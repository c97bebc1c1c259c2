use vernissage_common::{Role, UserId};

/// The authenticated caller of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }
}

/// Account row, used to address notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
}
