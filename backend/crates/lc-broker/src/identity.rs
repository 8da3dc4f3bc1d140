use lc_core::{LeagueId, UserId};

/// The `(userId, username, leagueId)` triple a connection carries once authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub league_id: LeagueId,
}

impl Identity {
    pub fn new(user_id: UserId, username: impl Into<String>, league_id: LeagueId) -> Self {
        Self {
            user_id,
            username: username.into(),
            league_id,
        }
    }
}
