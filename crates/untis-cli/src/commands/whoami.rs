use serde::Serialize;
use untis_core::{PersonType, SessionState};
use untis_rpc::Session;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct WhoamiResponse {
    username: String,
    state: SessionState,
    person_type: PersonType,
    person_type_code: i64,
    person_id: i64,
}

impl WhoamiResponse {
    fn from_session(session: &Session) -> Self {
        Self {
            username: session.username().to_owned(),
            state: session.state(),
            person_type: session.person_type(),
            person_type_code: session.person_type().code(),
            person_id: session.person_id(),
        }
    }
}

/// Handle `untis whoami`.
pub fn handle(session: &Session, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&WhoamiResponse::from_session(session), flags.format)
}
