//! Quiz session commands.

use crate::state::AppState;
use chrono::Utc;
use drill_core::{Feedback, Presentation, Session, SheetId};

use super::CommandError;

#[derive(Debug, serde::Serialize)]
pub struct SessionInfo {
    pub sheet_id: SheetId,
    pub allow_fuzzy: bool,
}

/// Start drilling a sheet, replacing any session in progress.
pub fn start_session(sheet_id: i64, state: &AppState) -> Result<SessionInfo, CommandError> {
    let mut session = state.session()?;
    let mut repo = state.repository()?;

    let started = Session::start(&mut *repo, SheetId(sheet_id), Utc::now(), state.allow_fuzzy)?;
    *session = Some(started);

    Ok(SessionInfo {
        sheet_id: SheetId(sheet_id),
        allow_fuzzy: state.allow_fuzzy,
    })
}

/// Present the next item of the running session.
pub fn next_item(state: &AppState) -> Result<Presentation, CommandError> {
    let mut session = state.session()?;
    let session = session.as_mut().ok_or_else(no_session)?;
    let repo = state.repository()?;

    let presentation = session.next_item(&*repo, &mut rand::rng())?;
    Ok(presentation.clone())
}

/// Submit an answer for the item on screen.
pub fn submit_answer(answer: String, state: &AppState) -> Result<Feedback, CommandError> {
    let mut session = state.session()?;
    let session = session.as_mut().ok_or_else(no_session)?;
    let mut repo = state.repository()?;

    session
        .submit_answer(&mut *repo, &answer, Utc::now())
        .map_err(Into::into)
}

pub fn end_session(state: &AppState) -> Result<(), CommandError> {
    state.session()?.take();
    Ok(())
}

fn no_session() -> CommandError {
    CommandError::new("no quiz session in progress")
}
