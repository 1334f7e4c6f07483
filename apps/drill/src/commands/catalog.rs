//! Catalog commands: languages, sheets and items.

use crate::db::{
    DirectionRepository, ItemRepository, ItemSummary, LanguageRepository, Sheet, SheetRepository,
};
use crate::state::AppState;
use drill_core::{ItemId, NewItem, SheetId, Store};

use super::CommandError;

/// Identifies a language direction by its two language names.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DirectionRequest {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SheetRequest {
    #[serde(flatten)]
    pub direction: DirectionRequest,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ItemRequest {
    #[serde(flatten)]
    pub direction: DirectionRequest,
    pub question: String,
    /// First answer is the displayed one.
    pub answers: Vec<String>,
    #[serde(default)]
    pub sheets: Vec<String>,
}

impl ItemRequest {
    fn new_item(&self) -> NewItem {
        NewItem {
            question: self.question.clone(),
            answers: self.answers.clone(),
            sheets: self.sheets.clone(),
        }
    }
}

/// New content for an existing item. The item stays in its direction.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ItemChanges {
    pub question: String,
    pub answers: Vec<String>,
    #[serde(default)]
    pub sheets: Vec<String>,
}

impl From<ItemChanges> for NewItem {
    fn from(changes: ItemChanges) -> Self {
        NewItem {
            question: changes.question,
            answers: changes.answers,
            sheets: changes.sheets,
        }
    }
}

/// An item as shown in the editor.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub question: String,
    pub displayed: String,
    pub answers: Vec<String>,
    pub sheets: Vec<String>,
    pub stars: u32,
}

pub fn add_language(name: String, state: &AppState) -> Result<(), CommandError> {
    let repo = state.repository()?;
    repo.add_language(&name)?;
    Ok(())
}

pub fn rename_language(old_name: String, new_name: String, state: &AppState) -> Result<(), CommandError> {
    let repo = state.repository()?;
    repo.rename_language(&old_name, &new_name).map_err(Into::into)
}

pub fn delete_language(name: String, state: &AppState) -> Result<(), CommandError> {
    let repo = state.repository()?;
    repo.delete_language(&name).map_err(Into::into)
}

pub fn list_languages(state: &AppState) -> Result<Vec<String>, CommandError> {
    let repo = state.repository()?;
    repo.list_languages().map_err(Into::into)
}

pub fn list_sheets(direction: DirectionRequest, state: &AppState) -> Result<Vec<Sheet>, CommandError> {
    let repo = state.repository()?;
    let direction = repo.direction(&direction.from, &direction.to)?;
    repo.list_sheets(direction.id).map_err(Into::into)
}

pub fn create_sheet(request: SheetRequest, state: &AppState) -> Result<SheetId, CommandError> {
    let repo = state.repository()?;
    let direction = repo.direction(&request.direction.from, &request.direction.to)?;
    repo.create_sheet(direction.id, &request.name, &request.questions)
        .map_err(Into::into)
}

/// Rename a sheet and replace its items.
pub fn update_sheet(
    sheet_id: i64,
    name: String,
    questions: Vec<String>,
    state: &AppState,
) -> Result<(), CommandError> {
    let repo = state.repository()?;
    repo.update_sheet(SheetId(sheet_id), &name, &questions)
        .map_err(Into::into)
}

pub fn delete_sheet(sheet_id: i64, state: &AppState) -> Result<(), CommandError> {
    let repo = state.repository()?;
    repo.delete_sheet(SheetId(sheet_id)).map_err(Into::into)
}

pub fn sheet_items(sheet_id: i64, state: &AppState) -> Result<Vec<ItemSummary>, CommandError> {
    let repo = state.repository()?;
    repo.sheet_items(SheetId(sheet_id)).map_err(Into::into)
}

pub fn add_item(request: ItemRequest, state: &AppState) -> Result<ItemId, CommandError> {
    let repo = state.repository()?;
    let direction = repo.direction(&request.direction.from, &request.direction.to)?;
    repo.add_item(direction.id, &request.new_item())
        .map_err(Into::into)
}

/// Replace an item's question, answers and sheets; its progress is kept.
pub fn edit_item(item_id: i64, changes: ItemChanges, state: &AppState) -> Result<(), CommandError> {
    let repo = state.repository()?;
    repo.edit_item(ItemId(item_id), &changes.into())
        .map_err(Into::into)
}

pub fn delete_item(item_id: i64, state: &AppState) -> Result<(), CommandError> {
    let repo = state.repository()?;
    repo.delete_item(ItemId(item_id)).map_err(Into::into)
}

pub fn search_items(
    direction: DirectionRequest,
    text: String,
    state: &AppState,
) -> Result<Vec<ItemSummary>, CommandError> {
    let repo = state.repository()?;
    let direction = repo.direction(&direction.from, &direction.to)?;
    repo.search_items(direction.id, &text).map_err(Into::into)
}

pub fn get_item(item_id: i64, state: &AppState) -> Result<ItemView, CommandError> {
    let repo = state.repository()?;
    let id = ItemId(item_id);
    let item = repo.get_item(id)?;
    let progress = repo.get_state(id)?;

    Ok(ItemView {
        id,
        displayed: item.displayed_answer().to_string(),
        question: item.question,
        answers: item.answers,
        sheets: repo.sheets_for_item(id)?,
        stars: progress.stars(),
    })
}
