//! Document upload dialog.
//!
//! Two variants share one sequence: open the slot's dialog, clear any
//! existing attachment, attach the file, date it, optionally type it, add a
//! note and submit. Nothing is rolled back when a step fails.

use super::calendar::{self, CalendarParams};
use super::dropdown::{self, DropdownParams};
use super::WidgetSelectors;
use crate::driver::UiDriver;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::{FleetError, FleetResult};
use crate::temporal::StructuredDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Note entered when the caller does not supply one
pub const DEFAULT_NOTE: &str = "Uploaded by fleetprobe";

/// Markup contract of the upload dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSelectors {
    /// The dialog itself
    pub dialog: String,
    /// Control that removes an existing attachment
    pub remove_button: String,
    /// File input behind the drop zone
    pub drop_zone: String,
    /// Date picker control inside the dialog
    pub date_field: String,
    /// Document type select inside the dialog
    pub type_field: String,
    /// Notes text area
    pub notes_field: String,
    /// Submit button
    pub submit_button: String,
}

impl Default for UploadSelectors {
    fn default() -> Self {
        Self {
            dialog: ".ant-modal-content".to_string(),
            remove_button: ".ant-upload-list-item .anticon-delete".to_string(),
            drop_zone: ".ant-upload-drag input[type='file']".to_string(),
            date_field: ".ant-modal-content .ant-picker".to_string(),
            type_field: ".ant-modal-content .ant-select".to_string(),
            notes_field: ".ant-modal-content textarea".to_string(),
            submit_button: ".ant-modal-footer .ant-btn-primary".to_string(),
        }
    }
}

/// Parameters for [`upload_document`] and [`upload_typed_document`]
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Document slot that opens the dialog
    pub slot: Locator,
    /// Local file to attach
    pub file: PathBuf,
    /// Date entered in the dialog's date picker
    pub document_date: StructuredDate,
    /// Document type, required by the typed variant
    pub document_type: Option<String>,
    /// Note text
    pub note: String,
}

impl UploadParams {
    /// Create parameters with no type and the default note
    #[must_use]
    pub fn new(slot: impl Into<Locator>, file: impl Into<PathBuf>, document_date: StructuredDate) -> Self {
        Self {
            slot: slot.into(),
            file: file.into(),
            document_date,
            document_type: None,
            note: DEFAULT_NOTE.to_string(),
        }
    }

    /// Set the document type
    #[must_use]
    pub fn with_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// Set the note text
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Upload a document into a slot that has no type selector
pub async fn upload_document<D: UiDriver>(
    page: &Page<D>,
    params: &UploadParams,
    selectors: &WidgetSelectors,
) -> FleetResult<()> {
    run(page, params, selectors, None).await
}

/// Upload a document and pick its type from the dialog's dropdown
pub async fn upload_typed_document<D: UiDriver>(
    page: &Page<D>,
    params: &UploadParams,
    selectors: &WidgetSelectors,
) -> FleetResult<()> {
    let document_type = params
        .document_type
        .as_deref()
        .ok_or_else(|| FleetError::config("typed upload requires a document type"))?;
    run(page, params, selectors, Some(document_type)).await
}

async fn run<D: UiDriver>(
    page: &Page<D>,
    params: &UploadParams,
    selectors: &WidgetSelectors,
    document_type: Option<&str>,
) -> FleetResult<()> {
    let metadata = tokio::fs::metadata(&params.file).await?;
    if !metadata.is_file() {
        return Err(FleetError::config(format!(
            "{} is not a file",
            params.file.display()
        )));
    }

    let upload = &selectors.upload;
    let dialog = Locator::new(upload.dialog.as_str());
    tracing::debug!(slot = %params.slot, file = %params.file.display(), "upload: open dialog");
    page.click(&params.slot).await?;
    page.wait_for(&dialog).await?;

    let remove = Locator::new(upload.remove_button.as_str());
    if let Some(existing) = page.find_within(&remove, page.policy().settle()).await? {
        tracing::debug!(slot = %params.slot, "upload: removing existing attachment");
        page.click_element(&existing).await?;
        page.wait_for_absent(&remove).await?;
        page.click(&params.slot).await?;
        page.wait_for(&dialog).await?;
    }

    page.attach_file(&Locator::new(upload.drop_zone.as_str()), &params.file)
        .await?;

    let date = CalendarParams::new(upload.date_field.as_str(), params.document_date);
    calendar::select_date(page, &date, &selectors.calendar).await?;

    if let Some(document_type) = document_type {
        let kind = DropdownParams::new(upload.type_field.as_str(), document_type);
        dropdown::select_option(page, &kind, &selectors.dropdown).await?;
    }

    page.fill(&Locator::new(upload.notes_field.as_str()), &params.note)
        .await?;
    page.click(&Locator::new(upload.submit_button.as_str())).await?;
    page.wait_for_absent(&dialog).await?;

    tracing::info!(
        slot = %params.slot,
        date = %params.document_date,
        document_type = document_type.unwrap_or("-"),
        "upload: document submitted"
    );
    Ok(())
}
