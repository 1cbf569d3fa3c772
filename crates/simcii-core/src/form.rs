// ── Device form workflow ──
//
// Owns the edit session, the form fields and the pending delete intent.
// Mutations go straight to the inventory service; on success the
// dashboard is asked to refresh rather than patched locally.

use std::sync::Arc;

use tracing::{debug, info, warn};

use simcii_api::{Device, DeviceDraft, DeviceId, InventoryClient};

use crate::error::CoreError;
use crate::scheduler::RefreshTrigger;
use crate::session::{EditSession, EditSessionState};
use crate::signal::Notification;
use crate::store::DataStore;

// ── Form presentation ────────────────────────────────────────────────

/// Whether a submit will create a new device or update an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

impl FormMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Create => "Add device",
            Self::Edit => "Edit device",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Edit => "Update",
        }
    }
}

/// User-editable form fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub nombre: String,
    pub tipo: String,
    pub zona: String,
    pub descripcion: String,
}

impl FormInput {
    pub fn new(nombre: impl Into<String>, tipo: impl Into<String>, zona: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            tipo: tipo.into(),
            zona: zona.into(),
            descripcion: String::new(),
        }
    }

    pub fn with_descripcion(mut self, descripcion: impl Into<String>) -> Self {
        self.descripcion = descripcion.into();
        self
    }

    fn from_device(device: &Device) -> Self {
        Self {
            nombre: device.nombre.clone(),
            tipo: device.tipo.clone(),
            zona: device.zona.clone(),
            descripcion: device.descripcion.clone().unwrap_or_default(),
        }
    }

    fn to_draft(&self) -> DeviceDraft {
        DeviceDraft::new(&self.nombre, &self.tipo, &self.zona).with_descripcion(&self.descripcion)
    }
}

/// What the form currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub mode: FormMode,
    pub input: FormInput,
}

impl FormState {
    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn submit_label(&self) -> &'static str {
        self.mode.submit_label()
    }
}

/// Live character count for the description field.
///
/// The limit is advisory: input past it is kept and submitted as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionCounter {
    /// Unicode scalar values typed so far.
    pub used: usize,
    pub limit: usize,
}

impl DescriptionCounter {
    pub fn new(text: &str, limit: usize) -> Self {
        Self {
            used: text.chars().count(),
            limit,
        }
    }

    /// Characters left before the limit; negative once exceeded.
    pub fn remaining(self) -> isize {
        to_isize(self.limit).saturating_sub(to_isize(self.used))
    }

    pub fn is_over_limit(self) -> bool {
        self.used > self.limit
    }

    /// `"(used/limit)"`, e.g. `"(3/15)"`.
    pub fn label(self) -> String {
        format!("({}/{})", self.used, self.limit)
    }
}

fn to_isize(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

/// Confirmation prompt for a pending delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub id: DeviceId,
    pub message: String,
}

// ── Controller ───────────────────────────────────────────────────────

/// Create/edit/delete workflow for a single form.
///
/// All state is owned and mutated through `&mut self`; concurrent use
/// needs external serialization.
pub struct FormController {
    inventory: InventoryClient,
    store: Arc<DataStore>,
    refresher: Arc<dyn RefreshTrigger>,
    session: EditSession,
    form: FormState,
    pending_delete: Option<DeviceId>,
    description_limit: usize,
}

impl FormController {
    pub fn new(
        inventory: InventoryClient,
        store: Arc<DataStore>,
        refresher: Arc<dyn RefreshTrigger>,
        description_limit: usize,
    ) -> Self {
        Self {
            inventory,
            store,
            refresher,
            session: EditSession::new(),
            form: FormState::default(),
            pending_delete: None,
            description_limit,
        }
    }

    pub fn session(&self) -> &EditSessionState {
        self.session.current()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn pending_delete(&self) -> Option<DeviceId> {
        self.pending_delete
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Open an empty form for a new device.
    pub fn open_for_create(&mut self) {
        self.session.begin_create();
        self.form = FormState {
            mode: FormMode::Create,
            input: FormInput::default(),
        };
    }

    /// Open the form pre-filled from a snapshot of `device`.
    pub fn open_for_edit(&mut self, device: &Device) {
        self.session.begin_edit(device);
        self.form = FormState {
            mode: FormMode::Edit,
            input: FormInput::from_device(device),
        };
        debug!(id = %device.id, "editing device");
    }

    /// Discard the session and clear the form.
    pub fn close(&mut self) {
        self.session.cancel();
        self.form = FormState::default();
    }

    // ── Description counter ──────────────────────────────────────────

    pub fn set_description(&mut self, text: impl Into<String>) -> DescriptionCounter {
        self.form.input.descripcion = text.into();
        self.description_counter()
    }

    pub fn description_counter(&self) -> DescriptionCounter {
        DescriptionCounter::new(&self.form.input.descripcion, self.description_limit)
    }

    // ── Submit ───────────────────────────────────────────────────────

    /// Save the form: update when editing, create otherwise.
    ///
    /// On success the session closes and a refresh is requested. On
    /// failure the session stays open with `input` retained.
    pub async fn submit(&mut self, input: FormInput) -> Result<Device, CoreError> {
        let draft = input.to_draft();
        self.form.input = input;

        let (result, verb) = match self.session.editing_id() {
            Some(id) => (self.inventory.update(id, &draft).await, "updated"),
            None => (self.inventory.create(&draft).await, "created"),
        };

        match result {
            Ok(device) => {
                info!(id = %device.id, nombre = %device.nombre, "device {verb}");
                self.close();
                self.refresher.refresh_now();
                self.store
                    .notify(Notification::success(format!("Device {verb} successfully")));
                Ok(device)
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "device save failed");
                self.store
                    .notify(Notification::error(format!("Failed to save device: {err}")));
                Err(err)
            }
        }
    }

    // ── Two-step delete ──────────────────────────────────────────────

    /// Record the intent to delete `id`. No request is made until
    /// [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&mut self, id: DeviceId) -> DeletePrompt {
        self.pending_delete = Some(id);
        let message = match self.store.device_by_id(id) {
            Some(device) => format!("Delete device \"{}\"?", device.nombre),
            None => format!("Delete device {id}?"),
        };
        DeletePrompt { id, message }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the device recorded by `request_delete`, if any.
    ///
    /// Returns the deleted id, or `None` when there was nothing pending.
    /// The intent is cleared either way.
    pub async fn confirm_delete(&mut self) -> Result<Option<DeviceId>, CoreError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };

        match self.inventory.delete(id).await {
            Ok(()) => {
                info!(%id, "device deleted");
                self.refresher.refresh_now();
                self.store
                    .notify(Notification::success("Device deleted successfully"));
                Ok(Some(id))
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(%id, error = %err, "device delete failed");
                self.store
                    .notify(Notification::error(format!("Failed to delete device: {err}")));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct NoRefresh;

    impl RefreshTrigger for NoRefresh {
        fn refresh_now(&self) {}
    }

    fn controller(store: Arc<DataStore>) -> FormController {
        let inventory =
            InventoryClient::from_reqwest("http://localhost:8080/api", reqwest::Client::new())
                .unwrap();
        FormController::new(inventory, store, Arc::new(NoRefresh), 15)
    }

    fn device(id: i64, nombre: &str) -> Device {
        Device {
            id: DeviceId(id),
            nombre: nombre.into(),
            tipo: "temperatura".into(),
            zona: "A".into(),
            activo: true,
            descripcion: None,
        }
    }

    #[test]
    fn delete_prompt_uses_cached_name() {
        let store = Arc::new(DataStore::new());
        store.apply_devices(vec![device(3, "Sensor Norte")]);
        let mut form = controller(store);

        let prompt = form.request_delete(DeviceId(3));

        assert_eq!(prompt.message, "Delete device \"Sensor Norte\"?");
        assert_eq!(form.pending_delete(), Some(DeviceId(3)));
    }

    #[test]
    fn edit_form_is_a_snapshot_and_close_clears_it() {
        let store = Arc::new(DataStore::new());
        let mut form = controller(Arc::clone(&store));
        let original = device(4, "Sensor4");

        form.open_for_edit(&original);
        store.apply_devices(vec![device(4, "renamed by a refresh")]);

        assert_eq!(form.form().input.nombre, "Sensor4");
        assert_eq!(form.form().mode, FormMode::Edit);

        form.close();
        assert_eq!(form.session(), &EditSessionState::Idle);
        assert_eq!(form.form(), &FormState::default());
    }

    #[test]
    fn long_descriptions_are_kept() {
        let mut form = controller(Arc::new(DataStore::new()));
        form.open_for_create();

        let counter = form.set_description("this is far longer than fifteen");

        assert_eq!(counter.remaining(), -16);
        assert_eq!(form.form().input.descripcion, "this is far longer than fifteen");
    }

    #[test]
    fn counter_tracks_remaining_characters() {
        let counter = DescriptionCounter::new("abc", 15);
        assert_eq!(counter.used, 3);
        assert_eq!(counter.remaining(), 12);
        assert_eq!(counter.label(), "(3/15)");
        assert!(!counter.is_over_limit());
    }

    #[test]
    fn counter_goes_negative_past_the_limit() {
        let counter = DescriptionCounter::new("sixteen chars!!!", 15);
        assert_eq!(counter.used, 16);
        assert_eq!(counter.remaining(), -1);
        assert!(counter.is_over_limit());
    }

    #[test]
    fn counter_counts_scalar_values_not_bytes() {
        let counter = DescriptionCounter::new("ñandú", 15);
        assert_eq!(counter.used, 5);
        assert_eq!(counter.label(), "(5/15)");
    }

    #[test]
    fn mode_labels() {
        assert_eq!(FormMode::Create.title(), "Add device");
        assert_eq!(FormMode::Create.submit_label(), "Create");
        assert_eq!(FormMode::Edit.title(), "Edit device");
        assert_eq!(FormMode::Edit.submit_label(), "Update");
    }

    #[test]
    fn empty_description_is_left_out_of_the_draft() {
        let draft = FormInput::new("S1", "temp", "A").to_draft();
        assert_eq!(draft.descripcion, None);

        let draft = FormInput::new("S1", "temp", "A")
            .with_descripcion("a description well past fifteen")
            .to_draft();
        assert_eq!(draft.descripcion.as_deref(), Some("a description well past fifteen"));
    }
}
