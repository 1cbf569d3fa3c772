// ── Edit session ──
//
// Single-slot state for the device form. `Editing` owns a copy of the
// device taken when editing began; refreshes of the device cache never
// reach it.

use simcii_api::{Device, DeviceId};

/// What the device form is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditSessionState {
    #[default]
    Idle,
    Creating,
    Editing(Device),
}

/// At most one session is open. Opening a new one replaces the previous
/// session and discards its unsaved edits; nothing is queued.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditSessionState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_create(&mut self) {
        self.state = EditSessionState::Creating;
    }

    /// Start editing a snapshot of `device`.
    pub fn begin_edit(&mut self, device: &Device) {
        self.state = EditSessionState::Editing(device.clone());
    }

    /// Return to `Idle`. Also used after a successful submit.
    pub fn cancel(&mut self) {
        self.state = EditSessionState::Idle;
    }

    pub fn current(&self) -> &EditSessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, EditSessionState::Idle)
    }

    /// Id of the device being edited, if any.
    pub fn editing_id(&self) -> Option<DeviceId> {
        match &self.state {
            EditSessionState::Editing(device) => Some(device.id),
            _ => None,
        }
    }
}
