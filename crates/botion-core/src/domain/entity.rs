use heapless::String;

pub const TASK_ID_LEN: usize = 40;
pub const TASK_NAME_LEN: usize = 96;
pub const TASK_CATEGORY_LEN: usize = 32;
pub const DUE_DATE_LEN: usize = 16;

/// Longest value accepted for any credential slot.
pub const CREDENTIAL_LEN: usize = 128;

/// Due date shown when the record has no `Due` value.
pub const NO_DUE_DATE: &str = "No due date";
/// Due date shown when the `Due` value cannot be read as `YYYY-MM-DD`.
pub const INVALID_DUE_DATE: &str = "Invalid date";

pub type TaskId = String<TASK_ID_LEN>;
pub type CredentialValue = String<CREDENTIAL_LEN>;

/// The single work item the device tracks.
///
/// An empty `id` means "no task".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String<TASK_NAME_LEN>,
    pub category: String<TASK_CATEGORY_LEN>,
    pub due_date: String<DUE_DATE_LEN>,
    pub done: bool,
}

impl Task {
    /// The "no task" value.
    pub const fn none() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            category: String::new(),
            due_date: String::new(),
            done: false,
        }
    }

    pub fn is_none(&self) -> bool {
        self.id.is_empty()
    }
}

/// One of the four persisted configuration strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSlot {
    NetworkName,
    NetworkSecret,
    ApiKey,
    ListId,
}

impl CredentialSlot {
    pub const ALL: [Self; 4] = [
        Self::NetworkName,
        Self::NetworkSecret,
        Self::ApiKey,
        Self::ListId,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::NetworkName => 0,
            Self::NetworkSecret => 1,
            Self::ApiKey => 2,
            Self::ListId => 3,
        }
    }

    /// Name of the provisioning form field that carries this slot.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::NetworkName => "ssid",
            Self::NetworkSecret => "pass",
            Self::ApiKey => "api_key",
            Self::ListId => "database_id",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }

    /// Whether the value must never reach the log.
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::NetworkSecret | Self::ApiKey)
    }
}

/// The persisted configuration. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub network_name: CredentialValue,
    pub network_secret: CredentialValue,
    pub api_key: CredentialValue,
    pub list_id: CredentialValue,
}

impl Credentials {
    pub fn get(&self, slot: CredentialSlot) -> &str {
        match slot {
            CredentialSlot::NetworkName => &self.network_name,
            CredentialSlot::NetworkSecret => &self.network_secret,
            CredentialSlot::ApiKey => &self.api_key,
            CredentialSlot::ListId => &self.list_id,
        }
    }

    pub fn set(&mut self, slot: CredentialSlot, value: CredentialValue) {
        match slot {
            CredentialSlot::NetworkName => self.network_name = value,
            CredentialSlot::NetworkSecret => self.network_secret = value,
            CredentialSlot::ApiKey => self.api_key = value,
            CredentialSlot::ListId => self.list_id = value,
        }
    }

    /// Both network name and secret are present.
    pub fn has_network(&self) -> bool {
        !self.network_name.is_empty() && !self.network_secret.is_empty()
    }
}

/// Operating mode chosen once at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    Provisioning,
    Normal,
}

/// Result of polling the push button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Idle,
    Pressed,
}
