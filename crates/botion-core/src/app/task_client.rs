use core::fmt::Write as _;

use heapless::String;
use log::{debug, info, warn};

use crate::domain::entity::{CREDENTIAL_LEN, Credentials, Task};
use crate::domain::ports::{ApiMethod, ApiRequest, HttpTransport, TransportError};
use crate::notion::{self, MARK_DONE_BODY};

const URL_LEN: usize = 192;
const QUERY_BODY_LEN: usize = 192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteError {
    /// There is no task to act on.
    NoTask,
    Transport(TransportError),
    /// The store answered with a status other than 200.
    Status(u16),
    /// The response body could not be decoded.
    Decode,
    /// A URL or request body did not fit its buffer.
    Encode,
}

impl From<TransportError> for RemoteError {
    fn from(error: TransportError) -> Self {
        RemoteError::Transport(error)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaskClientConfig {
    /// API base URL with trailing slash.
    pub base_url: &'static str,
    /// Only records tagged with this category are fetched.
    pub category: &'static str,
}

impl Default for TaskClientConfig {
    fn default() -> Self {
        Self {
            base_url: notion::API_BASE_URL,
            category: "Club",
        }
    }
}

/// Holds the current task and keeps it in step with the remote list.
pub struct TaskClient<T: HttpTransport> {
    transport: T,
    config: TaskClientConfig,
    api_key: String<CREDENTIAL_LEN>,
    query_url: String<URL_LEN>,
    current: Task,
    tasks_done: bool,
}

impl<T: HttpTransport> TaskClient<T> {
    /// The query URL is built once from the list identifier in `credentials`.
    pub fn new(
        transport: T,
        credentials: &Credentials,
        config: TaskClientConfig,
    ) -> Result<Self, RemoteError> {
        let mut query_url = String::new();
        write!(query_url, "{}databases/{}/query", config.base_url, credentials.list_id)
            .map_err(|_| RemoteError::Encode)?;

        Ok(Self {
            transport,
            config,
            api_key: credentials.api_key.clone(),
            query_url,
            current: Task::none(),
            tasks_done: false,
        })
    }

    pub fn current(&self) -> &Task {
        &self.current
    }

    /// No pending task is known.
    pub fn tasks_done(&self) -> bool {
        self.tasks_done
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Query the list and adopt the first record that is not done, or
    /// "no task" when every record is done. On error nothing changes.
    pub async fn fetch_next(&mut self) -> Result<(), RemoteError> {
        let mut body = [0u8; QUERY_BODY_LEN];
        let body_len =
            notion::encode_query(self.config.category, &mut body).map_err(|_| RemoteError::Encode)?;
        let request = ApiRequest {
            method: ApiMethod::Post,
            url: &self.query_url,
            api_key: &self.api_key,
            body: &body[..body_len],
        };

        let scan = self
            .transport
            .send(&request, |status, response| {
                if status != 200 {
                    return Err(RemoteError::Status(status));
                }
                notion::decode_query(response).map_err(|e| {
                    warn!("task_client: could not decode query response: {:?}", e);
                    RemoteError::Decode
                })
            })
            .await
            .map_err(RemoteError::from)
            .and_then(|decoded| decoded)
            .inspect_err(|e| warn!("task_client: query failed: {:?}", e))?;

        match scan.first_pending {
            Some(task) => {
                info!("task_client: next task {}", task.id);
                self.current = task;
                self.tasks_done = false;
            }
            None => {
                info!("task_client: no pending tasks in {} record(s)", scan.inspected);
                self.current = Task::none();
                self.tasks_done = true;
            }
        }
        Ok(())
    }

    /// Check the `Done` box of the record `task_id`.
    pub async fn mark_done(&mut self, task_id: &str) -> Result<(), RemoteError> {
        if task_id.is_empty() {
            return Err(RemoteError::NoTask);
        }
        let mut url = String::<URL_LEN>::new();
        write!(url, "{}pages/{}", self.config.base_url, task_id).map_err(|_| RemoteError::Encode)?;
        let request = ApiRequest {
            method: ApiMethod::Patch,
            url: &url,
            api_key: &self.api_key,
            body: MARK_DONE_BODY,
        };

        let status = self.transport.send(&request, |status, _| status).await?;
        if status != 200 {
            warn!("task_client: mark done failed with status {}", status);
            return Err(RemoteError::Status(status));
        }
        debug!("task_client: marked {} as done", task_id);
        self.tasks_done = true;
        Ok(())
    }

    /// Record locally that the current task was completed.
    pub fn echo_completed(&mut self) {
        self.current.done = true;
    }
}
