//! Recording doubles for the storage and email collaborators.

use async_trait::async_trait;
use drivedrop_api::{NotificationEmail, Notifier, NotifyError};
use drivedrop_core::{Credential, StoredObject};
use drivedrop_storage::{ObjectBody, ObjectMetadata, ObjectStorage, StorageError, StorageResult};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::AsyncReadExt;

pub const STORED_FILE_ID: &str = "1AbCdEfGhIjKlMnOp";

#[derive(Clone, Debug)]
pub enum StorageMode {
    Succeed,
    Reject(String),
    Hang(Duration),
}

/// One create-object call as the storage saw it.
#[derive(Clone, Debug)]
pub struct StorageCall {
    pub credential: Credential,
    pub metadata: ObjectMetadata,
    pub content: Vec<u8>,
}

pub struct RecordingStorage {
    mode: StorageMode,
    calls: Mutex<Vec<StorageCall>>,
}

impl RecordingStorage {
    pub fn new(mode: StorageMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn create_object(
        &self,
        credential: &Credential,
        metadata: ObjectMetadata,
        body: ObjectBody,
    ) -> StorageResult<StoredObject> {
        let mut content = Vec::new();
        body.into_file().read_to_end(&mut content).await?;

        self.calls.lock().expect("lock").push(StorageCall {
            credential: credential.clone(),
            metadata: metadata.clone(),
            content,
        });

        match &self.mode {
            StorageMode::Succeed => Ok(StoredObject {
                id: STORED_FILE_ID.to_string(),
                name: metadata.name,
                mime_type: metadata.mime_type,
            }),
            StorageMode::Reject(message) => Err(StorageError::CredentialRejected(message.clone())),
            StorageMode::Hang(after) => {
                tokio::time::sleep(*after).await;
                Err(StorageError::Interrupted("hung".to_string()))
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

#[derive(Clone, Debug)]
pub enum NotifierMode {
    Succeed,
    Reject(String),
    NotConfigured,
    Hang(Duration),
}

pub struct RecordingNotifier {
    mode: NotifierMode,
    sent: Mutex<Vec<NotificationEmail>>,
}

impl RecordingNotifier {
    pub fn new(mode: NotifierMode) -> Self {
        Self {
            mode,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<NotificationEmail> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: NotificationEmail) -> Result<(), NotifyError> {
        self.sent.lock().expect("lock").push(email);
        match &self.mode {
            NotifierMode::Succeed => Ok(()),
            NotifierMode::Reject(message) => Err(NotifyError::Rejected(message.clone())),
            NotifierMode::NotConfigured => {
                Err(NotifyError::NotConfigured("EMAIL_PASS not set".to_string()))
            }
            NotifierMode::Hang(after) => {
                tokio::time::sleep(*after).await;
                Ok(())
            }
        }
    }

    fn is_configured(&self) -> bool {
        !matches!(self.mode, NotifierMode::NotConfigured)
    }
}
