//! Shared fakes for the collaborator traits, used across the test modules

use crate::command::{Command, CommandId, CommandRef};
use crate::transport::{CollectionEvent, CommandTransport, DeviceManager};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Route tracing output through the test harness; honors RUST_LOG
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory transport that records every RPC call in order
pub struct FakeTransport {
    commands: Mutex<HashMap<CommandId, Command>>,
    calls: Mutex<Vec<(String, CommandId)>>,
    events: Mutex<Option<mpsc::Receiver<CollectionEvent>>>,
    fail_calls: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(None),
            fail_calls: false,
        }
    }

    /// Seed a command record into the fake collection
    pub fn with_command(self, id: &str, text: &str) -> Self {
        let id = CommandId::from(id);
        self.commands.lock().unwrap().insert(
            id.clone(),
            Command {
                id,
                text: text.to_string(),
            },
        );
        self
    }

    /// Make every RPC call return an error (calls are still recorded)
    pub fn failing_calls(mut self) -> Self {
        self.fail_calls = true;
        self
    }

    /// Attach the event channel `observe` will hand out
    pub fn with_events(self, rx: mpsc::Receiver<CollectionEvent>) -> Self {
        *self.events.lock().unwrap() = Some(rx);
        self
    }

    /// Recorded RPC calls in invocation order
    pub fn calls(&self) -> Vec<(String, CommandId)> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded RPC method names in invocation order
    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Poll until `n` RPC calls have been recorded or a short deadline passes
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..200 {
            if self.calls.lock().unwrap().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl CommandTransport for FakeTransport {
    async fn subscribe(&self, _publication: &str) -> Result<()> {
        Ok(())
    }

    async fn observe(&self, _collection: &str) -> Result<mpsc::Receiver<CollectionEvent>> {
        self.events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| anyhow!("no event channel attached"))
    }

    async fn command(&self, id: &CommandId) -> Result<Command> {
        self.commands
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("command {} not found", id))
    }

    async fn call(&self, method: &str, id: &CommandId) -> Result<()> {
        self.calls.lock().unwrap().push((method.to_string(), id.clone()));
        if self.fail_calls {
            Err(anyhow!("rpc unavailable"))
        } else {
            Ok(())
        }
    }
}

/// Device manager recording every delegated command
pub struct RecordingDeviceManager {
    triggered: Mutex<Vec<(CommandId, CommandRef)>>,
    fail: bool,
}

impl RecordingDeviceManager {
    pub fn new() -> Self {
        Self {
            triggered: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Make every trigger return an error (still recorded)
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn triggered(&self) -> Vec<(CommandId, CommandRef)> {
        self.triggered.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceManager for RecordingDeviceManager {
    async fn trigger(&self, id: &CommandId, command: &CommandRef) -> Result<()> {
        self.triggered.lock().unwrap().push((id.clone(), command.clone()));
        if self.fail {
            Err(anyhow!("device manager unavailable"))
        } else {
            Ok(())
        }
    }
}
