use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{anyhow, Result};

/// One-shot handle to a value produced on a background thread
///
/// Polled from the update thread with [`Pending::try_take`]; the result is
/// handed out exactly once.
#[derive(Debug)]
pub struct Pending<T> {
    label: String,
    receiver: Option<Receiver<Result<T>>>,
}

impl<T: Send + 'static> Pending<T> {
    /// Run `job` on a new thread named after `label`
    pub fn spawn(
        label: impl Into<String>,
        job: impl FnOnce() -> Result<T> + Send + 'static,
    ) -> Self {
        let label = label.into();
        let (sender, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name(format!("load {}", label))
            .spawn(move || {
                // The receiver may already be gone if the scene was dropped
                sender.send(job()).ok();
            });

        match spawned {
            Ok(_) => Self {
                label,
                receiver: Some(receiver),
            },
            Err(e) => Self::ready(label, Err(anyhow!(e).context("Failed to spawn loader thread"))),
        }
    }
}

impl<T> Pending<T> {
    /// Handle that is already complete
    pub fn ready(label: impl Into<String>, result: Result<T>) -> Self {
        let (sender, receiver) = mpsc::channel();
        sender.send(result).ok();
        Self {
            label: label.into(),
            receiver: Some(receiver),
        }
    }

    /// True once the result has been taken
    pub fn is_taken(&self) -> bool {
        self.receiver.is_none()
    }

    /// Non-blocking poll; `Some` exactly once, when the job has finished
    pub fn try_take(&mut self) -> Option<Result<T>> {
        let receiver = self.receiver.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(self.exited()),
        };
        self.receiver = None;
        Some(result)
    }

    /// Block until the job finishes; `None` if the result was already taken
    pub fn wait(&mut self) -> Option<Result<T>> {
        let receiver = self.receiver.take()?;
        Some(receiver.recv().unwrap_or_else(|_| Err(self.exited())))
    }

    fn exited(&self) -> anyhow::Error {
        anyhow!("Loader for {} exited without a result", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ready_value_is_taken_once() {
        let mut pending = Pending::ready("value", Ok(3));
        assert_eq!(pending.try_take().map(|r| r.ok()), Some(Some(3)));
        assert!(pending.is_taken());
        assert!(pending.try_take().is_none());
    }

    #[test]
    fn test_spawned_job_completes() {
        let mut pending = Pending::spawn("sum", || Ok((1..=10).sum::<u32>()));
        let result = pending.wait().and_then(|r| r.ok());
        assert_eq!(result, Some(55));
        assert!(pending.wait().is_none());
    }

    #[test]
    fn test_poll_returns_none_while_running() {
        let (release, gate) = mpsc::channel::<()>();
        let mut pending = Pending::spawn("gated", move || {
            gate.recv().ok();
            Ok(1)
        });
        assert!(pending.try_take().is_none());

        release.send(()).ok();
        let mut result = None;
        for _ in 0..200 {
            result = pending.try_take();
            if result.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(result, Some(Ok(1))));
    }

    #[test]
    fn test_errors_are_delivered() {
        let mut pending: Pending<u32> = Pending::spawn("broken", || Err(anyhow!("missing file")));
        let err = pending.wait().and_then(|r| r.err()).map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("missing file"));
    }
}
