use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::error::AssetError;

pub type AssetResult<T> = Result<T, AssetError>;

/// Producer half of a background load
#[derive(Debug)]
pub struct AssetSender<T> {
    label: String,
    sender: oneshot::Sender<AssetResult<T>>,
}

impl<T> AssetSender<T> {
    /// Deliver the result; returns false when nobody is waiting any more
    pub fn complete(self, result: AssetResult<T>) -> bool {
        let delivered = self.sender.send(result).is_ok();
        if !delivered {
            log::debug!("Dropping result for {}: receiver gone", self.label);
        }
        delivered
    }
}

/// Result of a load that finishes on another thread.
///
/// Poll it with [`PendingAsset::try_take`] from the frame loop or await it.
/// Dropping it abandons the result without affecting the producer.
#[derive(Debug)]
pub struct PendingAsset<T> {
    label: String,
    receiver: Option<oneshot::Receiver<AssetResult<T>>>,
}

impl<T> PendingAsset<T> {
    pub fn channel(label: impl Into<String>) -> (AssetSender<T>, PendingAsset<T>) {
        let label = label.into();
        let (sender, receiver) = oneshot::channel();
        (
            AssetSender {
                label: label.clone(),
                sender,
            },
            PendingAsset {
                label,
                receiver: Some(receiver),
            },
        )
    }

    /// Already-resolved asset
    pub fn resolved(label: impl Into<String>, result: AssetResult<T>) -> Self {
        let (sender, pending) = Self::channel(label);
        sender.complete(result);
        pending
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Take the result if it has arrived; yields it at most once
    pub fn try_take(&mut self) -> Option<AssetResult<T>> {
        let receiver = self.receiver.as_mut()?;
        let outcome = match receiver.try_recv() {
            Ok(None) => return None,
            Ok(Some(result)) => result,
            Err(oneshot::Canceled) => Err(AssetError::Cancelled(self.label.clone())),
        };
        self.receiver = None;
        Some(outcome)
    }

    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }
}

impl<T> Future for PendingAsset<T> {
    type Output = AssetResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(receiver) = this.receiver.as_mut() else {
            return Poll::Ready(Err(AssetError::Cancelled(this.label.clone())));
        };
        match Pin::new(receiver).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(result) => {
                this.receiver = None;
                Poll::Ready(
                    result.unwrap_or_else(|_| Err(AssetError::Cancelled(this.label.clone()))),
                )
            }
        }
    }
}
