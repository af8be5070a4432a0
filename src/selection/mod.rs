//! Selection emitter
//!
//! The terminal event of a chooser session. [`SelectionEmitter::channel`]
//! hands the embedding context a receiver; the emitter sends at most one
//! [`ChosenItem`] into it and is spent afterwards. Cancelling drops the
//! sender, so the receiver observes closure without an item.
//!
//! Whether an item may be chosen at all is decided by [`identity_of`]:
//! model buckets never are, pages only when they pass the type filter.

pub mod error;

pub use error::SelectionError;

use crate::resource::{ChosenItem, ModelEntry, PageId, PageSummary, ResourceItem, TypeFilter};
use tokio::sync::oneshot;

/// Receiving half handed to the embedding context
pub type SelectionReceiver = oneshot::Receiver<ChosenItem>;

/// Canonical identity of `item`, if it may be chosen under `filter`
///
/// # Errors
///
/// Returns `BucketNotChoosable` for model types and `NotChoosable` for pages
/// whose type is outside the filter.
pub fn identity_of(
    item: &ResourceItem,
    filter: Option<&TypeFilter>,
) -> Result<ChosenItem, SelectionError> {
    match item {
        ResourceItem::Page(page) => page_identity(page.id, Some(&page.page_type), filter),
        ResourceItem::Model(ModelEntry::Bucket(bucket)) => {
            Err(SelectionError::BucketNotChoosable(bucket.label.clone()))
        }
        ResourceItem::Model(ModelEntry::Instance(instance)) => Ok(ChosenItem::Model {
            model_label: instance.label.clone(),
            id: instance.id.clone(),
        }),
    }
}

/// Identity of a parent page shown above a listing
///
/// # Errors
///
/// Returns `NotChoosable` when a filter is active and the page type is
/// unknown or not allowed.
pub fn parent_identity(
    parent: &PageSummary,
    filter: Option<&TypeFilter>,
) -> Result<ChosenItem, SelectionError> {
    page_identity(parent.id, parent.page_type.as_deref(), filter)
}

fn page_identity(
    id: PageId,
    page_type: Option<&str>,
    filter: Option<&TypeFilter>,
) -> Result<ChosenItem, SelectionError> {
    let Some(filter) = filter else {
        return Ok(ChosenItem::Page { id });
    };
    match page_type {
        Some(page_type) if filter.matches(page_type) => Ok(ChosenItem::Page { id }),
        other => Err(SelectionError::NotChoosable {
            id,
            page_type: other.unwrap_or("unknown").to_string(),
        }),
    }
}

/// One-shot sender for the chosen item
#[derive(Debug)]
pub struct SelectionEmitter {
    sender: Option<oneshot::Sender<ChosenItem>>,
}

impl SelectionEmitter {
    /// Create an emitter and the receiver it will fire into
    #[must_use]
    pub fn channel() -> (Self, SelectionReceiver) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// True once the emitter has fired or been cancelled
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    /// Send `chosen` to the receiver
    ///
    /// # Errors
    ///
    /// Returns `AlreadyChosen` if the emitter is spent and `ReceiverDropped`
    /// if the receiver is gone. The emitter is spent either way.
    pub fn emit(&mut self, chosen: ChosenItem) -> Result<(), SelectionError> {
        let sender = self.sender.take().ok_or(SelectionError::AlreadyChosen)?;
        sender
            .send(chosen)
            .map_err(|_| SelectionError::ReceiverDropped)
    }

    /// Choose `item`, rejecting items that cannot be chosen
    ///
    /// A rejected item leaves the emitter open.
    ///
    /// # Errors
    ///
    /// See [`identity_of`] and [`SelectionEmitter::emit`].
    pub fn choose(
        &mut self,
        item: &ResourceItem,
        filter: Option<&TypeFilter>,
    ) -> Result<ChosenItem, SelectionError> {
        if self.is_closed() {
            return Err(SelectionError::AlreadyChosen);
        }
        let chosen = identity_of(item, filter)?;
        self.emit(chosen.clone())?;
        Ok(chosen)
    }

    /// Close without choosing anything
    pub fn cancel(&mut self) {
        self.sender = None;
    }
}
