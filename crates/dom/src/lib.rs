//! DOM mirroring primitives shared by the synxia crates.
//!
//! The host document is never touched directly. It publishes batches of
//! [`DOMUpdate`] values, subscribers mirror the parts they care about, and any
//! change a subscriber wants to make to the document travels back as another
//! batch of [`DOMUpdate`] values.

use anyhow::{Result, anyhow};
use core::hash::Hash;
use log::warn;
use std::collections::HashMap;
use tokio::sync::broadcast::Receiver as BroadcastReceiver;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::mpsc::Sender as MpscSender;
use tokio::sync::mpsc::error::TrySendError;

// ============================
// Stable Node keys
// ============================

/// A 64-bit stable key for DOM nodes used to correlate updates across subsystems.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The root node key (always present).
    pub const ROOT: Self = Self(0);

    /// Pack epoch+shard+counter into a single 64-bit key.
    #[inline]
    pub const fn pack(epoch: u16, shard: u8, counter: u64) -> Self {
        let masked = counter & ((1u64 << 40) - 1);
        Self(((epoch as u64) << 48) | ((shard as u64) << 40) | masked)
    }
}

/// Key space for minting `NodeKey`s with a shared epoch and unique shard ids.
///
/// Every producer of nodes (the host parser, the style element sink, ...) registers
/// its own manager so keys minted by different producers never collide.
#[derive(Debug)]
pub struct KeySpace {
    epoch: u16,
    next_shard_id: u8,
}

impl KeySpace {
    /// Create a key space whose keys all carry `epoch`.
    pub const fn with_epoch(epoch: u16) -> Self {
        Self {
            epoch,
            next_shard_id: 1,
        }
    }

    /// Register a new manager for a producer shard.
    pub fn register_manager<L: Eq + Hash + Copy>(&mut self) -> NodeKeyManager<L> {
        let shard = self.next_shard_id;
        self.next_shard_id = self.next_shard_id.wrapping_add(1);
        NodeKeyManager::new(self.epoch, shard)
    }
}

/// Per-shard manager mapping local ids to `NodeKey`s and minting new keys.
#[derive(Clone, Debug)]
pub struct NodeKeyManager<L: Eq + Hash + Copy> {
    epoch: u16,
    shard: u8,
    counter: u64,
    map: HashMap<L, NodeKey>,
}

impl<L: Eq + Hash + Copy> NodeKeyManager<L> {
    fn new(epoch: u16, shard: u8) -> Self {
        Self {
            epoch,
            shard,
            counter: 1,
            map: HashMap::new(),
        }
    }

    /// Get the `NodeKey` for a local id, minting one if not present.
    #[inline]
    pub fn key_of(&mut self, id: L) -> NodeKey {
        if let Some(&existing) = self.map.get(&id) {
            return existing;
        }
        let key = NodeKey::pack(self.epoch, self.shard, self.counter);
        self.counter = self.counter.wrapping_add(1);
        self.map.insert(id, key);
        key
    }
}

// ============================
// DOM Update model + mirror pattern
// ============================

/// A batchable update applied to the host DOM and mirrored to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DOMUpdate {
    /// An element was created under `parent` at child position `pos`.
    InsertElement {
        parent: NodeKey,
        node: NodeKey,
        tag: String,
        pos: usize,
    },
    /// A text node was created under `parent` at child position `pos`.
    InsertText {
        parent: NodeKey,
        node: NodeKey,
        text: String,
        pos: usize,
    },
    /// An attribute was set (or replaced) on `node`.
    SetAttr {
        node: NodeKey,
        name: String,
        value: String,
    },
    /// `node` and its subtree were removed.
    RemoveNode { node: NodeKey },
    /// The initial document has been fully delivered.
    EndOfDocument,
}

/// A subscriber that receives `DOMUpdate` values and mirrors them into its own state.
pub trait DOMSubscriber {
    /// Apply a single `DOMUpdate` to the subscriber state.
    ///
    /// # Errors
    /// Returns an error if the subscriber cannot mirror the update.
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()>;

    /// Drain the changes this subscriber wants written back to the host DOM.
    fn take_outgoing(&mut self) -> Vec<DOMUpdate> {
        Vec::new()
    }
}

/// Generic mirror that applies incoming DOM updates and sends changes back to the host.
pub struct DOMMirror<T: DOMSubscriber> {
    in_updater: BroadcastReceiver<Vec<DOMUpdate>>,
    out_updater: MpscSender<Vec<DOMUpdate>>,
    mirror: T,
}

impl<T: DOMSubscriber> DOMMirror<T> {
    /// Create a new `DOMMirror` wrapping a subscriber implementation.
    pub const fn new(
        out_updater: MpscSender<Vec<DOMUpdate>>,
        in_updater: BroadcastReceiver<Vec<DOMUpdate>>,
        mirror: T,
    ) -> Self {
        Self {
            in_updater,
            out_updater,
            mirror,
        }
    }

    /// Drain every pending batch, apply it, then flush outgoing changes.
    ///
    /// Batches are applied in arrival order and updates within a batch in order.
    ///
    /// # Errors
    /// Returns an error if the inbound channel closed, the subscriber rejects an
    /// update, or the outbound channel cannot accept the write-back batch.
    pub fn try_update_sync(&mut self) -> Result<()> {
        loop {
            match self.in_updater.try_recv() {
                Ok(batch) => {
                    for update in batch {
                        self.mirror.apply_update(update)?;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("DOMMirror lagged behind the host; {skipped} batches were dropped");
                }
                Err(TryRecvError::Closed) => {
                    return Err(anyhow!("Recv channel was closed before document ended!"));
                }
            }
        }
        self.flush_outgoing()
    }

    /// Send the subscriber's pending changes back to the host, if any.
    ///
    /// # Errors
    /// Returns an error if the outbound channel is full or closed.
    pub fn flush_outgoing(&mut self) -> Result<()> {
        let changes = self.mirror.take_outgoing();
        if changes.is_empty() {
            return Ok(());
        }
        match self.out_updater.try_send(changes) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(batch)) => Err(anyhow!(
                "Send channel is full; {} DOM changes were not delivered",
                batch.len()
            )),
            Err(TrySendError::Closed(_)) => Err(anyhow!("Send channel was closed by the host")),
        }
    }

    /// Access the inner mirror immutably.
    pub const fn mirror(&self) -> &T {
        &self.mirror
    }
}
