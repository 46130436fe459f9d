//! Loosely coupled publish/subscribe between components.
//!
//! Subscriptions are keyed by message type. A strong subscription keeps its
//! handler alive until it is unsubscribed; a weak subscription only holds a
//! [`Weak`] handle, so the subscriber decides how long the handler lives by
//! keeping (or dropping) the `Arc` it subscribed with. Dead weak entries are
//! pruned the next time their message type is published.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Shared handler type for messages of type `M`.
pub type Handler<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Token identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
	topic: TypeId,
	id: u64,
}

enum Slot {
	/// Holds a `Handler<M>`.
	Strong(Box<dyn Any + Send + Sync>),
	/// Holds a `Weak<dyn Fn(&M) + Send + Sync>`.
	Weak(Box<dyn Any + Send + Sync>),
}

struct Subscriber {
	id: u64,
	slot: Slot,
}

#[derive(Default)]
struct Topics {
	by_type: FxHashMap<TypeId, Vec<Subscriber>>,
}

/// Typed publish/subscribe hub. Clones share the same subscriptions.
#[derive(Clone, Default)]
pub struct EventAggregator {
	topics: Arc<Mutex<Topics>>,
	next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for EventAggregator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let topics = self.topics.lock();
		f.debug_struct("EventAggregator")
			.field("topics", &topics.by_type.len())
			.field("subscribers", &topics.by_type.values().map(Vec::len).sum::<usize>())
			.finish()
	}
}

impl EventAggregator {
	/// Creates an aggregator with no subscriptions.
	pub fn new() -> Self {
		Self::default()
	}

	/// Subscribes `handler` to messages of type `M`. The aggregator owns the handler.
	pub fn subscribe<M: 'static>(&self, handler: impl Fn(&M) + Send + Sync + 'static) -> SubscriptionId {
		let handler: Handler<M> = Arc::new(handler);
		self.insert::<M>(Slot::Strong(Box::new(handler)))
	}

	/// Subscribes without taking ownership of `handler`.
	///
	/// The subscription stays active while the caller keeps a strong reference to `handler`.
	pub fn subscribe_weak<M: 'static>(&self, handler: &Handler<M>) -> SubscriptionId {
		let weak: Weak<dyn Fn(&M) + Send + Sync> = Arc::downgrade(handler);
		self.insert::<M>(Slot::Weak(Box::new(weak)))
	}

	fn insert<M: 'static>(&self, slot: Slot) -> SubscriptionId {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let topic = TypeId::of::<M>();
		self.topics.lock().by_type.entry(topic).or_default().push(Subscriber { id, slot });
		SubscriptionId { topic, id }
	}

	/// Removes one subscription. Returns false if it was already gone.
	pub fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
		let mut topics = self.topics.lock();
		let Some(list) = topics.by_type.get_mut(&subscription.topic) else {
			return false;
		};
		let before = list.len();
		list.retain(|sub| sub.id != subscription.id);
		let removed = list.len() != before;
		if list.is_empty() {
			topics.by_type.remove(&subscription.topic);
		}
		removed
	}

	/// Delivers `message` to every live subscriber of `M` and returns how many were invoked.
	///
	/// Handlers run after the internal lock is released, so they may subscribe,
	/// unsubscribe or publish themselves.
	pub fn publish<M: 'static>(&self, message: &M) -> usize {
		let handlers = self.live_handlers::<M>();
		for handler in &handlers {
			handler(message);
		}
		handlers.len()
	}

	/// Number of live subscribers for `M`. Prunes dead weak subscriptions.
	pub fn subscriber_count<M: 'static>(&self) -> usize {
		self.live_handlers::<M>().len()
	}

	fn live_handlers<M: 'static>(&self) -> Vec<Handler<M>> {
		let topic = TypeId::of::<M>();
		let mut topics = self.topics.lock();
		let Some(list) = topics.by_type.get_mut(&topic) else {
			return Vec::new();
		};

		let mut live = Vec::with_capacity(list.len());
		let before = list.len();
		list.retain(|sub| match &sub.slot {
			Slot::Strong(any) => {
				if let Some(handler) = any.downcast_ref::<Handler<M>>() {
					live.push(Arc::clone(handler));
				}
				true
			}
			Slot::Weak(any) => match any.downcast_ref::<Weak<dyn Fn(&M) + Send + Sync>>().and_then(Weak::upgrade) {
				Some(handler) => {
					live.push(handler);
					true
				}
				None => false,
			},
		});

		let pruned = before - list.len();
		if pruned > 0 {
			tracing::trace!(pruned, "pruned dead weak subscriptions");
		}
		if list.is_empty() {
			topics.by_type.remove(&topic);
		}
		live
	}
}

#[cfg(test)]
mod tests;
