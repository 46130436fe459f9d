use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct Saved(&'static str);

#[derive(Debug)]
struct Closed;

#[test]
fn publish_reaches_only_matching_type() {
	let events = EventAggregator::new();
	let seen = Arc::new(Mutex::new(Vec::new()));
	let closed = Arc::new(AtomicUsize::new(0));

	let sink = Arc::clone(&seen);
	events.subscribe::<Saved>(move |msg| sink.lock().push(msg.clone()));
	let counter = Arc::clone(&closed);
	events.subscribe::<Closed>(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	assert_eq!(events.publish(&Saved("a.txt")), 1);
	assert_eq!(events.publish(&Saved("b.txt")), 1);
	assert_eq!(*seen.lock(), vec![Saved("a.txt"), Saved("b.txt")]);
	assert_eq!(closed.load(Ordering::SeqCst), 0);
}

#[test]
fn publish_without_subscribers_is_noop() {
	let events = EventAggregator::new();
	assert_eq!(events.publish(&Closed), 0);
	assert_eq!(events.subscriber_count::<Closed>(), 0);
}

#[test]
fn unsubscribe_stops_delivery() {
	let events = EventAggregator::new();
	let hits = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&hits);
	let id = events.subscribe::<Closed>(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	events.publish(&Closed);
	assert!(events.unsubscribe(id));
	assert!(!events.unsubscribe(id));
	events.publish(&Closed);

	assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn weak_subscription_lives_as_long_as_its_owner() {
	let events = EventAggregator::new();
	let hits = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&hits);
	let handler: Handler<Closed> = Arc::new(move |_: &Closed| {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	events.subscribe_weak(&handler);
	assert_eq!(events.publish(&Closed), 1);

	drop(handler);
	assert_eq!(events.publish(&Closed), 0);
	assert_eq!(events.subscriber_count::<Closed>(), 0);
	assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn weak_subscription_can_be_unsubscribed_explicitly() {
	let events = EventAggregator::new();
	let handler: Handler<Closed> = Arc::new(|_: &Closed| {});
	let id = events.subscribe_weak(&handler);
	assert_eq!(events.subscriber_count::<Closed>(), 1);
	assert!(events.unsubscribe(id));
	assert_eq!(events.publish(&Closed), 0);
}

#[test]
fn handlers_may_reenter_the_aggregator() {
	let events = EventAggregator::new();
	let inner = events.clone();
	let hits = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&hits);

	events.subscribe::<Saved>(move |_| {
		let counter = Arc::clone(&counter);
		inner.subscribe::<Closed>(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		});
		inner.publish(&Closed);
	});

	events.publish(&Saved("x"));
	assert_eq!(hits.load(Ordering::SeqCst), 1);
	assert_eq!(events.subscriber_count::<Closed>(), 1);
}
