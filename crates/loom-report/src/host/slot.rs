// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settable error-notification slots.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A handler installed in a [`HookSlot`].
pub type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// A host error-notification slot.
///
/// The slot holds one primary handler, which whoever owns the hooks
/// installs, plus any number of chained observers that run after it.
/// Chaining lets a second party see every event without replacing the
/// owner's handler.
pub struct HookSlot<A: 'static> {
	primary: RwLock<Option<Handler<A>>>,
	chained: RwLock<Vec<Handler<A>>>,
}

impl<A: 'static> HookSlot<A> {
	pub const fn new() -> Self {
		Self {
			primary: RwLock::new(None),
			chained: RwLock::new(Vec::new()),
		}
	}

	/// Installs `handler` as the primary, returning the one it replaced.
	pub fn set(&self, handler: Handler<A>) -> Option<Handler<A>> {
		self
			.primary
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.replace(handler)
	}

	pub fn primary(&self) -> Option<Handler<A>> {
		self
			.primary
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Whether `handler` is the very handler currently installed.
	pub fn is_primary(&self, handler: &Handler<A>) -> bool {
		self
			.primary
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.as_ref()
			.is_some_and(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(handler)))
	}

	/// Adds an observer that runs after the primary on every event.
	pub fn chain(&self, observer: Handler<A>) {
		self
			.chained
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.push(observer);
	}

	pub fn chained_len(&self) -> usize {
		self.chained.read().unwrap_or_else(PoisonError::into_inner).len()
	}

	/// Delivers `event` to the primary and then to chained observers.
	///
	/// Returns `false` when the slot is empty. Handlers are cloned out of
	/// the locks before running, so a handler may touch the slot itself.
	pub fn fire(&self, event: &A) -> bool {
		let primary = self.primary();
		let chained = self
			.chained
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone();

		if let Some(handler) = &primary {
			handler(event);
		}
		for observer in &chained {
			observer(event);
		}

		primary.is_some() || !chained.is_empty()
	}
}

impl<A: 'static> Default for HookSlot<A> {
	fn default() -> Self {
		Self::new()
	}
}

impl<A: 'static> fmt::Debug for HookSlot<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HookSlot")
			.field("primary", &self.primary().is_some())
			.field("chained", &self.chained_len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Mutex;

	#[test]
	fn empty_slot_reports_unhandled() {
		let slot: HookSlot<u32> = HookSlot::new();
		assert!(!slot.fire(&1));
	}

	#[test]
	fn set_returns_previous_and_tracks_identity() {
		let slot: HookSlot<u32> = HookSlot::new();
		let first: Handler<u32> = Arc::new(|_| {});
		let second: Handler<u32> = Arc::new(|_| {});

		assert!(slot.set(Arc::clone(&first)).is_none());
		assert!(slot.is_primary(&first));

		let replaced = slot.set(Arc::clone(&second)).unwrap();
		assert!(Arc::ptr_eq(&replaced, &first));
		assert!(slot.is_primary(&second));
		assert!(!slot.is_primary(&first));
	}

	#[test]
	fn chained_observers_run_after_primary() {
		let slot: HookSlot<u32> = HookSlot::new();
		let order = Arc::new(Mutex::new(Vec::new()));

		let log = Arc::clone(&order);
		slot.chain(Arc::new(move |v| log.lock().unwrap().push(("chained", *v))));
		let log = Arc::clone(&order);
		slot.set(Arc::new(move |v| log.lock().unwrap().push(("primary", *v))));

		assert!(slot.fire(&7));
		assert_eq!(*order.lock().unwrap(), vec![("primary", 7), ("chained", 7)]);
	}

	#[test]
	fn chain_alone_handles_events() {
		let slot: HookSlot<u32> = HookSlot::new();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&hits);
		slot.chain(Arc::new(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		}));

		assert!(slot.fire(&1));
		assert!(slot.primary().is_none());
		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn handler_may_replace_itself_while_firing() {
		let slot: Arc<HookSlot<u32>> = Arc::new(HookSlot::new());
		let inner = Arc::clone(&slot);
		let replacement: Handler<u32> = Arc::new(|_| {});
		let next = Arc::clone(&replacement);
		slot.set(Arc::new(move |_| {
			inner.set(Arc::clone(&next));
		}));

		assert!(slot.fire(&1));
		assert!(slot.is_primary(&replacement));
	}
}
