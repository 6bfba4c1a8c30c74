// Copyright 2015-2020 Parity Technologies (UK) Ltd.
// This file is part of Parity.

// Parity is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity.  If not, see <http://www.gnu.org/licenses/>.

// Probabilistic ordered set. Expected O(log n) insert, search and remove,
// in-order iteration over level-0 links.
//
// Nodes live in a slotted Vec addressed by u32, with removed slots chained
// on a free list for reuse. `NIL` is the end-of-list sentinel at every
// level. Comparators are supplied per operation rather than implemented on
// the item type; ordering state owned by the caller (a relative tolerance,
// a side arena) stays with the caller.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

const MAX_HEIGHT: usize = 16;
// 1/4 promotion probability.
const BRANCHING: u32 = 4;
const NIL: u32 = u32::MAX;

enum Slot<T> {
	Node { item: T, forward: Vec<u32> },
	Free { next: u32 },
}

pub struct SkipList<T> {
	slots: Vec<Slot<T>>,
	head: [u32; MAX_HEIGHT],
	height: usize,
	len: usize,
	free: u32,
	rng: SmallRng,
}

impl<T> SkipList<T> {
	pub fn new(seed: u64) -> SkipList<T> {
		SkipList {
			slots: Vec::new(),
			head: [NIL; MAX_HEIGHT],
			height: 1,
			len: 0,
			free: NIL,
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	fn item(&self, index: u32) -> &T {
		match &self.slots[index as usize] {
			Slot::Node { item, .. } => item,
			Slot::Free { .. } => unreachable!("Free slot reached through a link"),
		}
	}

	fn item_mut(&mut self, index: u32) -> &mut T {
		match &mut self.slots[index as usize] {
			Slot::Node { item, .. } => item,
			Slot::Free { .. } => unreachable!("Free slot reached through a link"),
		}
	}

	fn next(&self, at: u32, level: usize) -> u32 {
		if at == NIL {
			self.head[level]
		} else {
			match &self.slots[at as usize] {
				Slot::Node { forward, .. } => forward[level],
				Slot::Free { .. } => unreachable!("Free slot reached through a link"),
			}
		}
	}

	fn set_next(&mut self, at: u32, level: usize, target: u32) {
		if at == NIL {
			self.head[level] = target;
		} else {
			match &mut self.slots[at as usize] {
				Slot::Node { forward, .. } => forward[level] = target,
				Slot::Free { .. } => unreachable!("Free slot reached through a link"),
			}
		}
	}

	fn random_height(&mut self) -> usize {
		let mut height = 1;
		while height < MAX_HEIGHT && self.rng.gen_range(0..BRANCHING) == 0 {
			height += 1;
		}
		height
	}

	fn alloc(&mut self, item: T, forward: Vec<u32>) -> u32 {
		if self.free != NIL {
			let index = self.free;
			match std::mem::replace(&mut self.slots[index as usize], Slot::Node { item, forward }) {
				Slot::Free { next } => self.free = next,
				Slot::Node { .. } => unreachable!("Free list points at a live node"),
			}
			index
		} else {
			self.slots.push(Slot::Node { item, forward });
			(self.slots.len() - 1) as u32
		}
	}

	/// Insert a new item. Returns false (and drops nothing into the list)
	/// if an equal item is already present.
	pub fn insert(&mut self, item: T, mut cmp: impl FnMut(&T, &T) -> Ordering) -> bool {
		let mut update = [NIL; MAX_HEIGHT];
		let mut at = NIL;
		for level in (0..self.height).rev() {
			loop {
				let next = self.next(at, level);
				if next == NIL {
					break;
				}
				match cmp(self.item(next), &item) {
					Ordering::Less => at = next,
					Ordering::Equal => return false,
					Ordering::Greater => break,
				}
			}
			update[level] = at;
		}

		let height = self.random_height();
		if height > self.height {
			self.height = height;
		}
		let forward: Vec<u32> = (0..height).map(|level| self.next(update[level], level)).collect();
		let index = self.alloc(item, forward);
		for level in 0..height {
			self.set_next(update[level], level, index);
		}
		self.len += 1;
		true
	}

	// Descend to the last node strictly before the probe target. The probe
	// reports where its argument sits relative to the target.
	fn find(&self, probe: &mut impl FnMut(&T) -> Ordering) -> u32 {
		let mut at = NIL;
		for level in (0..self.height).rev() {
			loop {
				let next = self.next(at, level);
				if next == NIL {
					break;
				}
				match probe(self.item(next)) {
					Ordering::Less => at = next,
					_ => break,
				}
			}
		}
		at
	}

	pub fn search(&self, mut probe: impl FnMut(&T) -> Ordering) -> Option<&T> {
		let before = self.find(&mut probe);
		let candidate = self.next(before, 0);
		if candidate != NIL && probe(self.item(candidate)) == Ordering::Equal {
			Some(self.item(candidate))
		} else {
			None
		}
	}

	/// Mutable search. The caller must not change the item's ordering key.
	pub fn search_mut(&mut self, mut probe: impl FnMut(&T) -> Ordering) -> Option<&mut T> {
		let before = self.find(&mut probe);
		let candidate = self.next(before, 0);
		if candidate != NIL && probe(self.item(candidate)) == Ordering::Equal {
			Some(self.item_mut(candidate))
		} else {
			None
		}
	}

	pub fn remove(&mut self, mut probe: impl FnMut(&T) -> Ordering) -> Option<T> {
		let mut update = [NIL; MAX_HEIGHT];
		let mut at = NIL;
		for level in (0..self.height).rev() {
			loop {
				let next = self.next(at, level);
				if next == NIL {
					break;
				}
				match probe(self.item(next)) {
					Ordering::Less => at = next,
					_ => break,
				}
			}
			update[level] = at;
		}

		let target = self.next(update[0], 0);
		if target == NIL || probe(self.item(target)) != Ordering::Equal {
			return None;
		}

		for level in 0..self.height {
			if self.next(update[level], level) == target {
				let after = self.next(target, level);
				self.set_next(update[level], level, after);
			}
		}
		while self.height > 1 && self.head[self.height - 1] == NIL {
			self.height -= 1;
		}

		let slot = std::mem::replace(&mut self.slots[target as usize], Slot::Free { next: self.free });
		self.free = target;
		self.len -= 1;
		match slot {
			Slot::Node { item, .. } => Some(item),
			Slot::Free { .. } => unreachable!("Free slot reached through a link"),
		}
	}

	pub fn iter(&self) -> Iter<'_, T> {
		Iter { list: self, at: self.head[0] }
	}
}

pub struct Iter<'a, T> {
	list: &'a SkipList<T>,
	at: u32,
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		if self.at == NIL {
			return None;
		}
		let item = self.list.item(self.at);
		self.at = self.list.next(self.at, 0);
		Some(item)
	}
}

#[cfg(test)]
mod test {
	use super::SkipList;

	fn list_of(keys: &[u64]) -> SkipList<u64> {
		let mut list = SkipList::new(0);
		for &key in keys {
			assert!(list.insert(key, |a, b| a.cmp(b)));
		}
		list
	}

	#[test]
	fn iterates_in_order() {
		let list = list_of(&[5, 1, 9, 3, 7, 2, 8, 4, 6, 0]);
		let sorted: Vec<u64> = list.iter().copied().collect();
		assert_eq!(sorted, (0..10).collect::<Vec<u64>>());
		assert_eq!(list.len(), 10);
	}

	#[test]
	fn rejects_duplicates() {
		let mut list = list_of(&[2, 1, 3]);
		assert!(!list.insert(2, |a, b| a.cmp(b)));
		assert_eq!(list.len(), 3);
		assert_eq!(list.iter().copied().collect::<Vec<u64>>(), vec![1, 2, 3]);
	}

	#[test]
	fn search_finds_present_keys_only() {
		let list = list_of(&[10, 30, 20]);
		assert_eq!(list.search(|item| item.cmp(&20)), Some(&20));
		assert_eq!(list.search(|item| item.cmp(&25)), None);
		assert_eq!(list.search(|item| item.cmp(&5)), None);
		assert_eq!(list.search(|item| item.cmp(&35)), None);
	}

	#[test]
	fn removes_and_relinks() {
		let mut list = list_of(&[4, 2, 6, 1, 3, 5, 7]);
		assert_eq!(list.remove(|item| item.cmp(&4)), Some(4));
		assert_eq!(list.remove(|item| item.cmp(&1)), Some(1));
		assert_eq!(list.remove(|item| item.cmp(&7)), Some(7));
		assert_eq!(list.remove(|item| item.cmp(&7)), None);
		assert_eq!(list.iter().copied().collect::<Vec<u64>>(), vec![2, 3, 5, 6]);
		assert_eq!(list.len(), 4);
	}

	#[test]
	fn reuses_removed_slots() {
		let mut list = list_of(&[1, 2, 3]);
		list.remove(|item| item.cmp(&2));
		assert!(list.insert(9, |a, b| a.cmp(b)));
		// The freed slot was recycled, no growth.
		assert_eq!(list.slots.len(), 3);
		assert_eq!(list.iter().copied().collect::<Vec<u64>>(), vec![1, 3, 9]);
	}

	#[test]
	fn survives_a_large_shuffled_load() {
		let mut list = SkipList::new(42);
		// a*i + c is a bijection mod 2^12 for odd a, so every key is distinct.
		for i in 0u64..4096 {
			let key = (i * 1103515245 + 12345) & 0xfff;
			assert!(list.insert(key, |a, b| a.cmp(b)));
		}
		assert_eq!(list.len(), 4096);
		let sorted: Vec<u64> = list.iter().copied().collect();
		assert_eq!(sorted, (0..4096).collect::<Vec<u64>>());
	}
}
