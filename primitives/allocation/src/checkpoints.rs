//! Block-indexed value history.
//!
//! A [`Trace`] is an ordered list of `(key, value)` checkpoints where keys are strictly
//! increasing. It answers "what was the value as of key `k`" by binary search, which is how
//! app eligibility, the quorum numerator and the quadratic rewarding toggle are kept
//! queryable for past rounds and cycles.

use codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_runtime::{traits::IntegerSquareRoot, RuntimeDebug};
use sp_std::vec::Vec;

/// Lookups on traces longer than this first probe near the tail.
const RECENT_PROBE_THRESHOLD: usize = 5;

#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct Checkpoint<K, V> {
	pub key: K,
	pub value: V,
}

#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum CheckpointError {
	/// The pushed key is not strictly greater than the last stored key.
	OutOfOrderTimepoint,
}

#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct Trace<K, V> {
	checkpoints: Vec<Checkpoint<K, V>>,
}

impl<K, V> Default for Trace<K, V> {
	fn default() -> Self {
		Self { checkpoints: Vec::new() }
	}
}

impl<K, V> Trace<K, V>
where
	K: Ord + Copy,
	V: Copy + Default,
{
	/// Appends `(key, value)`. Returns the previous latest value and the new one.
	pub fn push(&mut self, key: K, value: V) -> Result<(V, V), CheckpointError> {
		match self.checkpoints.last() {
			Some(last) if key <= last.key => Err(CheckpointError::OutOfOrderTimepoint),
			Some(last) => {
				let previous = last.value;
				self.checkpoints.push(Checkpoint { key, value });
				Ok((previous, value))
			},
			None => {
				self.checkpoints.push(Checkpoint { key, value });
				Ok((V::default(), value))
			},
		}
	}

	/// Value of the last checkpoint with key `<= key`, or the default if there is none.
	pub fn upper_lookup(&self, key: K) -> V {
		let pos = self.upper_binary_lookup(key, 0, self.checkpoints.len());
		self.value_before(pos)
	}

	/// Same as [`Self::upper_lookup`], tuned for keys close to the latest checkpoint.
	pub fn upper_lookup_recent(&self, key: K) -> V {
		let len = self.checkpoints.len();
		let mut low = 0;
		let mut high = len;

		if len > RECENT_PROBE_THRESHOLD {
			let mid = len - (len as u64).integer_sqrt() as usize;
			if key < self.checkpoints[mid].key {
				high = mid;
			} else {
				low = mid + 1;
			}
		}

		let pos = self.upper_binary_lookup(key, low, high);
		self.value_before(pos)
	}

	/// Latest stored value, or the default for an empty trace.
	pub fn latest(&self) -> V {
		self.checkpoints.last().map(|c| c.value).unwrap_or_default()
	}

	pub fn latest_checkpoint(&self) -> Option<(K, V)> {
		self.checkpoints.last().map(|c| (c.key, c.value))
	}

	pub fn len(&self) -> usize {
		self.checkpoints.len()
	}

	pub fn is_empty(&self) -> bool {
		self.checkpoints.is_empty()
	}

	/// Index of the first checkpoint in `[low, high)` whose key is strictly greater than `key`.
	fn upper_binary_lookup(&self, key: K, low: usize, high: usize) -> usize {
		low + self.checkpoints[low..high].partition_point(|c| c.key <= key)
	}

	fn value_before(&self, pos: usize) -> V {
		if pos == 0 {
			V::default()
		} else {
			self.checkpoints[pos - 1].value
		}
	}
}
