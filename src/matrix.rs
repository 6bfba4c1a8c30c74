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

use crate::error::{Error, Result};
use crate::options::Options;
use crate::output::FrozenMatrix;
use crate::skiplist::SkipList;
use crate::values::{ValueId, ValueStore};

// Smallest magnitude the running maxima start from, so relative tolerances
// are defined before the first contribution arrives.
const MAXIMA_FLOOR: f64 = 1e-30;

pub(crate) struct RowEntry {
	pub column: u64,
	pub value: ValueId,
}

/// A symmetric sparse matrix under assembly.
///
/// Row and column indices are 1-based. Off-diagonal positions (i, j) and
/// (j, i) always share one value record; the diagonal is stored once.
/// `freeze` ends assembly and moves the matrix into its extraction form.
pub struct SparseMatrix {
	pub(crate) neq: u64,
	pub(crate) entry_size: usize,
	pub(crate) compression: bool,
	pub(crate) epsilon: f64,
	pub(crate) maxima: Vec<f64>,
	pub(crate) rows: Vec<SkipList<RowEntry>>,
	// Index 1..=neq holds per-row counts; slot 0 exists for the prefix
	// layout of the output array.
	pub(crate) ncon_row: Vec<u64>,
	pub(crate) voronoi: Vec<f64>,
	pub(crate) values: ValueStore,
}

impl SparseMatrix {
	pub fn new(options: &Options) -> Result<SparseMatrix> {
		options.validate()?;
		log::debug!(
			target: "stor-matrix",
			"New {0}x{0} matrix, entry size {1}, compression {2}, epsilon {3:e}",
			options.neq,
			options.entry_size,
			options.compression,
			options.epsilon,
		);
		Ok(SparseMatrix {
			neq: options.neq,
			entry_size: options.entry_size,
			compression: options.compression,
			epsilon: options.epsilon,
			maxima: vec![MAXIMA_FLOOR; options.entry_size],
			rows: (0..options.neq).map(|row| SkipList::new(row + 1)).collect(),
			ncon_row: vec![0; options.neq as usize + 1],
			voronoi: vec![0.0; options.neq as usize + 1],
			values: ValueStore::new(options.compression),
		})
	}

	fn check_index(&self, index: u64) -> Result<()> {
		if index < 1 || index > self.neq {
			return Err(Error::IndexOutOfRange { index, neq: self.neq });
		}
		Ok(())
	}

	// Every component within relative tolerance of zero.
	fn zero_vector(&self, value: &[f64]) -> bool {
		value
			.iter()
			.zip(&self.maxima)
			.all(|(&v, &max)| v.abs() <= max * self.epsilon)
	}

	pub fn entry_exists(&self, i: u64, j: u64) -> Result<bool> {
		self.check_index(i)?;
		self.check_index(j)?;
		let row = &self.rows[(j - 1) as usize];
		Ok(row.search(|entry| entry.column.cmp(&i)).is_some())
	}

	/// Record a contribution for positions (i, j) and (j, i).
	///
	/// `vol_contrib` is accumulated on both nodes' Voronoi volumes; on the
	/// diagonal it therefore lands twice, which callers rely on. A fresh
	/// off-diagonal whose value is within tolerance of the zero vector is
	/// not stored; a repeated position replaces the shared record on both
	/// sides whatever the new value.
	pub fn set_entry(&mut self, i: u64, j: u64, vol_contrib: f64, value: &[f64]) -> Result<()> {
		self.check_index(i)?;
		self.check_index(j)?;
		if value.len() != self.entry_size {
			return Err(Error::InvalidValueSize { len: value.len(), entry_size: self.entry_size });
		}

		self.voronoi[(i - 1) as usize] += vol_contrib;
		self.voronoi[(j - 1) as usize] += vol_contrib;

		for (max, &v) in self.maxima.iter_mut().zip(value) {
			if v.abs() > *max {
				*max = v.abs();
			}
		}

		let existing = self.rows[(j - 1) as usize]
			.search(|entry| entry.column.cmp(&i))
			.map(|entry| entry.value);

		if let Some(old) = existing {
			self.values.release(old, &self.maxima, self.epsilon);
			if i != j {
				self.values.release(old, &self.maxima, self.epsilon);
			}
			let id = self.values.acquire(value, &self.maxima, self.epsilon);
			if let Some(entry) = self.rows[(j - 1) as usize].search_mut(|entry| entry.column.cmp(&i)) {
				entry.value = id;
			}
			if i != j {
				self.values.retain(id);
				if let Some(entry) = self.rows[(i - 1) as usize].search_mut(|entry| entry.column.cmp(&j)) {
					entry.value = id;
				}
			}
		} else if i != j {
			if !self.zero_vector(value) {
				self.ncon_row[i as usize] += 1;
				self.ncon_row[j as usize] += 1;
				let id = self.values.acquire(value, &self.maxima, self.epsilon);
				self.values.retain(id);
				self.rows[(j - 1) as usize]
					.insert(RowEntry { column: i, value: id }, |a, b| a.column.cmp(&b.column));
				self.rows[(i - 1) as usize]
					.insert(RowEntry { column: j, value: id }, |a, b| a.column.cmp(&b.column));
			}
		} else {
			self.ncon_row[i as usize] += 1;
			let id = self.values.acquire(value, &self.maxima, self.epsilon);
			self.rows[(i - 1) as usize]
				.insert(RowEntry { column: i, value: id }, |a, b| a.column.cmp(&b.column));
		}
		Ok(())
	}

	/// Install a zero-valued placeholder on every diagonal position, so
	/// each row has a diagonal slot in the output. Positions already set
	/// are replaced like any other entry.
	pub fn set_diagonal_entries(&mut self) -> Result<()> {
		let zeros = vec![0.0; self.entry_size];
		for i in 1..=self.neq {
			self.set_entry(i, i, 0.0, &zeros)?;
		}
		Ok(())
	}

	/// End assembly. Totals the connection counts and hands every unique
	/// value record its 1-based serialization number: in value order when
	/// compression is on, otherwise row-major over the upper triangle.
	pub fn freeze(mut self) -> FrozenMatrix {
		let mut ncon = 0;
		let mut ncon_max = 0;
		for i in 1..=self.neq as usize {
			let count = self.ncon_row[i];
			debug_assert_eq!(count as usize, self.rows[i - 1].len());
			ncon += count;
			if count > ncon_max {
				ncon_max = count;
			}
		}

		let num_written_coefs = if self.compression {
			self.values.assign_indexed()
		} else {
			let SparseMatrix { ref rows, ref mut values, .. } = self;
			let mut next = 1;
			for (index, list) in rows.iter().enumerate() {
				let row = index as u64 + 1;
				for entry in list.iter() {
					if entry.column >= row {
						values.set_entry_num(entry.value, next);
						next += 1;
					}
				}
			}
			next - 1
		};
		// Every live record is serialized exactly once.
		debug_assert_eq!(num_written_coefs as usize, self.values.len());

		log::debug!(
			target: "stor-matrix",
			"Froze matrix: {} connections, {} max per row, {} unique coefficients",
			ncon,
			ncon_max,
			num_written_coefs,
		);

		FrozenMatrix {
			neq: self.neq,
			entry_size: self.entry_size,
			compression: self.compression,
			epsilon: self.epsilon,
			maxima: self.maxima,
			rows: self.rows,
			ncon_row: self.ncon_row,
			voronoi: self.voronoi,
			values: self.values,
			ncon,
			ncon_max,
			num_written_coefs,
		}
	}
}
