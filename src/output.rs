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

// Extraction passes over a frozen matrix.
//
// All passes walk rows in ascending order and columns ascending within a
// row, the traversal order the downstream .stor writer assumes. Each pass
// returns an owned array; nothing here mutates the matrix, so every getter
// can be called any number of times and in any order.

use crate::error::{Error, Result};
use crate::matrix::RowEntry;
use crate::skiplist::SkipList;
use crate::values::ValueStore;

pub struct MatrixSizes {
	pub num_written_coefs: u64,
	pub ncon: u64,
	pub ncon_max: u64,
}

pub struct OccupiedColumns {
	/// Column index of every stored entry, row-major.
	pub columns: Vec<u64>,
	/// For each row, the 0-based slot in `columns` holding its diagonal.
	pub diagonals: Vec<u64>,
}

pub struct NegativeCoefs {
	pub num_neg: u64,
	pub num_suspect: u64,
	pub num_zero: u64,
	/// (row, column, negated value) triples for the suspect entries.
	pub rows: Vec<u64>,
	pub columns: Vec<u64>,
	pub values: Vec<f64>,
}

/// An assembled matrix after `freeze`: entry numbers are fixed and the
/// output arrays can be extracted.
pub struct FrozenMatrix {
	pub(crate) neq: u64,
	pub(crate) entry_size: usize,
	pub(crate) compression: bool,
	pub(crate) epsilon: f64,
	pub(crate) maxima: Vec<f64>,
	pub(crate) rows: Vec<SkipList<RowEntry>>,
	pub(crate) ncon_row: Vec<u64>,
	pub(crate) voronoi: Vec<f64>,
	pub(crate) values: ValueStore,
	pub(crate) ncon: u64,
	pub(crate) ncon_max: u64,
	pub(crate) num_written_coefs: u64,
}

impl FrozenMatrix {
	pub fn sizes(&self) -> MatrixSizes {
		MatrixSizes {
			num_written_coefs: self.num_written_coefs,
			ncon: self.ncon,
			ncon_max: self.ncon_max,
		}
	}

	/// Accumulated Voronoi volume per node, 0-based.
	pub fn voronoi_volumes(&self) -> &[f64] {
		&self.voronoi[..self.neq as usize]
	}

	/// Connection counts in prefix layout: slot 0 holds neq + 1 and slot i
	/// the 1-based inclusive upper bound of row i's slice, so the last
	/// slot is ncon + neq + 1. The downstream writer wants exactly this.
	pub fn entries_per_row(&self) -> Vec<u64> {
		let neq = self.neq as usize;
		let mut prefix = vec![0; neq + 1];
		prefix[0] = self.neq + 1;
		for i in 1..=neq {
			prefix[i] = self.ncon_row[i] + prefix[i - 1];
		}
		prefix
	}

	fn entries(&self) -> impl Iterator<Item = (u64, &RowEntry)> + '_ {
		self.rows
			.iter()
			.enumerate()
			.flat_map(|(index, list)| list.iter().map(move |entry| (index as u64 + 1, entry)))
	}

	pub fn occupied_columns(&self) -> OccupiedColumns {
		let mut columns = Vec::with_capacity(self.ncon as usize);
		let mut diagonals = vec![0; self.neq as usize];
		for (row, entry) in self.entries() {
			if entry.column == row {
				diagonals[(row - 1) as usize] = columns.len() as u64;
			}
			columns.push(entry.column);
		}
		OccupiedColumns { columns, diagonals }
	}

	/// The entry number of every stored position, row-major. Symmetric
	/// positions repeat the number of their shared record, pointing the
	/// writer at one slot of the value table.
	pub fn matrix_pointers(&self) -> Vec<u64> {
		self.entries()
			.map(|(_, entry)| self.values.get(entry.value).entry_num)
			.collect()
	}

	/// One value per unique record for the given component, ordered by
	/// entry number.
	pub fn component_values(&self, component: usize) -> Result<Vec<f64>> {
		self.check_component(component)?;
		let values = if self.compression {
			self.values.indexed().map(|record| record.value[component]).collect()
		} else {
			self.entries()
				.filter(|(row, entry)| entry.column >= *row)
				.map(|(_, entry)| self.values.get(entry.value).value[component])
				.collect()
		};
		Ok(values)
	}

	/// Count and extract positive off-diagonal coefficients, which the
	/// domain's sign convention calls negative. A positive value above
	/// tolerance is suspect; a value within tolerance of zero counts as
	/// zero, and still as negative when positive.
	pub fn negative_coefs(&self, component: usize) -> Result<NegativeCoefs> {
		self.check_component(component)?;
		let tolerance = self.maxima[component] * self.epsilon;
		let mut out = NegativeCoefs {
			num_neg: 0,
			num_suspect: 0,
			num_zero: 0,
			rows: Vec::new(),
			columns: Vec::new(),
			values: Vec::new(),
		};
		for (row, entry) in self.entries() {
			if entry.column <= row {
				continue;
			}
			let v = self.values.get(entry.value).value[component];
			if v.abs() > tolerance {
				if v > 0.0 {
					out.num_neg += 1;
					out.num_suspect += 1;
					out.rows.push(row);
					out.columns.push(entry.column);
					out.values.push(-v);
				}
			} else {
				out.num_zero += 1;
				if v > 0.0 {
					out.num_neg += 1;
				}
			}
		}
		Ok(out)
	}

	fn check_component(&self, component: usize) -> Result<()> {
		if component >= self.entry_size {
			return Err(Error::InvalidComponent { component, entry_size: self.entry_size });
		}
		Ok(())
	}
}
