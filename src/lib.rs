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

// Symmetric sparse matrix assembly for FEHM .stor output.
//
// The matrix is built in memory from a stream of element contributions
// keyed by (row, column) node index, one ordered column list per row.
// Each stored position points at a shared, reference counted value record
// carrying `entry_size` components. With compression enabled, records that
// compare equal under a relative tolerance are shared across the whole
// matrix and serialized once.
//
// Assembly and extraction are split by type state:
//
// `SparseMatrix` accepts `set_entry` calls. `freeze` consumes it, assigns
// a stable 1-based `entry_num` to every unique record and returns a
// `FrozenMatrix`, from which the downstream writer pulls the flat arrays:
//
// - entries-per-row prefix: [neq+1, .., prefix[i-1] + count[i], ..]
// - occupied columns: row-major, column-ascending column indices
// - diagonal slots: 0-based offsets of the diagonal in the above
// - matrix pointers: `entry_num` of each position, same traversal
// - component values: one f64 per unique record per component
//
// Row and column indices are 1-based throughout, matching the grid node
// numbering of the callers; flat output arrays are 0-based.

mod error;
mod matrix;
mod options;
mod output;
mod skiplist;
mod values;

pub use error::{Error, Result};
pub use matrix::SparseMatrix;
pub use options::Options;
pub use output::{FrozenMatrix, MatrixSizes, NegativeCoefs, OccupiedColumns};
