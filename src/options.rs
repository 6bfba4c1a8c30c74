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

/// Matrix assembly parameters.
#[derive(Clone, Debug)]
pub struct Options {
	/// Matrix dimension. Node indices run 1..=neq.
	pub neq: u64,
	/// Number of scalar components carried by each matrix position.
	pub entry_size: usize,
	/// Share value records between positions with equal values.
	pub compression: bool,
	/// Relative tolerance for value equality and zero tests.
	pub epsilon: f64,
}

impl Options {
	pub fn new(neq: u64, entry_size: usize) -> Options {
		Options {
			neq,
			entry_size,
			compression: false,
			epsilon: 1e-8,
		}
	}

	pub fn with_compression(mut self, epsilon: f64) -> Options {
		self.compression = true;
		self.epsilon = epsilon;
		self
	}

	pub fn validate(&self) -> Result<()> {
		if self.neq < 1 {
			return Err(Error::InvalidConfiguration("Matrix dimension must be >= 1".into()));
		}
		if self.entry_size < 1 {
			return Err(Error::InvalidConfiguration("Matrix entry data size must be >= 1".into()));
		}
		if !(self.epsilon > 0.0) || !self.epsilon.is_finite() {
			return Err(Error::InvalidConfiguration("Epsilon must be positive and finite".into()));
		}
		Ok(())
	}
}
