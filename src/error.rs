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

#[derive(Debug, PartialEq)]
pub enum Error {
	InvalidConfiguration(String),
	IndexOutOfRange { index: u64, neq: u64 },
	InvalidValueSize { len: usize, entry_size: usize },
	InvalidComponent { component: usize, entry_size: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::InvalidConfiguration(info) => write!(f, "Invalid configuration: {}", info),
			Error::IndexOutOfRange { index, neq } =>
				write!(f, "Node index {} out of range 1..={}", index, neq),
			Error::InvalidValueSize { len, entry_size } =>
				write!(f, "Value has {} components, matrix entry size is {}", len, entry_size),
			Error::InvalidComponent { component, entry_size } =>
				write!(f, "Component {} out of range, matrix entry size is {}", component, entry_size),
		}
	}
}

impl std::error::Error for Error {}
