// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Serialization of columnar data into Spark's UnsafeRow binary format.
//!
//! UnsafeRow is the compact, word-aligned, self-contained row encoding Spark
//! uses for shuffle and broadcast. This crate converts columnar vectors
//! (flat, constant, dictionary, or lazily materialized) into that wire
//! layout, byte for byte: null bitsets, 8-byte field slots, and 8-byte
//! aligned variable-length regions with container-relative offsets.
//!
//! The output buffer is caller-owned; the serializer writes through a
//! [`common::buffer::RowBuffer`] cursor and never allocates output memory.
//! Use [`serializer::UnsafeRowSerializer`] when the schema is known at
//! compile time and [`serializer::dynamic::UnsafeRowDynamicSerializer`] when
//! it is only known at runtime; both produce identical bytes.
//!
//! ```
//! use spark_row::data_type::{LongType, StringType};
//! use spark_row::serializer::RowOf;
//! use spark_row::{DataType, RowBuffer, UnsafeRowDynamicSerializer, UnsafeRowSerializer, Vector};
//!
//! let rows = Vector::row(
//!     None,
//!     vec![
//!         Vector::flat::<LongType>(vec![Some(42)]),
//!         Vector::strings(vec![Some("payload")]),
//!     ],
//! );
//!
//! // Statically-typed: the schema is spelled in type tokens.
//! // Null bitset word, two field slots, then the padded payload.
//! let mut static_storage = [0u8; 64];
//! let mut buf = RowBuffer::new(&mut static_storage);
//! let size = UnsafeRowSerializer::serialize_from_column::<RowOf<(LongType, StringType)>>(
//!     &rows, &mut buf, 0,
//! )
//! .unwrap();
//! assert_eq!(size, Some(32));
//! drop(buf);
//!
//! // Runtime-typed: same writers, identical bytes.
//! let ty = DataType::Row(vec![DataType::Long, DataType::String]);
//! let mut dynamic_storage = [0u8; 64];
//! let mut buf = RowBuffer::new(&mut dynamic_storage);
//! assert_eq!(
//!     UnsafeRowDynamicSerializer::serialize(&ty, &rows, &mut buf, 0).unwrap(),
//!     size,
//! );
//! drop(buf);
//! assert_eq!(static_storage, dynamic_storage);
//! ```

pub mod common;
pub mod data_type;
pub mod errors;
pub mod serializer;
pub mod vector;

pub use common::buffer::RowBuffer;
pub use data_type::{DataType, ScalarValue, Timestamp, TypeKind};
pub use errors::{RowError, RowResult};
pub use serializer::dynamic::UnsafeRowDynamicSerializer;
pub use serializer::{SerializedSize, UnsafeRowSerializer};
pub use vector::Vector;
