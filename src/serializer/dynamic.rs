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

//! Runtime-typed serialization.
//!
//! The recommended entry point when the logical type is only known at
//! runtime: dispatch happens on the [`DataType`] descriptor, recursing
//! through container levels, and lands in the same writers the
//! statically-typed API uses, so both produce identical bytes.

use crate::common::bit::{self, WORD_SIZE};
use crate::common::buffer::RowBuffer;
use crate::data_type::{
    BooleanType, ByteType, DataType, DoubleType, FloatType, IntegerType, LongType, ScalarValue,
    ShortType, TimestampType,
};
use crate::errors::{RowError, RowResult};
use crate::serializer::{write_bytes_value, write_fixed, write_variable, SerializedSize, UnsafeRowSerializer};
use crate::vector::Vector;

pub struct UnsafeRowDynamicSerializer;

impl UnsafeRowDynamicSerializer {
    /// Serializes the value at `row` of `column` as described by `ty`,
    /// which may be arbitrarily nested.
    pub fn serialize(
        ty: &DataType,
        column: &Vector,
        buf: &mut RowBuffer<'_>,
        row: usize,
    ) -> RowResult<SerializedSize> {
        if row >= column.len() {
            return Err(RowError::IndexOutOfBounds {
                index: row,
                len: column.len(),
            });
        }
        if column.is_null(row) {
            return Ok(None);
        }
        if ty.is_fixed_width() {
            buf.ensure(WORD_SIZE)?;
            let out = buf.rest();
            out[..WORD_SIZE].fill(0);
            write_fixed(ty, column, row, out)?;
            buf.advance(WORD_SIZE);
            return Ok(Some(0));
        }
        let len = write_variable(ty, column, row, buf.rest())?;
        buf.advance(bit::round_up_to_8(len));
        Ok(Some(len))
    }

    /// Serializes a single runtime-typed scalar value.
    pub fn serialize_value(
        ty: &DataType,
        value: &ScalarValue<'_>,
        buf: &mut RowBuffer<'_>,
    ) -> RowResult<SerializedSize> {
        if ty.kind() != value.kind() {
            return Err(RowError::TypeMismatch {
                expected: ty.kind(),
                actual: value.kind(),
            });
        }
        match value {
            ScalarValue::Boolean(v) => {
                UnsafeRowSerializer::serialize_scalar::<BooleanType>(Some(*v), buf)
            }
            ScalarValue::Byte(v) => UnsafeRowSerializer::serialize_scalar::<ByteType>(Some(*v), buf),
            ScalarValue::Short(v) => {
                UnsafeRowSerializer::serialize_scalar::<ShortType>(Some(*v), buf)
            }
            ScalarValue::Integer(v) => {
                UnsafeRowSerializer::serialize_scalar::<IntegerType>(Some(*v), buf)
            }
            ScalarValue::Long(v) => UnsafeRowSerializer::serialize_scalar::<LongType>(Some(*v), buf),
            ScalarValue::Float(v) => {
                UnsafeRowSerializer::serialize_scalar::<FloatType>(Some(*v), buf)
            }
            ScalarValue::Double(v) => {
                UnsafeRowSerializer::serialize_scalar::<DoubleType>(Some(*v), buf)
            }
            ScalarValue::Timestamp(v) => {
                UnsafeRowSerializer::serialize_scalar::<TimestampType>(Some(*v), buf)
            }
            ScalarValue::String(s) => write_bytes_value(s.as_bytes(), buf),
            ScalarValue::Binary(b) => write_bytes_value(b, buf),
        }
    }
}
