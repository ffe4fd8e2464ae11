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

//! Statically-typed UnsafeRow writers.
//!
//! # UnsafeRow format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Null bitset: ((num_fields + 63) / 64) * 8 bytes             │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Fixed-width portion: 8 bytes per field                      │
//! │ - Primitives: value stored directly (in lowest bytes)      │
//! │ - Variable-length: (offset << 32) | length                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Variable-length data: 8-byte aligned                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Arrays serialize as a count word, a null bitset, and either packed
//! elements (fixed-width) or an offset table plus payloads (variable-width).
//! Maps serialize as a keys-block-size word followed by the keys and values
//! arrays. All interior offsets are relative to the enclosing container's
//! first byte; every container's total size is a multiple of 8.

pub mod dynamic;

use crate::common::bit::{self, WORD_SIZE};
use crate::common::buffer::RowBuffer;
use crate::data_type::{
    BooleanType, ByteType, DataType, DoubleType, FixedWidthType, FloatType, IntegerType, LongType,
    ShortType, TimestampType, TypeKind, TypeTrait,
};
use crate::errors::{RowError, RowResult};
use crate::vector::Vector;
use std::marker::PhantomData;

/// Outcome of a serialize call: `Some(n)` with the logical byte count when a
/// value was written, `None` when the value was null and nothing was
/// emitted. Fixed-width leaves report 0 (the value lives in the caller's
/// slot, not the variable region); variable-length leaves report their
/// unpadded length; containers report their padded total.
pub type SerializedSize = Option<usize>;

pub struct UnsafeRowSerializer;

impl UnsafeRowSerializer {
    /// Serializes a single fixed-width value into an 8-byte slot at the
    /// cursor. `None` leaves the buffer untouched.
    pub fn serialize_scalar<T: FixedWidthType>(
        value: Option<T::Native>,
        buf: &mut RowBuffer<'_>,
    ) -> RowResult<SerializedSize> {
        let Some(value) = value else {
            return Ok(None);
        };
        buf.ensure(WORD_SIZE)?;
        let out = buf.rest();
        out[..WORD_SIZE].fill(0);
        T::put(value, out);
        buf.advance(WORD_SIZE);
        Ok(Some(0))
    }

    /// Serializes the value at `row` of `column`, with the type chosen
    /// statically: a leaf type token, or [`ArrayOf`]/[`MapOf`] compositions
    /// for nested data.
    pub fn serialize_from_column<T: ColumnSer>(
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
        T::serialize_at(column, buf, row)
    }
}

/// A type token that knows how to serialize one row of a column of its type.
pub trait ColumnSer: TypeTrait {
    fn serialize_at(
        column: &Vector,
        buf: &mut RowBuffer<'_>,
        row: usize,
    ) -> RowResult<SerializedSize>;
}

macro_rules! fixed_column_ser {
    ($($name:ident),*) => {
        $(
        impl ColumnSer for $name {
            fn serialize_at(
                column: &Vector,
                buf: &mut RowBuffer<'_>,
                row: usize,
            ) -> RowResult<SerializedSize> {
                if column.is_null(row) {
                    return Ok(None);
                }
                let value = column.fixed_at::<$name>(row)?;
                UnsafeRowSerializer::serialize_scalar::<$name>(Some(value), buf)
            }
        }
        )*
    };
}

fixed_column_ser!(
    BooleanType,
    ByteType,
    ShortType,
    IntegerType,
    LongType,
    FloatType,
    DoubleType,
    TimestampType
);

macro_rules! bytes_column_ser {
    ($($name:ident),*) => {
        $(
        impl ColumnSer for crate::data_type::$name {
            fn serialize_at(
                column: &Vector,
                buf: &mut RowBuffer<'_>,
                row: usize,
            ) -> RowResult<SerializedSize> {
                if column.is_null(row) {
                    return Ok(None);
                }
                write_bytes_value(column.bytes_at(row)?, buf)
            }
        }
        )*
    };
}

bytes_column_ser!(StringType, BinaryType);

/// Type token for `Array(T)` columns, mirroring the element token nesting of
/// the descriptor, e.g. `ArrayOf<ArrayOf<ByteType>>`.
pub struct ArrayOf<T: ColumnSer>(PhantomData<T>);

impl<T: ColumnSer> TypeTrait for ArrayOf<T> {
    fn type_kind() -> TypeKind {
        TypeKind::Array
    }

    fn data_type() -> DataType {
        DataType::Array(Box::new(T::data_type()))
    }
}

impl<T: ColumnSer> ColumnSer for ArrayOf<T> {
    fn serialize_at(
        column: &Vector,
        buf: &mut RowBuffer<'_>,
        row: usize,
    ) -> RowResult<SerializedSize> {
        if column.is_null(row) {
            return Ok(None);
        }
        let element_type = match column.data_type() {
            DataType::Array(element) => element.as_ref(),
            other => {
                return Err(RowError::TypeMismatch {
                    expected: TypeKind::Array,
                    actual: other.kind(),
                })
            }
        };
        let slice = column.array_at(row)?;
        let total = write_array(element_type, slice.elements, slice.offset, slice.len, buf.rest())?;
        buf.advance(total);
        Ok(Some(total))
    }
}

/// Type token for `Map(K, V)` columns.
pub struct MapOf<K: ColumnSer, V: ColumnSer>(PhantomData<(K, V)>);

impl<K: ColumnSer, V: ColumnSer> TypeTrait for MapOf<K, V> {
    fn type_kind() -> TypeKind {
        TypeKind::Map
    }

    fn data_type() -> DataType {
        DataType::Map(Box::new(K::data_type()), Box::new(V::data_type()))
    }
}

impl<K: ColumnSer, V: ColumnSer> ColumnSer for MapOf<K, V> {
    fn serialize_at(
        column: &Vector,
        buf: &mut RowBuffer<'_>,
        row: usize,
    ) -> RowResult<SerializedSize> {
        if column.is_null(row) {
            return Ok(None);
        }
        let (key_type, value_type) = match column.data_type() {
            DataType::Map(key, value) => (key.as_ref(), value.as_ref()),
            other => {
                return Err(RowError::TypeMismatch {
                    expected: TypeKind::Map,
                    actual: other.kind(),
                })
            }
        };
        let slice = column.map_at(row)?;
        let total = write_map(
            key_type,
            value_type,
            slice.keys,
            slice.values,
            slice.offset,
            slice.len,
            buf.rest(),
        )?;
        buf.advance(total);
        Ok(Some(total))
    }
}

/// Field-token list for [`RowOf`]: a tuple of [`ColumnSer`] tokens, one per
/// row field in declaration order.
pub trait FieldList: 'static {
    fn field_types() -> Vec<DataType>;
}

macro_rules! impl_field_list {
    ($($field:ident),+) => {
        impl<$($field: ColumnSer),+> FieldList for ($($field,)+) {
            fn field_types() -> Vec<DataType> {
                vec![$($field::data_type()),+]
            }
        }
    };
}

impl_field_list!(A);
impl_field_list!(A, B);
impl_field_list!(A, B, C);
impl_field_list!(A, B, C, D);
impl_field_list!(A, B, C, D, E);
impl_field_list!(A, B, C, D, E, F);
impl_field_list!(A, B, C, D, E, F, G);
impl_field_list!(A, B, C, D, E, F, G, H);

/// Type token for `Row(T₁..Tₙ)` columns; the field tokens are given as a
/// tuple, e.g. `RowOf<(LongType, StringType)>`. Composes with the other
/// tokens, so `ArrayOf<RowOf<(ShortType, StringType)>>` serializes an array
/// of rows.
pub struct RowOf<F: FieldList>(PhantomData<F>);

impl<F: FieldList> TypeTrait for RowOf<F> {
    fn type_kind() -> TypeKind {
        TypeKind::Row
    }

    fn data_type() -> DataType {
        DataType::Row(F::field_types())
    }
}

impl<F: FieldList> ColumnSer for RowOf<F> {
    fn serialize_at(
        column: &Vector,
        buf: &mut RowBuffer<'_>,
        row: usize,
    ) -> RowResult<SerializedSize> {
        if column.is_null(row) {
            return Ok(None);
        }
        let fields = match column.data_type() {
            DataType::Row(fields) => fields,
            other => {
                return Err(RowError::TypeMismatch {
                    expected: TypeKind::Row,
                    actual: other.kind(),
                })
            }
        };
        let total = write_row(fields, column, row, buf.rest())?;
        buf.advance(total);
        Ok(Some(total))
    }
}

fn require(out: &[u8], need: usize) -> RowResult<()> {
    if out.len() < need {
        return Err(RowError::BufferTooSmall {
            need,
            have: out.len(),
        });
    }
    Ok(())
}

/// Emits a raw byte payload at the cursor and advances past the alignment
/// padding; the reported length stays unpadded.
pub(crate) fn write_bytes_value(
    bytes: &[u8],
    buf: &mut RowBuffer<'_>,
) -> RowResult<SerializedSize> {
    let len = write_bytes(bytes, buf.rest())?;
    buf.advance(bit::round_up_to_8(len));
    Ok(Some(len))
}

/// Emits a raw byte payload at `out[0]`, zeroing the alignment padding.
/// Returns the logical length; the caller advances by the padded length.
fn write_bytes(bytes: &[u8], out: &mut [u8]) -> RowResult<usize> {
    let len = bytes.len();
    let padded = bit::round_up_to_8(len);
    require(out, padded)?;
    out[..len].copy_from_slice(bytes);
    out[len..padded].fill(0);
    Ok(len)
}

/// Writes the value at `row` of `column` (known non-null) into the low bytes
/// of the slot at `out[0]`. The caller has zeroed the slot.
pub(crate) fn write_fixed(
    ty: &DataType,
    column: &Vector,
    row: usize,
    out: &mut [u8],
) -> RowResult<()> {
    match ty {
        DataType::Boolean => BooleanType::put(column.fixed_at::<BooleanType>(row)?, out),
        DataType::Byte => ByteType::put(column.fixed_at::<ByteType>(row)?, out),
        DataType::Short => ShortType::put(column.fixed_at::<ShortType>(row)?, out),
        DataType::Integer => IntegerType::put(column.fixed_at::<IntegerType>(row)?, out),
        DataType::Long => LongType::put(column.fixed_at::<LongType>(row)?, out),
        DataType::Float => FloatType::put(column.fixed_at::<FloatType>(row)?, out),
        DataType::Double => DoubleType::put(column.fixed_at::<DoubleType>(row)?, out),
        DataType::Timestamp => TimestampType::put(column.fixed_at::<TimestampType>(row)?, out),
        _ => {
            return Err(RowError::Internal(format!(
                "variable-length type {ty:?} in a fixed-width slot"
            )))
        }
    }
    Ok(())
}

/// Writes the variable-length value at `row` of `column` (known non-null) at
/// `out[0]`, which becomes the value's container-relative position. Returns
/// the logical length: unpadded for strings and binary, the padded total for
/// arrays, maps, and rows.
pub(crate) fn write_variable(
    ty: &DataType,
    column: &Vector,
    row: usize,
    out: &mut [u8],
) -> RowResult<usize> {
    match ty {
        DataType::String | DataType::Binary => write_bytes(column.bytes_at(row)?, out),
        DataType::Array(element) => {
            let slice = column.array_at(row)?;
            write_array(element, slice.elements, slice.offset, slice.len, out)
        }
        DataType::Map(key, value) => {
            let slice = column.map_at(row)?;
            write_map(
                key,
                value,
                slice.keys,
                slice.values,
                slice.offset,
                slice.len,
                out,
            )
        }
        DataType::Row(fields) => write_row(fields, column, row, out),
        _ => Err(RowError::Internal(format!(
            "fixed-width type {ty:?} in a variable-length position"
        ))),
    }
}

/// Writes the array sub-format for `num` elements starting at `start` of
/// `elements`. `out[0]` is the array base all interior offsets are measured
/// from. Returns the padded total size.
pub(crate) fn write_array(
    element_type: &DataType,
    elements: &Vector,
    start: usize,
    num: usize,
    out: &mut [u8],
) -> RowResult<usize> {
    let bitset_width = bit::nulls_bitset_width(num);
    let header = WORD_SIZE + bitset_width;

    if let Some(width) = element_type.fixed_width() {
        // Fixed-width elements pack back-to-back at their natural width;
        // null slots stay zero and are marked only in the bitset.
        let total = header + bit::round_up_to_8(num * width);
        require(out, total)?;
        out[..total].fill(0);
        bit::write_word(out, 0, num as u64);
        for i in 0..num {
            let idx = start + i;
            if elements.is_null(idx) {
                bit::set_bit(&mut out[WORD_SIZE..], i);
            } else {
                write_fixed(element_type, elements, idx, &mut out[header + i * width..])?;
            }
        }
        return Ok(total);
    }

    // Variable-width elements: an offset table of one header word per
    // element, then the concatenated payloads. Null elements keep an
    // all-zero header word.
    let table_end = header + num * WORD_SIZE;
    require(out, table_end)?;
    out[..table_end].fill(0);
    bit::write_word(out, 0, num as u64);
    let mut cursor = table_end;
    for i in 0..num {
        let idx = start + i;
        if elements.is_null(idx) {
            bit::set_bit(&mut out[WORD_SIZE..], i);
            continue;
        }
        let len = write_variable(element_type, elements, idx, &mut out[cursor..])?;
        let slot = header + i * WORD_SIZE;
        bit::write_word(out, slot, bit::offset_and_len(cursor, len));
        cursor += bit::round_up_to_8(len);
    }
    Ok(cursor)
}

/// Writes the map sub-format: a keys-block-size word, then the keys and
/// values arrays, each with offsets relative to its own base. Returns the
/// padded total size.
#[allow(clippy::too_many_arguments)]
pub(crate) fn write_map(
    key_type: &DataType,
    value_type: &DataType,
    keys: &Vector,
    values: &Vector,
    start: usize,
    num: usize,
    out: &mut [u8],
) -> RowResult<usize> {
    if log::log_enabled!(log::Level::Debug) {
        let null_keys = (0..num).filter(|i| keys.is_null(start + i)).count();
        if null_keys > 0 {
            log::debug!("map entry has {null_keys} null keys; bitmap passed through");
        }
    }
    require(out, WORD_SIZE)?;
    let keys_size = write_array(key_type, keys, start, num, &mut out[WORD_SIZE..])?;
    bit::write_word(out, 0, keys_size as u64);
    let values_size = write_array(value_type, values, start, num, &mut out[WORD_SIZE + keys_size..])?;
    Ok(WORD_SIZE + keys_size + values_size)
}

/// Writes the row format at `out[0]`: null bitset, 8-byte field slots, then
/// the variable-length region. Returns the padded total size.
pub(crate) fn write_row(
    fields: &[DataType],
    column: &Vector,
    row: usize,
    out: &mut [u8],
) -> RowResult<usize> {
    let (row_idx, children) = column.row_at(row)?;
    if children.len() != fields.len() {
        return Err(RowError::Internal(format!(
            "row descriptor has {} fields but column has {} children",
            fields.len(),
            children.len()
        )));
    }

    let bitset_width = bit::nulls_bitset_width(fields.len());
    let fixed_end = bitset_width + fields.len() * WORD_SIZE;
    require(out, fixed_end)?;
    out[..fixed_end].fill(0);

    let mut cursor = fixed_end;
    for (i, (ty, child)) in fields.iter().zip(children).enumerate() {
        if child.is_null(row_idx) {
            bit::set_bit(out, i);
            continue;
        }
        let slot = bitset_width + i * WORD_SIZE;
        if ty.is_fixed_width() {
            write_fixed(ty, child, row_idx, &mut out[slot..])?;
        } else {
            let len = write_variable(ty, child, row_idx, &mut out[cursor..])?;
            bit::write_word(out, slot, bit::offset_and_len(cursor, len));
            cursor += bit::round_up_to_8(len);
        }
    }
    Ok(cursor)
}
