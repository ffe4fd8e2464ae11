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

//! Columnar input vectors and the read adapter the writers consume.
//!
//! A [`Vector`] is a read-only column in one of four encodings:
//!
//! - **Flat**: one stored value per row plus an optional null bitmap.
//! - **Constant**: a single value standing for every row.
//! - **Dictionary**: indices into a values vector, with optional nulls of
//!   their own.
//! - **Lazy**: a deferred vector, materialized in full on first access and
//!   memoized.
//!
//! Encodings nest arbitrarily. The accessors below resolve the encoding
//! stack, so the writers see only flat storage and never care how a column
//! is encoded.

use crate::common::bit;
use crate::data_type::{DataType, FixedWidthType, Timestamp, TypeKind};
use crate::errors::{RowError, RowResult};
use once_cell::sync::OnceCell;

pub enum Vector {
    Flat(FlatVector),
    Constant(ConstantVector),
    Dictionary(DictionaryVector),
    Lazy(Box<LazyVector>),
}

/// Per-row storage of a flat vector, one variant per leaf kind plus the
/// three container shapes.
pub enum VectorData {
    Boolean(Vec<bool>),
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Integer(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Timestamp(Vec<Timestamp>),
    /// Payloads for both `String` and `Binary` columns.
    Bytes(Vec<Vec<u8>>),
    Array {
        offsets: Vec<usize>,
        lengths: Vec<usize>,
        elements: Box<Vector>,
    },
    Map {
        offsets: Vec<usize>,
        lengths: Vec<usize>,
        keys: Box<Vector>,
        values: Box<Vector>,
    },
    /// One child vector per field, all indexed by the outer row index.
    Row(Vec<Vector>),
}

pub struct FlatVector {
    data_type: DataType,
    len: usize,
    /// Bit set means the row is null.
    nulls: Option<Vec<u8>>,
    data: VectorData,
}

impl FlatVector {
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub(crate) fn data(&self) -> &VectorData {
        &self.data
    }

    fn is_null(&self, idx: usize) -> bool {
        match &self.nulls {
            Some(bits) => bit::get_bit(bits, idx),
            None => false,
        }
    }
}

pub struct ConstantVector {
    len: usize,
    /// A single-row vector holding the repeated value.
    value: Box<Vector>,
}

pub struct DictionaryVector {
    /// Nulls added by the dictionary layer itself, on top of any nulls in
    /// the values vector.
    nulls: Option<Vec<u8>>,
    indices: Vec<usize>,
    values: Box<Vector>,
}

pub struct LazyVector {
    data_type: DataType,
    len: usize,
    loader: Box<dyn Fn() -> Vector + Send + Sync>,
    loaded: OnceCell<Box<Vector>>,
}

impl LazyVector {
    fn force(&self) -> &Vector {
        self.loaded.get_or_init(|| {
            log::trace!("materializing lazy vector of {} rows", self.len);
            let vector = (self.loader)();
            debug_assert_eq!(vector.data_type(), &self.data_type);
            debug_assert_eq!(vector.len(), self.len);
            Box::new(vector)
        })
    }
}

/// One row of an array column: a range of the shared elements vector.
pub struct ArraySlice<'a> {
    pub offset: usize,
    pub len: usize,
    pub elements: &'a Vector,
}

/// One row of a map column: a range shared by the keys and values vectors.
pub struct MapSlice<'a> {
    pub offset: usize,
    pub len: usize,
    pub keys: &'a Vector,
    pub values: &'a Vector,
}

impl Vector {
    pub fn len(&self) -> usize {
        match self {
            Vector::Flat(flat) => flat.len,
            Vector::Constant(constant) => constant.len,
            Vector::Dictionary(dictionary) => dictionary.indices.len(),
            Vector::Lazy(lazy) => lazy.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> &DataType {
        match self {
            Vector::Flat(flat) => &flat.data_type,
            Vector::Constant(constant) => constant.value.data_type(),
            Vector::Dictionary(dictionary) => dictionary.values.data_type(),
            Vector::Lazy(lazy) => &lazy.data_type,
        }
    }

    /// Whether the row at `idx` is null, resolved through the encoding
    /// stack. Must be consulted before any value accessor.
    pub fn is_null(&self, idx: usize) -> bool {
        match self {
            Vector::Flat(flat) => flat.is_null(idx),
            Vector::Constant(constant) => constant.value.is_null(0),
            Vector::Dictionary(dictionary) => {
                if let Some(bits) = &dictionary.nulls {
                    if bit::get_bit(bits, idx) {
                        return true;
                    }
                }
                dictionary.values.is_null(dictionary.indices[idx])
            }
            Vector::Lazy(lazy) => lazy.force().is_null(idx),
        }
    }

    /// Resolves the encoding stack for row `idx` down to flat storage and
    /// the storage index the row maps to.
    pub(crate) fn decoded(&self, idx: usize) -> (&FlatVector, usize) {
        match self {
            Vector::Flat(flat) => (flat, idx),
            Vector::Constant(constant) => constant.value.decoded(0),
            Vector::Dictionary(dictionary) => {
                dictionary.values.decoded(dictionary.indices[idx])
            }
            Vector::Lazy(lazy) => lazy.force().decoded(idx),
        }
    }

    /// Loads a fixed-width value. The row must not be null.
    pub fn fixed_at<T: FixedWidthType>(&self, idx: usize) -> RowResult<T::Native> {
        let (flat, idx) = self.decoded(idx);
        T::get(flat, idx)
    }

    /// Loads a string or binary payload. The returned slice stays valid for
    /// the duration of the serialize call; its length is the value's logical
    /// length.
    pub fn bytes_at(&self, idx: usize) -> RowResult<&[u8]> {
        let (flat, idx) = self.decoded(idx);
        match flat.data() {
            VectorData::Bytes(values) => Ok(&values[idx]),
            _ => Err(self.mismatch(TypeKind::String)),
        }
    }

    pub fn array_at(&self, idx: usize) -> RowResult<ArraySlice<'_>> {
        let (flat, idx) = self.decoded(idx);
        match flat.data() {
            VectorData::Array {
                offsets,
                lengths,
                elements,
            } => Ok(ArraySlice {
                offset: offsets[idx],
                len: lengths[idx],
                elements,
            }),
            _ => Err(self.mismatch(TypeKind::Array)),
        }
    }

    pub fn map_at(&self, idx: usize) -> RowResult<MapSlice<'_>> {
        let (flat, idx) = self.decoded(idx);
        match flat.data() {
            VectorData::Map {
                offsets,
                lengths,
                keys,
                values,
            } => Ok(MapSlice {
                offset: offsets[idx],
                len: lengths[idx],
                keys,
                values,
            }),
            _ => Err(self.mismatch(TypeKind::Map)),
        }
    }

    /// Resolves a row-typed vector: the storage row index plus the child
    /// vectors, each indexed by that row index.
    pub fn row_at(&self, idx: usize) -> RowResult<(usize, &[Vector])> {
        let (flat, idx) = self.decoded(idx);
        match flat.data() {
            VectorData::Row(children) => Ok((idx, children)),
            _ => Err(self.mismatch(TypeKind::Row)),
        }
    }

    fn mismatch(&self, expected: TypeKind) -> RowError {
        RowError::TypeMismatch {
            expected,
            actual: self.data_type().kind(),
        }
    }
}

/// Constructors. Inputs are immutable once built; the serializer only ever
/// reads them.
impl Vector {
    /// A flat vector of fixed-width values, null where `None`.
    pub fn flat<T: FixedWidthType>(values: Vec<Option<T::Native>>) -> Vector {
        let len = values.len();
        let nulls = bitmap_from_options(&values);
        let plain = values
            .into_iter()
            .map(|value| value.unwrap_or_default())
            .collect();
        Vector::Flat(FlatVector {
            data_type: T::data_type(),
            len,
            nulls,
            data: T::storage(plain),
        })
    }

    pub fn strings(values: Vec<Option<&str>>) -> Vector {
        let len = values.len();
        let nulls = bitmap_from_options(&values);
        let payloads = values
            .into_iter()
            .map(|value| value.map(|s| s.as_bytes().to_vec()).unwrap_or_default())
            .collect();
        Vector::Flat(FlatVector {
            data_type: DataType::String,
            len,
            nulls,
            data: VectorData::Bytes(payloads),
        })
    }

    pub fn binary(values: Vec<Option<&[u8]>>) -> Vector {
        let len = values.len();
        let nulls = bitmap_from_options(&values);
        let payloads = values
            .into_iter()
            .map(|value| value.map(<[u8]>::to_vec).unwrap_or_default())
            .collect();
        Vector::Flat(FlatVector {
            data_type: DataType::Binary,
            len,
            nulls,
            data: VectorData::Bytes(payloads),
        })
    }

    /// An array vector whose row `i` covers `elements[offsets[i]..offsets[i]
    /// + lengths[i]]`.
    pub fn array(
        offsets: Vec<usize>,
        lengths: Vec<usize>,
        nulls: Option<Vec<bool>>,
        elements: Vector,
    ) -> Vector {
        assert_eq!(offsets.len(), lengths.len());
        let len = offsets.len();
        Vector::Flat(FlatVector {
            data_type: DataType::Array(Box::new(elements.data_type().clone())),
            len,
            nulls: nulls.as_deref().and_then(bitmap_from_bools),
            data: VectorData::Array {
                offsets,
                lengths,
                elements: Box::new(elements),
            },
        })
    }

    /// A map vector; keys and values share `offsets`/`lengths` and element
    /// ordering. Entries are not reordered, deduplicated, or checked for
    /// unique keys.
    pub fn map(
        offsets: Vec<usize>,
        lengths: Vec<usize>,
        nulls: Option<Vec<bool>>,
        keys: Vector,
        values: Vector,
    ) -> Vector {
        assert_eq!(offsets.len(), lengths.len());
        let len = offsets.len();
        Vector::Flat(FlatVector {
            data_type: DataType::Map(
                Box::new(keys.data_type().clone()),
                Box::new(values.data_type().clone()),
            ),
            len,
            nulls: nulls.as_deref().and_then(bitmap_from_bools),
            data: VectorData::Map {
                offsets,
                lengths,
                keys: Box::new(keys),
                values: Box::new(values),
            },
        })
    }

    /// A row vector over child vectors of equal length.
    pub fn row(nulls: Option<Vec<bool>>, children: Vec<Vector>) -> Vector {
        assert!(!children.is_empty(), "row vector requires at least one child");
        let len = children[0].len();
        debug_assert!(children.iter().all(|child| child.len() == len));
        Vector::Flat(FlatVector {
            data_type: DataType::Row(
                children.iter().map(|c| c.data_type().clone()).collect(),
            ),
            len,
            nulls: nulls.as_deref().and_then(bitmap_from_bools),
            data: VectorData::Row(children),
        })
    }

    /// A constant vector repeating the single row of `value` `len` times.
    pub fn constant(len: usize, value: Vector) -> Vector {
        assert_eq!(value.len(), 1, "constant vector wraps a single-row vector");
        Vector::Constant(ConstantVector {
            len,
            value: Box::new(value),
        })
    }

    /// A constant vector that is null at every row.
    pub fn constant_null(data_type: DataType, len: usize) -> Vector {
        Vector::Constant(ConstantVector {
            len,
            value: Box::new(null_row(data_type)),
        })
    }

    pub fn dictionary(indices: Vec<usize>, values: Vector) -> Vector {
        Vector::Dictionary(DictionaryVector {
            nulls: None,
            indices,
            values: Box::new(values),
        })
    }

    /// A dictionary vector with nulls of its own; the index of a null row is
    /// never consulted.
    pub fn dictionary_with_nulls(
        nulls: Vec<bool>,
        indices: Vec<usize>,
        values: Vector,
    ) -> Vector {
        assert_eq!(nulls.len(), indices.len());
        Vector::Dictionary(DictionaryVector {
            nulls: bitmap_from_bools(&nulls),
            indices,
            values: Box::new(values),
        })
    }

    /// A vector whose contents are produced by `loader` on first access and
    /// memoized. The loader must produce a vector of the declared type and
    /// length.
    pub fn lazy(
        data_type: DataType,
        len: usize,
        loader: impl Fn() -> Vector + Send + Sync + 'static,
    ) -> Vector {
        Vector::Lazy(Box::new(LazyVector {
            data_type,
            len,
            loader: Box::new(loader),
            loaded: OnceCell::new(),
        }))
    }
}

fn bitmap_from_options<T>(values: &[Option<T>]) -> Option<Vec<u8>> {
    if values.iter().all(Option::is_some) {
        return None;
    }
    let mut bits = vec![0u8; values.len().div_ceil(8)];
    for (i, value) in values.iter().enumerate() {
        if value.is_none() {
            bit::set_bit(&mut bits, i);
        }
    }
    Some(bits)
}

fn bitmap_from_bools(nulls: &[bool]) -> Option<Vec<u8>> {
    if !nulls.iter().any(|&null| null) {
        return None;
    }
    let mut bits = vec![0u8; nulls.len().div_ceil(8)];
    for (i, &null) in nulls.iter().enumerate() {
        if null {
            bit::set_bit(&mut bits, i);
        }
    }
    Some(bits)
}

/// A single-row flat vector holding a null of the given type.
fn null_row(data_type: DataType) -> Vector {
    let data = match &data_type {
        DataType::Boolean => VectorData::Boolean(vec![false]),
        DataType::Byte => VectorData::Byte(vec![0]),
        DataType::Short => VectorData::Short(vec![0]),
        DataType::Integer => VectorData::Integer(vec![0]),
        DataType::Long => VectorData::Long(vec![0]),
        DataType::Float => VectorData::Float(vec![0.0]),
        DataType::Double => VectorData::Double(vec![0.0]),
        DataType::Timestamp => VectorData::Timestamp(vec![Timestamp::default()]),
        DataType::String | DataType::Binary => VectorData::Bytes(vec![Vec::new()]),
        DataType::Array(element) => VectorData::Array {
            offsets: vec![0],
            lengths: vec![0],
            elements: Box::new(empty_flat(element.as_ref().clone())),
        },
        DataType::Map(key, value) => VectorData::Map {
            offsets: vec![0],
            lengths: vec![0],
            keys: Box::new(empty_flat(key.as_ref().clone())),
            values: Box::new(empty_flat(value.as_ref().clone())),
        },
        DataType::Row(fields) => VectorData::Row(
            fields
                .iter()
                .map(|field| Vector::constant_null(field.clone(), 1))
                .collect(),
        ),
    };
    Vector::Flat(FlatVector {
        data_type,
        len: 1,
        nulls: Some(vec![0x01]),
        data,
    })
}

/// A zero-length flat vector of the given type.
fn empty_flat(data_type: DataType) -> Vector {
    let data = match &data_type {
        DataType::Boolean => VectorData::Boolean(Vec::new()),
        DataType::Byte => VectorData::Byte(Vec::new()),
        DataType::Short => VectorData::Short(Vec::new()),
        DataType::Integer => VectorData::Integer(Vec::new()),
        DataType::Long => VectorData::Long(Vec::new()),
        DataType::Float => VectorData::Float(Vec::new()),
        DataType::Double => VectorData::Double(Vec::new()),
        DataType::Timestamp => VectorData::Timestamp(Vec::new()),
        DataType::String | DataType::Binary => VectorData::Bytes(Vec::new()),
        DataType::Array(element) => VectorData::Array {
            offsets: Vec::new(),
            lengths: Vec::new(),
            elements: Box::new(empty_flat(element.as_ref().clone())),
        },
        DataType::Map(key, value) => VectorData::Map {
            offsets: Vec::new(),
            lengths: Vec::new(),
            keys: Box::new(empty_flat(key.as_ref().clone())),
            values: Box::new(empty_flat(value.as_ref().clone())),
        },
        DataType::Row(fields) => VectorData::Row(
            fields
                .iter()
                .map(|field| empty_flat(field.clone()))
                .collect(),
        ),
    };
    Vector::Flat(FlatVector {
        data_type,
        len: 0,
        nulls: None,
        data,
    })
}
