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

//! Logical type descriptors for the UnsafeRow format.

use crate::errors::{RowError, RowResult};
use crate::vector::{FlatVector, VectorData};
use std::fmt::Debug;

/// The closed set of logical types the serializer understands. Descriptors
/// are immutable; container variants own their element descriptors.
#[derive(Clone, Debug, PartialEq)]
pub enum DataType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Timestamp,
    String,
    Binary,
    Array(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
    Row(Vec<DataType>),
}

impl DataType {
    pub fn kind(&self) -> TypeKind {
        match self {
            DataType::Boolean => TypeKind::Boolean,
            DataType::Byte => TypeKind::Byte,
            DataType::Short => TypeKind::Short,
            DataType::Integer => TypeKind::Integer,
            DataType::Long => TypeKind::Long,
            DataType::Float => TypeKind::Float,
            DataType::Double => TypeKind::Double,
            DataType::Timestamp => TypeKind::Timestamp,
            DataType::String => TypeKind::String,
            DataType::Binary => TypeKind::Binary,
            DataType::Array(_) => TypeKind::Array,
            DataType::Map(_, _) => TypeKind::Map,
            DataType::Row(_) => TypeKind::Row,
        }
    }

    /// Whether values of this type are stored directly in an 8-byte slot.
    #[inline]
    pub fn is_fixed_width(&self) -> bool {
        self.fixed_width().is_some()
    }

    /// The packed element width in bytes, for types stored inline in an
    /// array's element region. `None` for variable-length types, which use an
    /// 8-byte offset/length header instead.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            DataType::Boolean | DataType::Byte => Some(1),
            DataType::Short => Some(2),
            DataType::Integer | DataType::Float => Some(4),
            DataType::Long | DataType::Double | DataType::Timestamp => Some(8),
            _ => None,
        }
    }
}

/// Unlike [`DataType`], [`TypeKind`] doesn't carry extra information about
/// the type itself, such as container element types. It is merely a token
/// used to do runtime case analysis depending on the actual type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Timestamp,
    String,
    Binary,
    Array,
    Map,
    Row,
}

/// A point in time, kept as separate seconds and sub-second nanoseconds so
/// the representable range is not limited by a single 64-bit nanosecond
/// count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timestamp {
    seconds: i64,
    nanos: u64,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: u64) -> Self {
        debug_assert!(nanos < 1_000_000_000);
        Self { seconds, nanos }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u64 {
        self.nanos
    }

    /// The on-wire representation: signed microseconds since the epoch.
    /// Negative seconds compose with the positive sub-second nanos
    /// arithmetically, e.g. `(-1s, 2000ns)` is `-999_998us`.
    #[inline]
    pub fn to_micros(&self) -> i64 {
        self.seconds * 1_000_000 + (self.nanos / 1_000) as i64
    }
}

/// A runtime-typed scalar, the value-driven input to
/// [`crate::serializer::dynamic::UnsafeRowDynamicSerializer::serialize_value`].
#[derive(Clone, Copy, Debug)]
pub enum ScalarValue<'a> {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Timestamp(Timestamp),
    String(&'a str),
    Binary(&'a [u8]),
}

impl ScalarValue<'_> {
    pub fn kind(&self) -> TypeKind {
        match self {
            ScalarValue::Boolean(_) => TypeKind::Boolean,
            ScalarValue::Byte(_) => TypeKind::Byte,
            ScalarValue::Short(_) => TypeKind::Short,
            ScalarValue::Integer(_) => TypeKind::Integer,
            ScalarValue::Long(_) => TypeKind::Long,
            ScalarValue::Float(_) => TypeKind::Float,
            ScalarValue::Double(_) => TypeKind::Double,
            ScalarValue::Timestamp(_) => TypeKind::Timestamp,
            ScalarValue::String(_) => TypeKind::String,
            ScalarValue::Binary(_) => TypeKind::Binary,
        }
    }
}

pub trait NativeType: Debug + Default + Copy + 'static {}

impl NativeType for bool {}
impl NativeType for i8 {}
impl NativeType for i16 {}
impl NativeType for i32 {}
impl NativeType for i64 {}
impl NativeType for f32 {}
impl NativeType for f64 {}
impl NativeType for Timestamp {}

/// A token type standing for a logical type. This should only be used as a
/// generic parameter during method invocations.
pub trait TypeTrait: 'static {
    fn type_kind() -> TypeKind;
    fn data_type() -> DataType;
}

/// Extension of [`TypeTrait`] for types whose values live in 8-byte slots:
/// loading a native value out of a flat vector, and emitting its
/// little-endian bytes into the low end of a slot.
pub trait FixedWidthType: TypeTrait {
    type Native: NativeType;

    /// Writes the value's little-endian bytes into the low end of `out`.
    /// The caller has zeroed the remainder of the slot.
    fn put(value: Self::Native, out: &mut [u8]);

    /// Reads the value at `idx` of a flat vector.
    fn get(flat: &FlatVector, idx: usize) -> RowResult<Self::Native>;

    /// Wraps plain values in the matching flat-vector storage.
    fn storage(values: Vec<Self::Native>) -> VectorData;
}

macro_rules! make_type_trait {
    ($name:ident, $kind:path, $data_type:expr) => {
        pub struct $name {}

        impl TypeTrait for $name {
            fn type_kind() -> TypeKind {
                $kind
            }

            fn data_type() -> DataType {
                $data_type
            }
        }
    };
}

make_type_trait!(BooleanType, TypeKind::Boolean, DataType::Boolean);
make_type_trait!(ByteType, TypeKind::Byte, DataType::Byte);
make_type_trait!(ShortType, TypeKind::Short, DataType::Short);
make_type_trait!(IntegerType, TypeKind::Integer, DataType::Integer);
make_type_trait!(LongType, TypeKind::Long, DataType::Long);
make_type_trait!(FloatType, TypeKind::Float, DataType::Float);
make_type_trait!(DoubleType, TypeKind::Double, DataType::Double);
make_type_trait!(TimestampType, TypeKind::Timestamp, DataType::Timestamp);
make_type_trait!(StringType, TypeKind::String, DataType::String);
make_type_trait!(BinaryType, TypeKind::Binary, DataType::Binary);

macro_rules! make_fixed_width {
    ($name:ident, $native:ty, $width:expr, $variant:ident) => {
        impl FixedWidthType for $name {
            type Native = $native;

            fn put(value: Self::Native, out: &mut [u8]) {
                out[..$width].copy_from_slice(&value.to_le_bytes());
            }

            fn get(flat: &FlatVector, idx: usize) -> RowResult<Self::Native> {
                match flat.data() {
                    VectorData::$variant(values) => Ok(values[idx]),
                    _ => Err(RowError::TypeMismatch {
                        expected: Self::type_kind(),
                        actual: flat.data_type().kind(),
                    }),
                }
            }

            fn storage(values: Vec<Self::Native>) -> VectorData {
                VectorData::$variant(values)
            }
        }
    };
}

make_fixed_width!(ByteType, i8, 1, Byte);
make_fixed_width!(ShortType, i16, 2, Short);
make_fixed_width!(IntegerType, i32, 4, Integer);
make_fixed_width!(LongType, i64, 8, Long);
make_fixed_width!(FloatType, f32, 4, Float);
make_fixed_width!(DoubleType, f64, 8, Double);

impl FixedWidthType for BooleanType {
    type Native = bool;

    fn put(value: bool, out: &mut [u8]) {
        out[0] = value as u8;
    }

    fn get(flat: &FlatVector, idx: usize) -> RowResult<bool> {
        match flat.data() {
            VectorData::Boolean(values) => Ok(values[idx]),
            _ => Err(RowError::TypeMismatch {
                expected: TypeKind::Boolean,
                actual: flat.data_type().kind(),
            }),
        }
    }

    fn storage(values: Vec<bool>) -> VectorData {
        VectorData::Boolean(values)
    }
}

impl FixedWidthType for TimestampType {
    type Native = Timestamp;

    fn put(value: Timestamp, out: &mut [u8]) {
        out[..8].copy_from_slice(&value.to_micros().to_le_bytes());
    }

    fn get(flat: &FlatVector, idx: usize) -> RowResult<Timestamp> {
        match flat.data() {
            VectorData::Timestamp(values) => Ok(values[idx]),
            _ => Err(RowError::TypeMismatch {
                expected: TypeKind::Timestamp,
                actual: flat.data_type().kind(),
            }),
        }
    }

    fn storage(values: Vec<Timestamp>) -> VectorData {
        VectorData::Timestamp(values)
    }
}
