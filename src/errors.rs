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

//! Errors raised by the row serializer.
//!
//! A null value is never an error; it is reported through the `None` arm of
//! [`crate::serializer::SerializedSize`]. Everything in [`RowError`] is a
//! precondition violation with no recovery path: on error the contents of the
//! output buffer are undefined.

use crate::data_type::TypeKind;

pub type RowResult<T> = Result<T, RowError>;

#[derive(thiserror::Error, Debug)]
pub enum RowError {
    /// The type descriptor disagrees with the data held by the column.
    #[error("Type mismatch: expected {expected:?} but column holds {actual:?}")]
    TypeMismatch { expected: TypeKind, actual: TypeKind },

    #[error("Output buffer too small: need {need} bytes but only {have} remain")]
    BufferTooSmall { need: usize, have: usize },

    #[error("Row index {index} out of bounds for vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}
