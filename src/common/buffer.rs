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

//! Cursor-carrying writer over a caller-owned output buffer.

use crate::errors::{RowError, RowResult};

/// A write cursor over a contiguous, caller-owned byte region.
///
/// The serializer never owns or grows output memory: callers allocate a
/// buffer sized for their rows and hand it to the writers through a
/// `RowBuffer`. Each successful serialize call writes at the current position
/// and advances the cursor past the value's physical footprint (8 bytes for a
/// fixed-width leaf, the padded length otherwise), so consecutive top-level
/// values pack back-to-back 8-byte aligned.
pub struct RowBuffer<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> RowBuffer<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current write position, in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The bytes emitted so far.
    pub fn written(&self) -> &[u8] {
        &self.data[..self.pos]
    }

    /// Fails with [`RowError::BufferTooSmall`] unless at least `need` bytes
    /// remain past the cursor.
    pub fn ensure(&self, need: usize) -> RowResult<()> {
        if need > self.remaining() {
            return Err(RowError::BufferTooSmall {
                need,
                have: self.remaining(),
            });
        }
        Ok(())
    }

    /// The writable region from the cursor to the end of the buffer.
    pub(crate) fn rest(&mut self) -> &mut [u8] {
        &mut self.data[self.pos..]
    }

    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.data.len());
        self.pos += n;
    }
}
