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

//! Benchmarks for columnar to UnsafeRow conversion, covering a fixed-width
//! only schema and a mixed schema with strings and arrays, through both the
//! statically-typed and runtime-typed entry points.

use criterion::{criterion_group, criterion_main, Criterion};
use spark_row::data_type::{IntegerType, LongType, ShortType, StringType};
use spark_row::serializer::{ArrayOf, RowOf};
use spark_row::{DataType, RowBuffer, UnsafeRowDynamicSerializer, UnsafeRowSerializer, Vector};

const BATCH_SIZE: usize = 1024;

fn make_fixed_width_batch() -> (DataType, Vector) {
    let ty = DataType::Row(vec![DataType::Long, DataType::Integer, DataType::Short]);
    let longs: Vec<Option<i64>> = (0..BATCH_SIZE)
        .map(|i| if i % 11 == 0 { None } else { Some(i as i64 * 7919) })
        .collect();
    let ints: Vec<Option<i32>> = (0..BATCH_SIZE).map(|i| Some(i as i32 ^ 0x5A5A)).collect();
    let shorts: Vec<Option<i16>> = (0..BATCH_SIZE).map(|i| Some(i as i16)).collect();
    let vector = Vector::row(
        None,
        vec![
            Vector::flat::<LongType>(longs),
            Vector::flat::<IntegerType>(ints),
            Vector::flat::<ShortType>(shorts),
        ],
    );
    (ty, vector)
}

fn make_mixed_batch() -> (DataType, Vector) {
    let ty = DataType::Row(vec![
        DataType::Long,
        DataType::String,
        DataType::Array(Box::new(DataType::Short)),
    ]);
    let longs: Vec<Option<i64>> = (0..BATCH_SIZE).map(|i| Some(i as i64)).collect();
    let payloads: Vec<String> = (0..BATCH_SIZE)
        .map(|i| format!("row-{i}-payload-with-some-width"))
        .collect();
    let strings: Vec<Option<&str>> = payloads
        .iter()
        .enumerate()
        .map(|(i, s)| if i % 13 == 0 { None } else { Some(s.as_str()) })
        .collect();

    let mut offsets = Vec::with_capacity(BATCH_SIZE);
    let mut lengths = Vec::with_capacity(BATCH_SIZE);
    let mut elements: Vec<Option<i16>> = Vec::new();
    for i in 0..BATCH_SIZE {
        let len = i % 8;
        offsets.push(elements.len());
        lengths.push(len);
        for j in 0..len {
            elements.push(if j == 3 { None } else { Some((i + j) as i16) });
        }
    }
    let arrays = Vector::array(offsets, lengths, None, Vector::flat::<ShortType>(elements));

    let vector = Vector::row(
        None,
        vec![
            Vector::flat::<LongType>(longs),
            Vector::strings(strings),
            arrays,
        ],
    );
    (ty, vector)
}

type FixedRow = RowOf<(LongType, IntegerType, ShortType)>;
type MixedRow = RowOf<(LongType, StringType, ArrayOf<ShortType>)>;

fn bench_serialize_batch(c: &mut Criterion) {
    let (fixed_ty, fixed_vector) = make_fixed_width_batch();
    let (mixed_ty, mixed_vector) = make_mixed_batch();
    let mut storage = vec![0u8; 4 * 1024 * 1024];

    let mut group = c.benchmark_group("serialize_batch");
    group.bench_function("fixed_width_static", |b| {
        b.iter(|| {
            let mut buf = RowBuffer::new(&mut storage);
            for row in 0..BATCH_SIZE {
                UnsafeRowSerializer::serialize_from_column::<FixedRow>(
                    &fixed_vector,
                    &mut buf,
                    row,
                )
                .unwrap();
            }
            buf.position()
        })
    });
    group.bench_function("fixed_width_dynamic", |b| {
        b.iter(|| {
            let mut buf = RowBuffer::new(&mut storage);
            for row in 0..BATCH_SIZE {
                UnsafeRowDynamicSerializer::serialize(&fixed_ty, &fixed_vector, &mut buf, row)
                    .unwrap();
            }
            buf.position()
        })
    });
    group.bench_function("mixed_static", |b| {
        b.iter(|| {
            let mut buf = RowBuffer::new(&mut storage);
            for row in 0..BATCH_SIZE {
                UnsafeRowSerializer::serialize_from_column::<MixedRow>(
                    &mixed_vector,
                    &mut buf,
                    row,
                )
                .unwrap();
            }
            buf.position()
        })
    });
    group.bench_function("mixed_dynamic", |b| {
        b.iter(|| {
            let mut buf = RowBuffer::new(&mut storage);
            for row in 0..BATCH_SIZE {
                UnsafeRowDynamicSerializer::serialize(&mixed_ty, &mixed_vector, &mut buf, row)
                    .unwrap();
            }
            buf.position()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_serialize_batch);
criterion_main!(benches);
