//! Benchmarks for JVM descriptor parsing and encoding.
//!
//! Covers the shapes seen most often in compiler metadata:
//! - Method descriptors (no parameters, primitives, object and array parameters)
//! - Field descriptors (primitives, objects, nested arrays)
//! - Encoding type descriptors back into descriptor strings

extern crate memberscope;

use criterion::{criterion_group, criterion_main, Criterion};
use memberscope::{
    signatures::{encode_method_descriptor, split_method_descriptor, DescriptorParser},
    typesystem::TypeDescriptor,
};
use std::hint::black_box;

/// Benchmark parsing a method without parameters.
/// Descriptor: void run()
fn bench_method_void_no_params(c: &mut Criterion) {
    c.bench_function("desc_method_void_no_params", |b| {
        b.iter(|| {
            let method = DescriptorParser::new(black_box("()V"))
                .parse_method_descriptor()
                .unwrap();
            black_box(method)
        });
    });
}

/// Benchmark parsing a method with primitive parameters.
/// Descriptor: boolean check(int, long, double)
fn bench_method_primitives(c: &mut Criterion) {
    c.bench_function("desc_method_primitives", |b| {
        b.iter(|| {
            let method = DescriptorParser::new(black_box("(IJD)Z"))
                .parse_method_descriptor()
                .unwrap();
            black_box(method)
        });
    });
}

/// Benchmark parsing a method with object and array parameters.
/// Descriptor: Object[] invoke(String, List, int[][])
fn bench_method_objects(c: &mut Criterion) {
    let descriptor = "(Ljava/lang/String;Ljava/util/List;[[I)[Ljava/lang/Object;";

    c.bench_function("desc_method_objects", |b| {
        b.iter(|| {
            let method = DescriptorParser::new(black_box(descriptor))
                .parse_method_descriptor()
                .unwrap();
            black_box(method)
        });
    });
}

/// Benchmark parsing a method with many parameters.
fn bench_method_many_params(c: &mut Criterion) {
    let descriptor = "(IJZBCSFDLjava/lang/String;[ILjava/util/Map;[[Ljava/lang/Object;)V";

    c.bench_function("desc_method_many_params", |b| {
        b.iter(|| {
            let method = DescriptorParser::new(black_box(descriptor))
                .parse_method_descriptor()
                .unwrap();
            black_box(method)
        });
    });
}

/// Benchmark splitting a method descriptor without decoding it.
fn bench_method_split(c: &mut Criterion) {
    let descriptor = "(Ljava/lang/String;Ljava/util/List;[[I)[Ljava/lang/Object;";

    c.bench_function("desc_method_split", |b| {
        b.iter(|| {
            let parts = split_method_descriptor(black_box(descriptor)).unwrap();
            black_box(parts)
        });
    });
}

/// Benchmark parsing a primitive field descriptor.
fn bench_field_primitive(c: &mut Criterion) {
    c.bench_function("desc_field_primitive", |b| {
        b.iter(|| {
            let field = DescriptorParser::new(black_box("J"))
                .parse_field_descriptor()
                .unwrap();
            black_box(field)
        });
    });
}

/// Benchmark parsing an object field descriptor.
fn bench_field_object(c: &mut Criterion) {
    c.bench_function("desc_field_object", |b| {
        b.iter(|| {
            let field = DescriptorParser::new(black_box("Ljava/util/concurrent/ConcurrentHashMap;"))
                .parse_field_descriptor()
                .unwrap();
            black_box(field)
        });
    });
}

/// Benchmark parsing a nested array field descriptor.
fn bench_field_nested_array(c: &mut Criterion) {
    c.bench_function("desc_field_nested_array", |b| {
        b.iter(|| {
            let field = DescriptorParser::new(black_box("[[[Ljava/lang/String;"))
                .parse_field_descriptor()
                .unwrap();
            black_box(field)
        });
    });
}

/// Benchmark encoding parameter and return types into a method descriptor.
fn bench_encode_method(c: &mut Criterion) {
    let params = vec![
        TypeDescriptor::class("int"),
        TypeDescriptor::class("java.lang.String"),
        TypeDescriptor::class("[J"),
    ];
    let return_type = TypeDescriptor::class("boolean");

    c.bench_function("desc_encode_method", |b| {
        b.iter(|| {
            let descriptor =
                encode_method_descriptor(black_box(&params), black_box(&return_type)).unwrap();
            black_box(descriptor)
        });
    });
}

criterion_group!(
    benches,
    // Method descriptors
    bench_method_void_no_params,
    bench_method_primitives,
    bench_method_objects,
    bench_method_many_params,
    bench_method_split,
    // Field descriptors
    bench_field_primitive,
    bench_field_object,
    bench_field_nested_array,
    // Encoding
    bench_encode_method,
);
criterion_main!(benches);
