use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use oaslint_index::DocumentIndex;
use oaslint_linter::{rulesets, JsonPath, Motor, MotorConfig, RuleSet, SpecInfo};
use std::fmt::Write;
use std::hint::black_box;

// Sample document with enough paths to give descendant lookups some work
fn sample_document(paths: usize) -> String {
    let mut doc = String::from(
        "openapi: 3.1.0
info:
  title: Bench API
  version: 1.0.0
  description: Benchmark document
  contact:
    name: bench
    url: https://example.com
  license:
    name: MIT
    url: https://opensource.org/licenses/MIT
servers:
  - url: https://api.example.com
tags:
  - name: alpha
  - name: beta
paths:
",
    );
    for i in 0..paths {
        let _ = write!(
            doc,
            "  /resource{i}:
    get:
      description: Get resource {i}
      servers:
        - url: /v{i}
      responses:
        '200':
          description: ok
          content:
            application/json:
              examples:
                sample:
                  value: {i}
"
        );
    }
    doc
}

/// Parse benchmarks
fn bench_parse(c: &mut Criterion) {
    let doc = sample_document(200);
    c.bench_function("parse_document", |b| {
        b.iter(|| black_box(DocumentIndex::parse(doc.as_bytes())));
    });
}

/// Path resolution benchmarks
fn bench_resolve_descendants(c: &mut Criterion) {
    let index = DocumentIndex::parse(sample_document(200).as_bytes()).unwrap();
    let path = JsonPath::parse("$..content.*.examples.*").unwrap();
    c.bench_function("resolve_descendants", |b| {
        b.iter(|| black_box(path.resolve(&index)));
    });
}

/// Motor benchmarks: the recommended ruleset, sequential and pooled
fn bench_motor(c: &mut Criterion) {
    let doc = sample_document(200);
    let rule_set: RuleSet = rulesets::recommended();

    c.bench_function("motor_sequential", |b| {
        let motor = Motor::builtin(MotorConfig::sequential());
        b.iter(|| black_box(motor.apply_rules(&rule_set, doc.as_bytes())));
    });

    c.bench_function("motor_parallel", |b| {
        let motor = Motor::builtin(MotorConfig::default());
        b.iter(|| black_box(motor.apply_rules(&rule_set, doc.as_bytes())));
    });
}

/// Result preparation benchmark
fn bench_prepare_results(c: &mut Criterion) {
    let doc = sample_document(200);
    let spec = SpecInfo::new(doc.as_bytes().to_vec());
    let motor = Motor::default();
    c.bench_function("lint_and_prepare", |b| {
        b.iter_batched(
            rulesets::recommended,
            |rule_set| black_box(motor.lint(&rule_set, &spec)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_resolve_descendants,
    bench_motor,
    bench_prepare_results
);
criterion_main!(benches);
