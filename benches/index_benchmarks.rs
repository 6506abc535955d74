use criterion::{black_box, criterion_group, criterion_main, Criterion};

use material_replacer::assignment::{AssignmentIndex, MaterialId, ObjectId, ReplacementPlan};
use material_replacer::provider::RawSample;

const STORAGE_ROOT: &str = "Assets";

/// `objects` renderers with `slots` slots each, cycling through `materials`.
fn synthetic_sample(objects: u32, slots: usize, materials: u32) -> RawSample {
    (0..objects)
        .map(|o| {
            let slot_list = (0..slots)
                .map(|s| {
                    let m = (o as usize * slots + s) as u32 % (materials + 1);
                    // Every (materials + 1)-th slot is empty.
                    (m != materials).then_some(MaterialId(m))
                })
                .collect();
            (ObjectId::new(o, 0), slot_list)
        })
        .collect()
}

fn resolve(material: MaterialId) -> Option<String> {
    Some(format!("Assets/Group{}/mat_{}.mat", material.0 % 8, material.0))
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

fn bench_build_small(c: &mut Criterion) {
    let sample = synthetic_sample(16, 4, 12);
    c.bench_function("build_16x4", |b| {
        b.iter(|| {
            AssignmentIndex::build(ObjectId::new(0, 0), black_box(&sample), &resolve, STORAGE_ROOT)
        });
    });
}

fn bench_build_large(c: &mut Criterion) {
    let sample = synthetic_sample(512, 8, 128);
    c.bench_function("build_512x8", |b| {
        b.iter(|| {
            AssignmentIndex::build(ObjectId::new(0, 0), black_box(&sample), &resolve, STORAGE_ROOT)
        });
    });
}

// ---------------------------------------------------------------------------
// Diff and transform
// ---------------------------------------------------------------------------

fn bench_has_differences(c: &mut Criterion) {
    let sample = synthetic_sample(512, 8, 128);
    let index = AssignmentIndex::build(ObjectId::new(0, 0), &sample, &resolve, STORAGE_ROOT);
    c.bench_function("has_differences_512x8", |b| {
        b.iter(|| index.has_differences(black_box(&sample)));
    });
}

fn bench_transform(c: &mut Criterion) {
    let sample = synthetic_sample(512, 8, 128);
    let index = AssignmentIndex::build(ObjectId::new(0, 0), &sample, &resolve, STORAGE_ROOT);
    let mut plan = ReplacementPlan::for_index(&index);
    for m in 0..64 {
        plan.set_replacement(MaterialId(m), Some(MaterialId(m + 64)));
    }
    c.bench_function("transform_512x8_half", |b| {
        b.iter(|| index.transform(black_box(&plan), &resolve));
    });
}

criterion_group!(construction, bench_build_small, bench_build_large);
criterion_group!(diff_transform, bench_has_differences, bench_transform);
criterion_main!(construction, diff_transform);
