use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use neuroprofile::{
    encode, extract, CognitiveTrait, EngineConfig, HybridRequest, InMemoryProfileStore,
    ProfileAssembler, ProfilingEngine, ResponseRecord, ScenarioKind, TraitVector, UseCase,
};

const ANSWERS: [(&str, ScenarioKind); 6] = [
    (
        "I love brainstorming with the team, what if we tried something unconventional?",
        ScenarioKind::PersonalityChat,
    ),
    (
        "First I would analyze the data and then compare the options step by step.",
        ScenarioKind::ProblemSolving,
    ),
    (
        "Maybe I'd wait. I'm not sure, the risk seems high and I'm a bit worried about it.",
        ScenarioKind::ProblemSolving,
    ),
    (
        "Honestly I go with my gut most of the time. It usually works out fine.",
        ScenarioKind::PersonalityChat,
    ),
    (
        "I'd set up a plan with phases, a timeline and a checklist for everyone involved.",
        ScenarioKind::ProblemSolving,
    ),
    (
        "I definitely enjoy meeting new people and hearing their ideas.",
        ScenarioKind::PersonalityChat,
    ),
];

fn session() -> Vec<ResponseRecord> {
    ANSWERS
        .iter()
        .map(|(text, kind)| ResponseRecord::new(*text, *kind))
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let responses = session();
    let mut group = c.benchmark_group("extract");
    group.throughput(Throughput::Elements(responses.len() as u64));
    group.bench_function("six_responses", |b| {
        b.iter(|| {
            for r in &responses {
                black_box(extract(black_box(r)).unwrap());
            }
        });
    });
    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let responses = session();
    let assembler = ProfileAssembler::default();
    c.bench_function("assemble/six_responses", |b| {
        b.iter(|| black_box(assembler.assemble(black_box(&responses)).unwrap()));
    });
}

fn bench_encode(c: &mut Criterion) {
    let vector = TraitVector::neutral()
        .with(CognitiveTrait::Creative, 0.81)
        .with(CognitiveTrait::RiskTolerance, 0.72)
        .with(CognitiveTrait::Systematic, 0.2);
    c.bench_function("signature/encode", |b| {
        b.iter(|| black_box(encode(black_box(&vector))));
    });
}

fn bench_hybridize(c: &mut Criterion) {
    let mut group = c.benchmark_group("hybridize");
    group.throughput(Throughput::Elements(1));

    group.bench_function("four_sources", |b| {
        b.iter_custom(|iters| {
            // Fresh store per sample so stored hybrids do not accumulate across samples.
            let store = Arc::new(InMemoryProfileStore::new());
            let engine = ProfilingEngine::new(store, EngineConfig::default()).unwrap();
            let ids: Vec<_> = ["A", "B", "C", "D"]
                .iter()
                .map(|code| {
                    let responses: Vec<_> = (0..3)
                        .map(|_| ResponseRecord::new("", ScenarioKind::ProblemSolving).with_choice(*code))
                        .collect();
                    engine.assess(&responses).unwrap().id
                })
                .collect();
            let request = ids
                .iter()
                .zip([0.4, 0.3, 0.2, 0.1])
                .fold(HybridRequest::new(UseCase::Innovation), |req, (id, w)| req.source(*id, w));

            let start = Instant::now();
            for _ in 0..iters {
                black_box(engine.hybridize(&request).unwrap());
            }
            start.elapsed()
        });
    });
    group.finish();
}

criterion_group!(
    profiling,
    bench_extract,
    bench_assemble,
    bench_encode,
    bench_hybridize
);
criterion_main!(profiling);
