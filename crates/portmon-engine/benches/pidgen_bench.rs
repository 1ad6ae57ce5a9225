use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use portmon_core::{Gender, GenderRatio, Nature};
use portmon_engine::{PidConstraints, ShinyTarget};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("pidgen");

    group.bench_function("unconstrained", |b| {
        b.iter_batched_ref(
            || StdRng::seed_from_u64(7),
            |rng| PidConstraints::default().generate(rng),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("nature_only", |b| {
        let constraints = PidConstraints {
            nature: Some(Nature::Jolly),
            ..Default::default()
        };
        b.iter_batched_ref(
            || StdRng::seed_from_u64(7),
            |rng| constraints.generate(rng),
            BatchSize::SmallInput,
        )
    });

    // the expensive case: shiny window of 8 in 65536 conjoined with gender
    // and nature
    group.bench_function("shiny_female_nature", |b| {
        let constraints = PidConstraints {
            shiny: Some(ShinyTarget {
                shiny: true,
                public_id: 40122,
                secret_id: 11909,
                threshold: 8,
            }),
            gender: Some((Gender::Female, GenderRatio::Male1Female1)),
            nature: Some(Nature::Adamant),
            ..Default::default()
        };
        b.iter_batched_ref(
            || StdRng::seed_from_u64(7),
            |rng| constraints.generate(rng),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
