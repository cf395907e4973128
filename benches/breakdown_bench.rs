//! Breakdown throughput: full ten-member teams against a synthetic synergy table.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use illuvilytics::data::illuvial::Illuvial;
use illuvilytics::data::synergy_map::{SynergyEntry, SynergyTable};
use illuvilytics::synergy::{aggregate, CachedResolver, UnknownPolicy};
use illuvilytics::team::TEAM_CAPACITY;

const AFFINITIES: &[&str] = &["Water", "Earth", "Fire", "Nature", "Air"];
const CLASSES: &[&str] = &["Bulwark", "Empath", "Fighter", "Psion", "Rogue"];

fn synthetic_table(species: usize) -> SynergyTable {
    SynergyTable::from_entries((0..species).map(|n| {
        let entry = SynergyEntry {
            base_affinity: AFFINITIES[n % AFFINITIES.len()].to_string(),
            base_class: CLASSES[n % CLASSES.len()].to_string(),
            composite_affinities: vec![AFFINITIES[(n + 1) % AFFINITIES.len()].to_string()],
            composite_classes: vec![CLASSES[(n + 2) % CLASSES.len()].to_string()],
        };
        (format!("Species {n}"), entry)
    }))
}

fn team(size: usize) -> Vec<Illuvial> {
    (0..size)
        .map(|n| Illuvial {
            id: format!("id-{n}"),
            display_name: format!("Species {}", n % 7),
            line: "Bench".to_string(),
            stage: 1.0,
            tier: 1.0,
            affinity: AFFINITIES[n % AFFINITIES.len()].to_string(),
            class_name: CLASSES[n % CLASSES.len()].to_string(),
            max_health: 1000.0,
            attack_physical: 50.0,
            attack_speed: 100.0,
            image: String::new(),
        })
        .collect()
}

fn bench_breakdown(c: &mut Criterion) {
    let table = synthetic_table(200);
    let members = team(TEAM_CAPACITY);

    let mut group = c.benchmark_group("breakdown");
    group.throughput(Throughput::Elements(members.len() as u64));

    group.bench_function("full_team_direct", |b| {
        b.iter(|| aggregate(black_box(&members), &table, UnknownPolicy::Skip))
    });

    group.bench_function("full_team_cached", |b| {
        let resolver = CachedResolver::new(&table);
        b.iter(|| aggregate(black_box(&members), &resolver, UnknownPolicy::Skip))
    });

    group.finish();
}

criterion_group!(benches, bench_breakdown);
criterion_main!(benches);
