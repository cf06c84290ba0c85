use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use gacha_core::economy::UpgradeTrack;
use gacha_core::engine::{EngineConfig, GachaEngine, PersistedProfile};
use gacha_core::history::DrawHistoryWindow;
use gacha_core::rarity::Rarity;
use gacha_core::rates::{compute_rates, DropRateSet, RateAdjustments};

fn bench_rate_computation(c: &mut Criterion) {
    let base = DropRateSet::from_raw([70.0, 18.0, 7.0, 3.0, 1.5, 0.5]);
    let track = UpgradeTrack::new(5);
    let mut window = DrawHistoryWindow::default();
    for i in 0..10 {
        window.record_draw(if i % 2 == 0 { Rarity::Common } else { Rarity::Rare });
    }

    c.bench_function("compute_rates", |b| {
        b.iter(|| {
            compute_rates(
                black_box(&base),
                &track.rate_deltas(),
                &window.adjustments(),
                &RateAdjustments::none(),
                &RateAdjustments::none(),
            )
        })
    });

    c.bench_function("select_rarity", |b| {
        let set = base.normalized();
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);
        b.iter(|| set.select(black_box(&mut rng)))
    });
}

fn bench_draw_loop(c: &mut Criterion) {
    c.bench_function("request_draw", |b| {
        let mut engine = GachaEngine::new(
            &EngineConfig::default(),
            PersistedProfile {
                upgrade_level: 3,
                currency: u64::MAX / 2,
            },
        );
        let mut t = 0.0f64;
        b.iter(|| {
            t += 0.5;
            engine.request_draw(black_box(t)).unwrap()
        })
    });

    c.bench_function("current_rates_snapshot", |b| {
        let mut engine = GachaEngine::new(
            &EngineConfig::default(),
            PersistedProfile {
                upgrade_level: 0,
                currency: 100_000,
            },
        );
        for i in 0..20 {
            let _ = engine.request_draw(i as f64);
        }
        b.iter(|| engine.current_rates(black_box(25.0)))
    });
}

criterion_group!(benches, bench_rate_computation, bench_draw_loop);
criterion_main!(benches);
