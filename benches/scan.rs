use cif_packed::{
    journey::{find_routes, JourneyQuery},
    packed::{encode, PackedTimetable},
    timetable::{Route, ServiceType, Stop, Timetable, TimetableConfig},
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::{env, hint::black_box, time::Duration};

/// Routes over 4000 stations with a fixed pseudo-random layout.
fn synthetic_routes(count: u32) -> Vec<Route> {
    let mut seed = 0x2545_f491_u32;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed
    };

    (0..count)
        .map(|id| {
            let stop_count = 2 + next() % 20;
            let start = (next() % 1200) as u16;
            let stops = (0..stop_count)
                .map(|i| {
                    let time = start + i as u16 * 4;
                    Stop::new(next() % 4000, time, time + 1, if i % 3 == 0 { "1" } else { "" })
                })
                .collect();
            let valid_from = (next() % 300) as i32;
            Route {
                id,
                uid: format!("B{id:05}"),
                service_type: ServiceType::Train,
                operating_days: (next() % 127 + 1) as u8,
                valid_from,
                valid_to: valid_from + 60,
                stops,
            }
        })
        .collect()
}

fn packed_scan(packed: &PackedTimetable, query: &JourneyQuery) {
    let _ = black_box(packed.find(query));
}

fn object_scan(routes: &[Route], query: &JourneyQuery) {
    let _ = black_box(find_routes(routes, query));
}

fn criterion_benchmark(c: &mut Criterion) {
    let routes = match env::var("CIF_DATA_PATH") {
        Ok(path) => {
            Timetable::read(path, &TimetableConfig::default())
                .expect("Failed to read timetable")
                .routes
        }
        Err(_) => synthetic_routes(200_000),
    };
    let packed = encode(&routes).expect("Failed to pack routes");
    let query = JourneyQuery::new(17, 2048, 0b1000000, 120);

    let mut group = c.benchmark_group("Scan");

    group.warm_up_time(Duration::from_secs(5));

    group.measurement_time(Duration::from_secs(20));

    group.bench_function("Packed scan", |b| b.iter(|| packed_scan(&packed, &query)));

    group.bench_function("Object scan", |b| b.iter(|| object_scan(&routes, &query)));

    group.bench_function("Encode", |b| b.iter(|| black_box(encode(&routes))));

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
