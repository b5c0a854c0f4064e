use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chrono::Utc;
use uuid::Uuid;

use models::gallery_image;
use service::gallery::plan_sync;

fn bench_slug(c: &mut Criterion) {
    let title = "  Ünïcode & Friends: Building a Content Admin -- Part 42 (Draft)  ".repeat(4);
    c.bench_function("slug_sanitize", |b| {
        b.iter(|| models::slug::sanitize(black_box(&title), 96));
    });
}

fn bench_gallery_plan(c: &mut Criterion) {
    let owner_id = Uuid::new_v4();
    let now = Utc::now().into();
    let existing: Vec<gallery_image::Model> = (0..24)
        .map(|i| gallery_image::Model {
            id: Uuid::new_v4(),
            owner_kind: "project".into(),
            owner_id,
            image_url: format!("/img/{i}.jpg"),
            position: i,
            created_at: now,
        })
        .collect();
    // reversed, every third dropped, a few new ones appended
    let desired: Vec<String> = (0..24)
        .rev()
        .filter(|i| i % 3 != 0)
        .map(|i| format!("/img/{i}.jpg"))
        .chain((100..104).map(|i| format!("/img/{i}.jpg")))
        .collect();

    c.bench_function("gallery_plan_sync", |b| {
        b.iter(|| plan_sync(black_box(&existing), black_box(&desired)));
    });
}

criterion_group!(benches, bench_slug, bench_gallery_plan);
criterion_main!(benches);
