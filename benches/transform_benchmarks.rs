/*!
# Transform Benchmarks

Cost of turning catalog entities into response bodies, with and without
relation includes, plus one end-to-end request against a seeded SQLite
catalog.

```bash
cargo bench --bench transform_benchmarks
cargo bench --bench transform_benchmarks -- "Collection"
cargo bench --bench transform_benchmarks -- --quick
```

HTML reports are generated in `target/criterion/report/index.html`.
*/

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request},
};
use bookr::entities::{Author, Book, Rating};
use bookr::join_fields::JoinField;
use bookr::migration::Migrator;
use bookr::rateable::RatingSummary;
use bookr::routes::{AppState, router};
use bookr::transform::{
    ArraySerializer, DataArraySerializer, IncludeSet, NestedDataSerializer, ResponseManager,
    Serializer, SerializerKind,
};
use bookr::transformers::BookTransformer;
use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tokio::runtime::Runtime;
use tower::ServiceExt;

fn sample_books(count: i32) -> Vec<Book> {
    let now = Utc::now();
    (1..=count)
        .map(|id| {
            let ratings: Vec<Rating> = (1..=3)
                .map(|n| Rating {
                    id: id * 10 + n,
                    value: n + 2,
                    rateable_type: "book".into(),
                    rateable_id: id,
                    created_at: now,
                    updated_at: now,
                })
                .collect();
            let author = Author {
                id: id % 7 + 1,
                name: format!("Author {}", id % 7 + 1),
                gender: "female".into(),
                biography: Some("Writes books.".into()),
                created_at: now,
                updated_at: now,
                rating: RatingSummary::from_ratings(&ratings),
                books: JoinField::NotLoaded,
                ratings: JoinField::NotLoaded,
            };
            Book {
                id,
                title: format!("Book {id}"),
                description: Some("A benchmark book.".into()),
                author_id: author.id,
                created_at: now,
                updated_at: now,
                author: JoinField::Loaded(Some(author)),
                ratings: JoinField::Loaded(ratings),
            }
        })
        .collect()
}

fn bench_collections(c: &mut Criterion) {
    let mut group = c.benchmark_group("Collection");

    for size in [10, 100, 1000] {
        let books = sample_books(size);
        for includes in ["", "author", "author,ratings"] {
            let manager = ResponseManager::default().with_includes(IncludeSet::parse(includes));
            let label = if includes.is_empty() { "none" } else { includes };
            group.bench_with_input(
                BenchmarkId::new(format!("include={label}"), size),
                &books,
                |b, books| {
                    b.iter(|| std::hint::black_box(manager.collection(books, BookTransformer)));
                },
            );
        }
    }

    group.finish();
}

fn bench_serializers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serializer");
    let books = sample_books(100);
    let serializers: [Arc<dyn Serializer>; 3] = [
        Arc::new(DataArraySerializer),
        Arc::new(NestedDataSerializer),
        Arc::new(ArraySerializer),
    ];

    for serializer in serializers {
        let name = serializer.name();
        let manager =
            ResponseManager::new(serializer).with_includes(IncludeSet::parse("author,ratings"));
        group.bench_function(name, |b| {
            b.iter(|| std::hint::black_box(manager.collection(&books, BookTransformer)));
        });
    }

    group.finish();
}

fn bench_include_parsing(c: &mut Criterion) {
    c.bench_function("IncludeSet::parse", |b| {
        b.iter(|| {
            std::hint::black_box(IncludeSet::parse(
                "author, author.books ,ratings,,author.books.ratings,ratings",
            ))
        });
    });
}

fn bench_http(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let app = rt.block_on(async {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        bookr::seed::run(&db).await.unwrap();
        router(AppState::new(db, SerializerKind::Data))
    });

    let mut group = c.benchmark_group("HTTP");
    group.measurement_time(Duration::from_secs(8));
    for uri in ["/books", "/books?include=author,ratings", "/authors?include=books.ratings"] {
        group.bench_with_input(BenchmarkId::new("GET", uri), &uri, |b, uri| {
            b.iter(|| {
                rt.block_on(async {
                    let request = Request::builder()
                        .method(Method::GET)
                        .uri(*uri)
                        .body(Body::empty())
                        .unwrap();
                    std::hint::black_box(app.clone().oneshot(request).await.unwrap())
                })
            });
        });
    }
    group.finish();
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
        .with_output_color(true)
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_collections, bench_serializers, bench_include_parsing, bench_http
}
criterion_main!(benches);
