
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{CreateProduct, CreateReview, LocalCategoryValidator, ProductService, ReviewService};
use rust_decimal::Decimal;
use store::{
    CategoryStore, InMemoryCategoryStore, InMemoryProductStore, InMemoryReviewStore, NewCategory,
    ProductId, ProductPatch,
};
use validator::InMemoryDependencyValidator;

fn bench_create_product(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let categories = InMemoryDependencyValidator::categories();
    categories.insert("E1");
    let service = ProductService::new(InMemoryProductStore::new(), categories);

    c.bench_function("product/create_validated", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .create(CreateProduct::new("Phone", Decimal::new(99999, 2), "E1"))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_create_product_local_validator(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let category_store = InMemoryCategoryStore::new();
    let category_id = rt.block_on(async {
        category_store
            .insert(NewCategory {
                name: "Electronics".to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
            .to_string()
    });
    let service = ProductService::new(
        InMemoryProductStore::new(),
        LocalCategoryValidator::new(category_store),
    );

    c.bench_function("product/create_local_validator", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .create(CreateProduct::new("Phone", Decimal::ONE, category_id.as_str()))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_update_without_category(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let categories = InMemoryDependencyValidator::categories();
    categories.insert("E1");
    let service = ProductService::new(InMemoryProductStore::new(), categories);
    let id = rt.block_on(async {
        service
            .create(CreateProduct::new("Phone", Decimal::ONE, "E1"))
            .await
            .unwrap()
            .id
    });

    c.bench_function("product/update_price_only", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .update(
                        id,
                        ProductPatch {
                            price: Some(Decimal::TEN),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_create_review(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let products = InMemoryDependencyValidator::products();
    products.insert("1");
    let service = ReviewService::with_product_validator(InMemoryReviewStore::new(), products);

    c.bench_function("review/create_validated", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .create(CreateReview::new(ProductId::new(1), 5))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_product,
    bench_create_product_local_validator,
    bench_update_without_category,
    bench_create_review
);
criterion_main!(benches);
