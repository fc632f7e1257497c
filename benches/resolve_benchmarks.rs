//! Resolution benchmarks.
//!
//! Measures the hot paths of the container: cached singleton lookup,
//! transient construction, fuzzy name and parameter fallback, controller
//! routing and view selection.
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin
//! ```

use criterion::{Criterion, criterion_group, criterion_main};
use ligature::prelude::*;
use std::hint::black_box;
use std::sync::Arc;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

trait Repository: Send + Sync {
    fn size(&self) -> usize;
}

#[derive(Default)]
struct MemoryRepository {
    capacity: usize,
}

impl Repository for MemoryRepository {
    fn size(&self) -> usize {
        self.capacity
    }
}

trait Controller: Send + Sync {}

#[derive(Default)]
struct ItemController;
impl Controller for ItemController {}

#[derive(Default)]
struct Item;

#[derive(Default)]
struct ItemView;

fn framework() -> Framework {
    let mut catalog = TypeCatalog::new();
    catalog
        .class::<MemoryRepository>()
        .implements::<dyn Repository>(|r| r)
        .default_constructor()
        .constructor(|capacity: usize, _label: String| MemoryRepository { capacity })
        .build()
        .unwrap();
    catalog
        .class::<ItemController>()
        .implements::<dyn Controller>(|c| c)
        .default_constructor()
        .build()
        .unwrap();
    catalog.class::<Item>().default_constructor().build().unwrap();
    catalog.class::<ItemView>().view_of::<Item>().default_constructor().build().unwrap();

    let mut framework = Framework::new(Arc::new(catalog), FrameworkConfig::default());
    for i in 0..32 {
        let name = format!("repository-{i}");
        framework
            .types
            .register_type::<dyn Repository, MemoryRepository>(Some(&name))
            .unwrap();
    }
    framework
        .types
        .register_singleton_type::<dyn Repository, MemoryRepository>(None)
        .unwrap();

    for i in 0..32 {
        let attr = NavigationControllerAttribute::new(format!("Section{i}/{{id}}"))
            .contract::<dyn Controller>();
        framework
            .controllers
            .register_controller(TypeInfo::of::<ItemController>(), &attr)
            .unwrap();
    }
    let attr = NavigationControllerAttribute::new("Item/{id}/Edit").contract::<dyn Controller>();
    framework
        .controllers
        .register_controller(TypeInfo::of::<ItemController>(), &attr)
        .unwrap();

    framework
        .views
        .register_view(
            TypeInfo::of::<ItemView>(),
            &[ViewAttribute::default().form_factor(FormFactor::PHONE)],
        )
        .unwrap();
    framework
        .views
        .register_view(
            TypeInfo::of::<ItemView>(),
            &[ViewAttribute::default().form_factor(FormFactor::DESKTOP)],
        )
        .unwrap();
    framework
}

fn resolution_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let framework = framework();
    let mut group = c.benchmark_group("resolve");

    group.bench_function("singleton_cached", |b| {
        b.iter(|| {
            let repo = framework.resolve::<dyn Repository>(None).unwrap();
            end_profiling_frame();
            black_box(repo)
        })
    });

    group.bench_function("transient_named", |b| {
        b.iter(|| black_box(framework.resolve::<dyn Repository>(Some("repository-17")).unwrap()))
    });

    group.bench_function("fuzzy_name", |b| {
        b.iter(|| {
            black_box(
                framework
                    .resolve_with::<dyn Repository>(
                        Some("repostory-17"),
                        Vec::new(),
                        ResolveOptions::USE_FUZZY_NAME_RESOLUTION,
                    )
                    .unwrap(),
            )
        })
    });

    group.bench_function("fuzzy_parameters", |b| {
        b.iter(|| {
            let args = vec![Argument::value(8usize)];
            black_box(
                framework
                    .resolve_with::<dyn Repository>(
                        Some("repository-3"),
                        args,
                        ResolveOptions::USE_FUZZY_PARAMETER_RESOLUTION,
                    )
                    .unwrap(),
            )
        })
    });

    group.finish();
}

fn routing_benchmarks(c: &mut Criterion) {
    let framework = framework();
    let contract = TypeInfo::of::<dyn Controller>();
    let model = framework.catalog().instance(Arc::new(Item));
    let mut group = c.benchmark_group("route");

    group.bench_function("controller_uri", |b| {
        b.iter(|| black_box(framework.navigate(contract, "/Item/42/Edit").unwrap()))
    });

    group.bench_function("view_for_model", |b| {
        b.iter(|| black_box(framework.view_for(&model, None).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, resolution_benchmarks, routing_benchmarks);
criterion_main!(benches);
