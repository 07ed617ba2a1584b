use criterion::{Bencher, BenchmarkId, Criterion, criterion_group, criterion_main};
use fragtest::render::*;

// 1024x1024 target, one fragment per pixel, all at the same depth
fn build_1m_fragments(z: f32) -> Vec<Fragment> {
    let mut fragments = Vec::<Fragment>::with_capacity(1024 * 1024);
    for y in 0..1024 {
        for x in 0..1024 {
            fragments.push(Fragment::new(x, y, z));
        }
    }
    fragments
}

fn criterion_benchmark(c: &mut Criterion) {
    let fragments = build_1m_fragments(0.5);
    let states = [
        ("DepthOnly", DepthStencilState::depth_only(DepthState::less())),
        ("StencilOnly", DepthStencilState::stencil_only(StencilState::write(1))),
        ("DepthStencil", DepthStencilState::new(Some(StencilState::write(1)), Some(DepthState::less()))),
    ];

    fn serial(bencher: &mut Bencher, (state, fragments): &(DepthStencilState, &[Fragment])) {
        let mut store = BufferStore::new(1024, 1024);
        bencher.iter(|| {
            store.clear_depth(1.0);
            store.clear_stencil();
            std::hint::black_box(store.fragment_tester(*state).test_all(fragments));
        })
    }

    fn parallel(bencher: &mut Bencher, (state, fragments): &(DepthStencilState, &[Fragment])) {
        let mut store = BufferStore::new(1024, 1024);
        bencher.iter(|| {
            store.clear_depth(1.0);
            store.clear_stencil();
            std::hint::black_box(store.test_fragments_parallel(*state, fragments, 64));
        })
    }

    let mut group = c.benchmark_group("Test 1M fragments");
    for (name, state) in states {
        let input = (state, fragments.as_slice());
        group.bench_with_input(BenchmarkId::new("Serial", name), &input, serial);
        group.bench_with_input(BenchmarkId::new("Parallel", name), &input, parallel);
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
