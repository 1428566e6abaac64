use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sa_ascii::rasterizer::Rasterizer;
use sa_core::charset::CHARSET_DENSE;
use sa_core::config::RenderConfig;
use sa_core::frame::{AsciiGrid, FrameBuffer};

fn gradient_frame(width: u32, height: u32) -> FrameBuffer {
    let mut fb = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y) * 255 / (width + height).max(1)) as u8;
            fb.set_pixel(x, y, (v, v / 2, 255 - v, 255));
        }
    }
    fb
}

fn bench_rasterizer(c: &mut Criterion) {
    let config = RenderConfig {
        charset: CHARSET_DENSE.to_string(),
        ..RenderConfig::default()
    };
    let Ok(mut rasterizer) = Rasterizer::new(&config.charset) else {
        return;
    };

    for (w, h) in [(80u32, 24u32), (200, 60), (400, 120)] {
        let frame = gradient_frame(w, h);
        let mut grid = AsciiGrid::new(w, h);
        c.bench_function(&format!("rasterize_{w}x{h}"), |b| {
            b.iter(|| {
                let _ = rasterizer.process(black_box(&frame), black_box(&config), &mut grid);
            });
        });
    }

    let frame = gradient_frame(640, 360);
    let mut grid = AsciiGrid::new(160, 48);
    c.bench_function("rasterize_sampled_640x360_to_160x48", |b| {
        b.iter(|| {
            let _ = rasterizer.process_sampled(black_box(&frame), black_box(&config), &mut grid);
        });
    });
}

criterion_group!(benches, bench_rasterizer);
criterion_main!(benches);
