use std::cell::Cell;
use std::fs;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use slidekit::{Carousel, CarouselEvent, CarouselOptions, Placement, Surface};
use slidekit_core::Runtime;
use slidekit_foundation::{FixedWidth, PointerSample, WidthProbe};

const FRAME_MILLIS: u64 = 16;

/// Viewport whose width the script can change while the carousel owns it.
struct Viewport(Rc<Cell<f32>>);

impl WidthProbe for Viewport {
    fn rendered_width(&self) -> f32 {
        self.0.get()
    }
}

/// Prints every placement instead of drawing.
struct ConsoleSurface {
    viewport: Viewport,
    pages: Vec<FixedWidth>,
}

impl Surface for ConsoleSurface {
    type Page = String;

    fn viewport(&self) -> &dyn WidthProbe {
        &self.viewport
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_probe(&self, index: usize) -> Option<&dyn WidthProbe> {
        self.pages.get(index).map(|page| page as &dyn WidthProbe)
    }

    fn page(&self, index: usize) -> Option<String> {
        (index < self.pages.len()).then(|| format!("page-{index}"))
    }

    fn place(&mut self, placement: Placement) {
        if placement.is_animated() {
            println!(
                "  place page {} -> {:.1}px over {}ms",
                placement.page, placement.offset, placement.duration_millis
            );
        } else {
            log::debug!("place page {} -> {:.1}px", placement.page, placement.offset);
        }
    }

    fn detach(&mut self) {
        println!("  surface detached");
    }
}

/// Wall-clock session pumping the runtime once per frame.
struct Session {
    runtime: Runtime,
    carousel: Carousel<ConsoleSurface>,
}

impl Session {
    fn now(&self) -> u64 {
        self.runtime.elapsed_millis()
    }

    fn advance(&self, millis: u64) {
        let target = self.now() + millis;
        while self.now() < target {
            thread::sleep(Duration::from_millis(FRAME_MILLIS));
            self.runtime.pump_elapsed();
        }
    }

    fn swipe(&self, delta_x: f32, duration_millis: u64) {
        let steps = (duration_millis / FRAME_MILLIS).max(1);
        let start_x = 480.0;
        self.carousel
            .pointer_down(PointerSample::new(start_x, 200.0, self.now()));
        for step in 1..=steps {
            self.advance(FRAME_MILLIS);
            let x = start_x + delta_x * step as f32 / steps as f32;
            self.carousel
                .pointer_move(PointerSample::new(x, 200.0, self.now()));
        }
        let response = self.carousel.pointer_up(self.now());
        log::info!("released: {response:?}");
    }

    fn step(&self, title: &str) {
        println!(
            "[{:>5}ms] {title}: index {} of {}",
            self.runtime.now_millis(),
            self.carousel.current_slide(),
            self.carousel.position_count()
        );
    }
}

fn load_options(path: Option<String>) -> anyhow::Result<CarouselOptions> {
    let Some(path) = path else {
        return Ok(CarouselOptions::new().with_auto_advance(2_000));
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing carousel options in {path}"))
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let options = load_options(std::env::args().nth(1))?;
    log::info!("options: {options:?}");

    println!("=== slidekit carousel demo ===");
    println!("Eight 320px pages in a 960px viewport, driven by a scripted session.");
    println!();

    let width = Rc::new(Cell::new(960.0));
    let surface = ConsoleSurface {
        viewport: Viewport(Rc::clone(&width)),
        pages: vec![FixedWidth(320.0); 8],
    };
    let runtime = Runtime::headless();
    let carousel = Carousel::new(Some(surface), options, runtime.handle());
    if carousel.is_inert() {
        bail!("carousel has nothing to show");
    }
    carousel.on_any(|event: &CarouselEvent| println!("  event {}: {event:?}", event.kind()));

    let session = Session {
        runtime,
        carousel: carousel.clone(),
    };
    session.step("start");

    carousel.next();
    session.advance(400);
    session.step("after next");

    carousel.next_page();
    session.advance(400);
    session.step("after next_page");

    session.swipe(-260.0, 96);
    session.advance(2_000);
    session.step("after toss");

    session.swipe(120.0, 400);
    session.advance(400);
    session.step("after slow drag");

    session.advance(2_500);
    session.step("after auto-advance window");

    width.set(640.0);
    carousel.check_size_change();
    session.step("after resize");

    carousel.to(-1, Some(0));
    session.step("after to(-1)");

    carousel.kill();
    session.advance(1_000);
    println!();
    println!(
        "killed: {}, pending work: {}",
        carousel.is_killed(),
        session.runtime.has_pending_work()
    );
    Ok(())
}
