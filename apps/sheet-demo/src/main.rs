use std::thread;
use std::time::Duration;

use anyhow::Context;
use sheetpose_foundation::PointerEvent;
use sheetpose_transition::{BottomSheet, ModalHost, SessionState, SheetConfig, SheetSurface};
use sheetpose_ui_graphics::{EdgeInsets, Point, Rect, Size};
use web_time::Instant;

const FRAME: Duration = Duration::from_millis(16);
const SCREEN: Size = Size::new(390.0, 844.0);

/// Feeds pointer events and frames to a host in real time.
struct Driver {
    host: ModalHost,
    started: Instant,
}

impl Driver {
    fn new(host: ModalHost) -> Self {
        Self {
            host,
            started: Instant::now(),
        }
    }

    fn uptime_nanos(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn frame(&self) {
        thread::sleep(FRAME);
        self.host.advance_to(Instant::now());
    }

    fn settle(&self, sheet: &BottomSheet) {
        while self.host.has_pending_frames() {
            self.frame();
            render(sheet, self.host.transition_progress());
        }
    }

    fn send(&self, event: PointerEvent) {
        self.host.dispatch_pointer_event(&event);
    }

    fn drag(&self, sheet: &BottomSheet, from: Point, to: Point, duration: Duration) {
        self.send(PointerEvent::down(from, self.uptime_nanos()));
        let steps = (duration.as_millis() / FRAME.as_millis()).max(1) as u32;
        let mut position = from;
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            position = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            self.frame();
            self.send(PointerEvent::moved(position, self.uptime_nanos()));
            render(sheet, self.host.transition_progress());
        }
        self.send(PointerEvent::up(position, self.uptime_nanos()));
        self.settle(sheet);
    }

    fn tap(&self, sheet: &BottomSheet, at: Point) {
        self.send(PointerEvent::down(at, self.uptime_nanos()));
        self.frame();
        self.send(PointerEvent::up(at, self.uptime_nanos()));
        self.settle(sheet);
    }
}

fn render(sheet: &BottomSheet, progress: Option<f32>) {
    let surface = sheet.surface();
    let surface = surface.borrow();
    let offset = surface
        .content_view()
        .map(|content| content.layer.translation_y)
        .unwrap_or_default();
    let dim = surface.container().background.a();
    let filled = ((1.0 - dim / 0.6).clamp(0.0, 1.0) * 20.0).round() as usize;
    println!(
        "  {:<28} offset {:>6.1}  dim [{}{}]  {}",
        format!("{:?}", sheet.state()),
        offset,
        "#".repeat(20 - filled),
        ".".repeat(filled),
        progress.map_or_else(String::new, |p| format!("{:>3.0}%", p * 100.0))
    );
}

fn load_config() -> anyhow::Result<SheetConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SheetConfig::default());
    };
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("reading config from {path}"))?;
    let config: SheetConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing config in {path}"))?;
    log::info!("loaded sheet config from {path}: {config:?}");
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = load_config()?;
    let host = ModalHost::new(Rect::from_size(SCREEN));
    let surface = SheetSurface::new("demo sheet", 400.0)
        .with_safe_area(EdgeInsets::from_components(0.0, 47.0, 0.0, 34.0));
    let sheet = BottomSheet::new(surface, config)?;
    sheet.set_on_user_dismiss(|| println!("  -> dismissed by the user"));
    let driver = Driver::new(host.clone());

    println!("=== Sheetpose Bottom Sheet Demo ===");

    println!("Presenting:");
    host.present(&sheet)?;
    driver.settle(&sheet);

    let grab = Point::new(195.0, 560.0);
    println!("Short drag, released slowly (snaps back):");
    driver.drag(&sheet, grab, Point::new(195.0, 640.0), Duration::from_millis(400));

    println!("Long drag (dismisses):");
    driver.drag(&sheet, grab, Point::new(195.0, 820.0), Duration::from_millis(400));

    println!("Presenting again, then a quick flick:");
    host.present(&sheet)?;
    driver.settle(&sheet);
    driver.drag(&sheet, grab, Point::new(195.0, 640.0), Duration::from_millis(32));

    println!("Presenting again, then tapping the dimmed background:");
    host.present(&sheet)?;
    driver.settle(&sheet);
    driver.tap(&sheet, Point::new(195.0, 120.0));

    println!("Presenting again, then dismissing from code:");
    host.present(&sheet)?;
    driver.settle(&sheet);
    host.dismiss_with(|| println!("  -> programmatic dismissal finished"))?;
    driver.settle(&sheet);

    if sheet.state() != SessionState::Dismissed {
        anyhow::bail!("sheet ended in {:?}", sheet.state());
    }
    println!("Done.");
    Ok(())
}
