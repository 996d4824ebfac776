mod clock;
mod demo;
mod preview;
mod settings;

use clock::SimClock;
use demo::{DemoFade, DemoSpriteTags};
use preview::PaletteViewer;
use settings::{Action, Settings};

use gba_dns::{AppContext, Dns, DnsConfig, FrameContext, FrameOutcome, GameTime, MapCategory, PaletteBuffer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::filter::EnvFilter;

/// Initialize logging, writing to GBA_DNS_LOG if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("GBA_DNS_LOG") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Game state the DNS reads each frame, owned here in place of a real game.
struct Scene {
    app: AppContext,
    map: MapCategory,
    fade: DemoFade,
    unfaded: PaletteBuffer,
    faded: PaletteBuffer,
    hardware: PaletteBuffer,
    overworld_tags: DemoSpriteTags,
    battle_tags: DemoSpriteTags,
}

impl Scene {
    fn new() -> Self {
        let unfaded = demo::source_palette();
        Scene {
            app: AppContext::Overworld,
            map: MapCategory::Route,
            fade: DemoFade::new(),
            faded: unfaded.clone(),
            unfaded,
            hardware: PaletteBuffer::new(),
            overworld_tags: DemoSpriteTags::overworld(),
            battle_tags: DemoSpriteTags::battle(),
        }
    }

    /// One display frame: fade, DNS build, palette transfer.
    fn run_frame(&mut self, dns: &mut Dns, time: GameTime) -> FrameOutcome {
        self.fade.tick(&self.unfaded, &mut self.faded);
        let tags = if self.app.is_combat() { &self.battle_tags } else { &self.overworld_tags };
        let ctx = FrameContext {
            time,
            app: self.app,
            map: self.map,
            fade_active: self.fade.active,
            sprite_tags: tags,
        };
        let outcome = dns.build_frame(&ctx, &self.faded, &mut self.unfaded);
        dns.transfer(&ctx, &self.faded, &mut self.hardware);
        outcome
    }
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let headless = args.iter().any(|a| a == "--headless");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let config = match config_path {
        Some(path) => DnsConfig::load_from(&path).unwrap_or_else(|e| {
            tracing::error!("Error loading config: {}", e);
            std::process::exit(1);
        }),
        None => DnsConfig::load(),
    };

    let mut dns = Dns::new(config).unwrap_or_else(|e| {
        tracing::error!("Invalid DNS config: {}", e);
        std::process::exit(1);
    });

    let settings = Settings::load();

    if headless {
        run_headless(&mut dns);
    } else {
        run_windowed(&mut dns, &settings);
    }
}

fn run_headless(dns: &mut Dns) {
    let mut scene = Scene::new();
    let mut clock = SimClock::new(GameTime::new(0, 0), 1);
    let mut last_phase = None;

    // One frame per in-game minute: a whole day in 1440 frames
    for _ in 0..clock::MINUTES_PER_DAY {
        let time = clock.now();
        if let FrameOutcome::Built { resolved, stats } = scene.run_frame(dns, time) {
            if last_phase != Some(resolved.phase) {
                let sample = scene.hardware.get(5, 15);
                tracing::info!(
                    "{:02}:{:02} {:<7} filter=({:>2},{:>2},{:>2}) sample=({:>2},{:>2},{:>2}) lit={}",
                    time.hour,
                    time.minute,
                    resolved.phase.name(),
                    resolved.filter.r(),
                    resolved.filter.g(),
                    resolved.filter.b(),
                    sample.r(),
                    sample.g(),
                    sample.b(),
                    stats.lit_cells,
                );
                last_phase = Some(resolved.phase);
            }
        }
        clock.tick();
    }
}

fn run_windowed(dns: &mut Dns, settings: &Settings) {
    let mut viewer = PaletteViewer::new(settings.scale()).unwrap_or_else(|e| {
        tracing::error!("Failed to create window: {}", e);
        std::process::exit(1);
    });

    let key_map = settings.key_map();
    let mut scene = Scene::new();
    let mut clock = SimClock::new(
        GameTime::new(settings.clock.start_hour, settings.clock.start_minute),
        settings.clock.frames_per_minute,
    );

    let frame_duration = Duration::from_nanos(16_742_706); // ~59.7 Hz

    while viewer.is_open() {
        let frame_start = Instant::now();

        for &(key, action) in &key_map {
            if viewer.pressed(key) {
                handle_action(action, dns, &mut scene, &mut clock);
            }
        }

        let time = clock.now();
        let outcome = scene.run_frame(dns, time);
        if clock.tick() {
            tracing::debug!("hour {:02}", clock.now().hour);
        }

        let phase = match outcome {
            FrameOutcome::Built { resolved, .. } => resolved.phase.name(),
            FrameOutcome::Bypassed => "bypassed",
        };
        let title = format!(
            "GBA DNS - {:02}:{:02} {} | {:?} | {:?} | {:?}{}{}",
            time.hour,
            time.minute,
            phase,
            scene.app,
            scene.map,
            dns.policy(),
            if scene.fade.active { " | fade" } else { "" },
            if clock.paused { " | paused" } else { "" },
        );
        viewer.update(&scene.faded, &scene.hardware, &title);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }
}

fn handle_action(action: Action, dns: &mut Dns, scene: &mut Scene, clock: &mut SimClock) {
    match action {
        Action::NextHour => clock.advance_hours(1),
        Action::NextMinute => {
            clock.advance_minutes(1);
        }
        Action::ToggleCombat => {
            scene.app = if scene.app.is_combat() { AppContext::Overworld } else { AppContext::Combat };
        }
        Action::CycleMap => scene.map = scene.map.next(),
        Action::ToggleFade => scene.fade.active = !scene.fade.active,
        Action::TogglePolicy => dns.set_policy(dns.policy().toggled()),
        Action::PauseClock => clock.paused = !clock.paused,
    }
    tracing::debug!(?action, "preview input");
}
