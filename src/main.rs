//! Nuvecielas entry point
//!
//! The browser build is driven by the page through `platform::wasm`. The
//! native binary plays one headless session on autopilot and prints the
//! result, which is handy for checking balance changes and seeds.
//!
//! Usage: `nuvecielas [words|stars] [profile] [seed] [duration_secs]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nuvecielas::platform::profile_catalog;
    use nuvecielas::sim::autopilot::{key_events, steer};
    use nuvecielas::sim::{GameEvent, Phase, Simulation};
    use nuvecielas::{GameMode, SessionConfig, Tuning};

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = args
        .first()
        .and_then(|s| GameMode::from_str(s))
        .unwrap_or_default();
    let profile = args.get(1).map(String::as_str).unwrap_or("lunaria");
    let seed = args.get(2).and_then(|s| s.parse::<u64>().ok());
    let duration = args.get(3).and_then(|s| s.parse::<f32>().ok()).unwrap_or(30.0);

    let tuning = match std::env::var("NUVECIELAS_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("Could not load tuning from {path}: {err}");
                std::process::exit(2);
            }
        },
        Err(_) => Tuning::default(),
    };

    let mut config = SessionConfig::new(profile, "Autopiloto", mode).with_duration(duration);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut sim = match Simulation::new(tuning) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = sim.start(config) {
        eprintln!("{err}");
        let ids: Vec<String> = profile_catalog().into_iter().map(|p| p.id).collect();
        eprintln!("Profiles: {}", ids.join(", "));
        std::process::exit(2);
    }

    log::info!("Nuvecielas (native) running headless...");

    let frame_ms = 1000.0 / 60.0;
    let mut frame_index: u64 = 0;
    let mut sentences = 0;
    while sim.phase() == Phase::Running {
        let want = steer(sim.player(), sim.entities());
        for event in key_events(sim.input(), want) {
            sim.handle_input(event);
        }
        let frame = sim.tick(frame_index as f64 * frame_ms);
        for event in &frame.events {
            match event {
                GameEvent::LevelUp { level } => println!("  level {level}"),
                GameEvent::SentenceCompleted { sentence } => {
                    sentences += 1;
                    println!("  {sentence}");
                }
                _ => {}
            }
        }
        frame_index += 1;
    }

    let snap = sim.snapshot();
    println!();
    println!(
        "{} on {}: {}",
        snap.player_name,
        snap.profile_label.as_deref().unwrap_or("?"),
        match (snap.won, &snap.fault) {
            (_, Some(fault)) => format!("fault ({fault})"),
            (Some(true), _) => "time up".to_string(),
            _ => "out of lives".to_string(),
        }
    );
    println!(
        "score {}  lives {}  level {}  caught {}  frames {}",
        snap.score, snap.lives, snap.level, snap.caught, frame_index
    );
    if let Some(seed) = snap.seed {
        println!("seed {seed}");
    }
    if mode == GameMode::Words {
        println!("{sentences} sentences, {} words", snap.word_count);
        println!("{}", snap.story);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm::init, this is just to satisfy the compiler
}
