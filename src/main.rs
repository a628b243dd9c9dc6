// src/main.rs
//
// Native demo: builds a tape, plays it against the wall clock and prints
// a share link.
//
// Usage: mixtape-engine [config.json] [?mix=... query]

use std::time::Duration;

use mixtape::{Command, LogSink, Mixtape, MixtapeConfig, SystemClock};

/// ===============================
/// Main
/// ===============================

fn main() {
    // Set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) if !path.starts_with('?') => match MixtapeConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        Some(query) => {
            // No config given; the first argument is already the query.
            return run(MixtapeConfig::default(), Some(query));
        }
        None => MixtapeConfig::default(),
    };

    run(config, args.next());
}

fn run(config: MixtapeConfig, query: Option<String>) {
    let mut mixtape = Mixtape::new(&config, SystemClock::new(), LogSink);
    log::info!(
        "Loaded {} sounds at {} Hz",
        mixtape.bank().len(),
        mixtape.bank().sample_rate()
    );

    // --------------------------------
    // Tape
    // --------------------------------

    let loaded = query
        .as_deref()
        .is_some_and(|query| mixtape.load_from_query(query));

    if !loaded {
        for sound_id in ["tung", "tung", "tata", "scream"] {
            mixtape.apply(Command::AddSound {
                sound_id: sound_id.to_string(),
            });
        }
        mixtape.apply(Command::SetName {
            name: "Sahur Sanity Check".to_string(),
        });
    }

    for (index, event) in mixtape.tape().events().iter().enumerate() {
        log::info!(
            "#{} {} +{}ms (vol {:.2})",
            index + 1,
            event.sound_id,
            event.delay_ms,
            event.volume
        );
    }

    // --------------------------------
    // Playback
    // --------------------------------

    mixtape.apply(Command::PlayTape);

    while mixtape.is_playing() {
        mixtape.tick();

        let wait_ms = mixtape
            .engine()
            .clock()
            .until_next_ms()
            .unwrap_or(0.0)
            .clamp(1.0, 50.0);
        std::thread::sleep(Duration::from_secs_f64(wait_ms / 1000.0));
    }

    let stats = mixtape.stats();
    log::info!(
        "Done: {} sounds, {}x, {}",
        stats.sounds,
        stats.speed.factor(),
        if stats.layer_mode { "LAYER" } else { "SEQUENCE" }
    );

    if let Some(url) = mixtape.share_url("https://brainrot.example/") {
        println!("{}", url);
    }
}
