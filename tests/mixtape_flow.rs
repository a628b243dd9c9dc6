// tests/mixtape_flow.rs
//
// End-to-end: build a tape, play it on a manual clock, share it.

use mixtape::{
    Clock, Command, CommandResult, ManualClock, Mixtape, MixtapeConfig, PlayableBuffer,
    PlaybackSpeed, PlaybackState, SoundBank, SoundCatalog, SoundDescriptor, SoundKind,
    TriggerQueue, decode_mix, read_mix_param,
};

const RATE: f64 = 1_000.0;

fn config() -> MixtapeConfig {
    MixtapeConfig {
        sample_rate: RATE,
        ..MixtapeConfig::default()
    }
}

/// Two sample-backed sounds of 1000 ms and 1200 ms.
fn bank() -> SoundBank {
    let mut catalog = SoundCatalog::new();
    catalog.register(
        SoundDescriptor::new("a", SoundKind::Beep, "A", "🅰️", "first", "bg-red-500")
            .with_audio_file("a.wav"),
    );
    catalog.register(
        SoundDescriptor::new("b", SoundKind::Beep, "B", "🅱️", "second", "bg-blue-500")
            .with_audio_file("b.wav"),
    );

    let mut loader = |path: &str| -> Option<PlayableBuffer> {
        let frames = match path {
            "a.wav" => 1_000,
            "b.wav" => 1_200,
            _ => return None,
        };
        Some(PlayableBuffer::mono(vec![0.1; frames], RATE))
    };
    SoundBank::load(catalog, RATE, 7, &mut loader)
}

fn add(m: &mut Mixtape<ManualClock, TriggerQueue>, id: &str) -> CommandResult {
    m.apply(Command::AddSound {
        sound_id: id.to_string(),
    })
}

fn delays(m: &Mixtape<ManualClock, TriggerQueue>) -> Vec<u64> {
    m.tape().events().iter().map(|e| e.delay_ms).collect()
}

fn advance_to(m: &mut Mixtape<ManualClock, TriggerQueue>, now_ms: f64) -> usize {
    m.engine_mut().clock_mut().set_now(now_ms);
    m.tick()
}

#[test]
fn test_edit_tape() {
    let mut m = Mixtape::with_bank(bank(), &config(), ManualClock::new(), TriggerQueue::new());

    add(&mut m, "a");
    add(&mut m, "b");
    assert_eq!(delays(&m), vec![0, 1200]);

    // Moving B to the front recomputes from scratch.
    assert_eq!(m.apply(Command::Reorder { from: 1, to: 0 }), CommandResult::Ok);
    assert_eq!(delays(&m), vec![0, 1400]);

    // Removal closes the gap.
    m.apply(Command::RemoveSound { index: 0 });
    assert_eq!(delays(&m), vec![0]);

    // New appends count every prior event plus one gap each.
    m.apply(Command::SetLayerMode { enabled: true });
    add(&mut m, "b");
    assert_eq!(delays(&m), vec![0, 1300]);

    assert_eq!(add(&mut m, "nope"), CommandResult::Ignored);
    assert_eq!(m.tape().len(), 2);
}

#[test]
fn test_remove_then_append_stays_in_order() {
    let mut m = Mixtape::new(&config(), ManualClock::new(), TriggerQueue::new());
    add(&mut m, "scream");
    add(&mut m, "tung");
    m.apply(Command::RemoveSound { index: 0 });
    add(&mut m, "tung");

    let d = delays(&m);
    assert_eq!(d, vec![0, 1000]);
    assert!(d.windows(2).all(|w| w[0] <= w[1]));

    // The run lasts until the latest sound is done.
    m.apply(Command::PlayTape);
    advance_to(&mut m, 2_299.0);
    assert!(m.is_playing());
    advance_to(&mut m, 2_300.0);
    assert!(!m.is_playing());
    assert_eq!(m.engine().sink().len(), 2);
}

#[test]
fn test_play_through() {
    let mut m = Mixtape::with_bank(bank(), &config(), ManualClock::new(), TriggerQueue::new());
    add(&mut m, "a");
    add(&mut m, "b");
    add(&mut m, "a");
    assert_eq!(delays(&m), vec![0, 1200, 2600]);

    assert_eq!(m.apply(Command::PlayTape), CommandResult::Ok);
    assert!(m.is_playing());
    assert_eq!(m.apply(Command::PlayTape), CommandResult::Ignored);

    assert_eq!(advance_to(&mut m, 0.0), 1);
    assert_eq!(advance_to(&mut m, 1_199.0), 0);
    assert_eq!(advance_to(&mut m, 1_200.0), 1);
    assert_eq!(advance_to(&mut m, 2_600.0), 1);

    // Last offset + 1000 ms + 500 ms tail.
    assert_eq!(
        m.engine().state(),
        PlaybackState::Playing {
            started_at_ms: 0.0,
            ends_at_ms: 4_100.0,
        }
    );
    advance_to(&mut m, 4_099.0);
    assert!(m.is_playing());
    advance_to(&mut m, 4_100.0);
    assert!(!m.is_playing());

    let fired = m.engine_mut().sink_mut().drain();
    let starts: Vec<_> = fired.iter().map(|t| (t.sound_id.as_str(), t.start_at_ms)).collect();
    assert_eq!(starts, vec![("a", 0.0), ("b", 1_200.0), ("a", 2_600.0)]);
    assert_eq!(m.engine().clock().pending(), 0);
}

#[test]
fn test_speed_scales_estimate_not_offsets() {
    let mut m = Mixtape::with_bank(bank(), &config(), ManualClock::new(), TriggerQueue::new());
    add(&mut m, "a");
    add(&mut m, "b");
    m.apply(Command::SetSpeed {
        speed: PlaybackSpeed::Faster,
    });
    assert_eq!(delays(&m), vec![0, 1200]);

    m.apply(Command::PlayTape);
    advance_to(&mut m, 1_200.0);

    let fired = m.engine().sink().fired();
    assert_eq!(fired.len(), 2);
    assert!(fired.iter().all(|t| t.playback_rate == 1.5));

    // 1200 + 1200 / 1.5 + 500
    advance_to(&mut m, 2_499.0);
    assert!(m.is_playing());
    advance_to(&mut m, 2_500.0);
    assert!(!m.is_playing());
}

#[test]
fn test_stop_and_replay() {
    let mut m = Mixtape::with_bank(bank(), &config(), ManualClock::new(), TriggerQueue::new());
    add(&mut m, "a");
    add(&mut m, "b");

    m.apply(Command::PlayTape);
    advance_to(&mut m, 0.0);
    m.apply(Command::StopTape);
    assert!(!m.is_playing());

    assert_eq!(advance_to(&mut m, 5_000.0), 0);
    assert_eq!(m.engine().sink().len(), 1);

    assert_eq!(m.apply(Command::PlayTape), CommandResult::Ok);
    assert_eq!(advance_to(&mut m, 5_000.0), 1);
    assert_eq!(advance_to(&mut m, 6_200.0), 1);
}

#[test]
fn test_share_link_round_trip() {
    let mut m = Mixtape::with_bank(bank(), &config(), ManualClock::new(), TriggerQueue::new());
    add(&mut m, "a");
    add(&mut m, "b");
    m.apply(Command::SetName {
        name: "Ballerina Breakfast".to_string(),
    });
    m.apply(Command::SetSpeed {
        speed: PlaybackSpeed::Slow,
    });

    let url = m.share_url("https://brainrot.example/").unwrap();
    assert!(url.starts_with("https://brainrot.example/?mix="));

    let query = &url["https://brainrot.example/".len()..];
    let decoded = decode_mix(&read_mix_param(query).unwrap()).unwrap();
    assert_eq!(decoded.name, "Ballerina Breakfast");
    assert_eq!(decoded.speed, PlaybackSpeed::Slow);
    assert_eq!(decoded.sequence, m.tape().events());

    let mut other = Mixtape::with_bank(bank(), &config(), ManualClock::new(), TriggerQueue::new());
    assert!(other.load_from_query(query));
    assert_eq!(other.tape().to_mix(), m.tape().to_mix());
}

#[test]
fn test_standard_board() {
    let mut m = Mixtape::new(&config(), ManualClock::starting_at(100.0), TriggerQueue::new());
    assert_eq!(m.catalog().len(), 8);

    assert_eq!(
        m.apply(Command::PlaySound {
            sound_id: "tralalero".to_string(),
        }),
        CommandResult::Ok
    );
    let fired = m.engine().sink().fired();
    assert_eq!(fired[0].start_at_ms, 100.0);
    assert_eq!(fired[0].duration_ms, 800.0);
    assert!(m.engine().impact_active());

    advance_to(&mut m, 400.0);
    assert!(!m.engine().impact_active());
}
