// src/state/preset.rs
//
// Built-in suggested mixes.

use super::{Sequence, SequenceEvent};

/// A ready-made mix the user can load onto the tape.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sequence: Sequence,
}

impl Preset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        sequence: &[(&str, u64, f32)],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            sequence: sequence
                .iter()
                .map(|&(sound_id, delay_ms, volume)| SequenceEvent::new(sound_id, delay_ms, volume))
                .collect(),
        }
    }
}

/// The suggested mixes shown in the gallery.
pub fn standard_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "ramadan-wakeup",
            "The Ramadan Wake-Up Call",
            "SAHUR ENERGY 💯",
            &[
                ("alarm", 0, 0.8),
                ("tung", 500, 1.0),
                ("tung", 700, 1.0),
                ("tata", 1000, 0.9),
                ("scream", 1200, 0.7),
            ],
        ),
        Preset::new(
            "tribunal-creatures",
            "Tribunal of Creatures",
            "UNHINGED ASSEMBLY",
            &[
                ("bombardiro", 0, 1.0),
                ("brr", 300, 0.8),
                ("bombardiro", 600, 1.0),
                ("chaos", 900, 0.6),
                ("tralalero", 1200, 0.9),
            ],
        ),
        Preset::new(
            "cursed-melody",
            "Cursed Melody",
            "POST-IRONIC SYMPHONY",
            &[
                ("tralalero", 0, 0.9),
                ("tata", 400, 0.7),
                ("tralalero", 800, 0.9),
                ("brr", 1200, 0.8),
                ("tung", 1600, 1.0),
            ],
        ),
    ]
}

/// Look up a preset by id.
pub fn find_preset<'a>(presets: &'a [Preset], id: &str) -> Option<&'a Preset> {
    presets.iter().find(|p| p.id == id)
}
