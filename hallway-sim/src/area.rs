//! Layout of the hallway and its randomization.
use crate::config::HallwayWorldConfig;
use hallway_core::{EntityKind, SensedEntity};
use log::trace;
use rand::Rng;

/// Symbols shown in the hallway for one episode.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaLayout {
    /// Symbols of the cues, `true` for X.
    pub cues: Vec<bool>,

    /// Symbols associated with the left and right pads, `true` for X.
    pub pads: [bool; 2],

    /// If the area is rotated by 180 degrees around its center.
    pub rotated: bool,
}

impl AreaLayout {
    /// The layout before any randomization: O cues, X on the left pad.
    pub fn new(n_cues: usize) -> Self {
        Self {
            cues: vec![false; n_cues],
            pads: [true, false],
            rotated: false,
        }
    }

    /// Draws a new layout.
    ///
    /// Every cue is X or O with equal probability. The pad symbols are swapped,
    /// and the area is rotated, each with probability 1/2.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for cue in self.cues.iter_mut() {
            *cue = rng.gen_bool(0.5);
        }
        if rng.gen_bool(0.5) {
            self.pads = [!self.pads[0], !self.pads[1]];
        }
        if rng.gen_bool(0.5) {
            self.rotated = !self.rotated;
        }
        trace!("Randomized area: {:?}", self);
    }

    /// Returns `true` if X cues outnumber O cues.
    pub fn more_xs(&self) -> bool {
        let n_xs = self.cues.iter().filter(|x| **x).count();
        n_xs > self.cues.len() - n_xs
    }

    /// Returns the cues and pads placed in the hallway.
    pub fn entities(&self, config: &HallwayWorldConfig) -> Vec<SensedEntity> {
        let n = self.cues.len();
        let cues = self.cues.iter().enumerate().map(|(i, &x)| {
            let offset = (i as f32 - (n as f32 - 1.0) / 2.0) * config.spacing;
            self.place(EntityKind::Cue, x, [offset, config.cue_row])
        });
        let half = config.spacing / 2.0;
        let pads = vec![
            self.place(EntityKind::Target, self.pads[0], [-half, config.pad_row]),
            self.place(EntityKind::Target, self.pads[1], [half, config.pad_row]),
        ];
        cues.chain(pads).collect()
    }

    fn place(&self, kind: EntityKind, value: bool, position: [f32; 2]) -> SensedEntity {
        let position = if self.rotated {
            [-position[0], -position[1]]
        } else {
            position
        };
        SensedEntity {
            kind,
            value: Some(value),
            position,
        }
    }
}
