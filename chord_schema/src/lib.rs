use serde::{Deserialize, Serialize};

/// Standard-tuning guitar, low E first.
pub const STRING_COUNT: usize = 6;

/// Highest fret a definition may reference.
pub const MAX_FRET: u8 = 24;

/// Fret rows drawn below the nut (or below the top line when shifted up the neck).
pub const DIAGRAM_FRETS: u8 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum StringState {
    #[serde(rename = "muted")]
    Muted,

    #[serde(rename = "open")]
    Open,

    #[serde(rename = "fretted")]
    Fretted {
        fret: u8,
        #[serde(default)]
        finger: Option<u8>,
    },
}

impl StringState {
    pub fn fret(&self) -> Option<u8> {
        match self {
            StringState::Fretted { fret, .. } => Some(*fret),
            StringState::Muted | StringState::Open => None,
        }
    }

    pub fn finger(&self) -> Option<u8> {
        match self {
            StringState::Fretted { finger, .. } => *finger,
            StringState::Muted | StringState::Open => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChordShape {
    pub strings: [StringState; STRING_COUNT],
    #[serde(default)]
    pub label: Option<String>,
}

impl ChordShape {
    pub fn new(strings: [StringState; STRING_COUNT], label: Option<&str>) -> Self {
        Self {
            strings,
            label: label.map(str::to_string),
        }
    }

    fn fretted(&self) -> impl Iterator<Item = u8> + '_ {
        self.strings.iter().filter_map(StringState::fret)
    }

    /// Fret shown at the top of the grid.
    ///
    /// Shapes that stay within the first three frets, or that touch fret 1,
    /// are drawn from the nut. Anything else is drawn from its lowest fret.
    pub fn base_fret(&self) -> u8 {
        let (Some(min), Some(max)) = (self.fretted().min(), self.fretted().max()) else {
            return 1;
        };
        if max <= 3 || min <= 1 {
            return 1;
        }
        min
    }

    /// Number of fret rows between the base fret and the highest fretted position.
    pub fn span(&self) -> u8 {
        match self.fretted().max() {
            Some(max) => max - self.base_fret() + 1,
            None => 0,
        }
    }
}

/// A chord ready to be drawn: the name used for lookup and the title, plus its shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChordDiagram {
    pub name: String,
    pub shape: ChordShape,
}

/// JSON form of a chord definition.
///
/// `frets`: -1 = muted, 0 = open, N = fretted at N.
/// `fingers`: 0 = no label, 1..=4 = index..little.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChordDef {
    pub frets: Vec<i8>,
    #[serde(default)]
    pub fingers: Option<Vec<u8>>,
    #[serde(default)]
    pub label: Option<String>,
}
