use std::{collections::BTreeMap, fs, path::Path};

use chord_schema::{ChordDef, ChordDiagram, ChordShape, StringState, DIAGRAM_FRETS, MAX_FRET, STRING_COUNT};

use crate::ChordError;

const X: StringState = StringState::Muted;
const O: StringState = StringState::Open;

const fn f(fret: u8, finger: u8) -> StringState {
    StringState::Fretted {
        fret,
        finger: Some(finger),
    }
}

// low E .. high e
const BUILTIN: &[(&str, [StringState; STRING_COUNT], Option<&str>)] = &[
    ("C", [X, f(3, 3), f(2, 2), O, f(1, 1), O], Some("Open C")),
    ("Cmaj7", [X, f(3, 3), f(2, 2), O, O, O], None),
    ("Cdim7", [X, f(3, 2), f(4, 3), f(2, 1), f(4, 4), f(2, 1)], Some("C diminished 7")),
    ("D#m", [X, f(6, 1), f(8, 3), f(8, 4), f(7, 2), f(6, 1)], Some("6th fret barre")),
    ("D#", [X, f(6, 1), f(8, 2), f(8, 3), f(8, 4), f(6, 1)], None),
    ("Eb", [X, f(6, 1), f(8, 2), f(8, 3), f(8, 4), f(6, 1)], None),
    ("E", [O, f(2, 2), f(2, 3), f(1, 1), O, O], None),
    ("Em", [O, f(2, 2), f(2, 3), O, O, O], None),
    ("Em7", [O, f(2, 1), f(2, 2), O, f(3, 3), O], None),
    ("Bm7b5", [X, f(2, 1), f(3, 3), f(2, 2), f(3, 4), X], Some("Half-diminished")),
    ("F9", [f(1, 1), X, f(1, 1), f(2, 2), f(1, 1), f(3, 4)], None),
    ("F13", [f(1, 1), X, f(1, 1), f(2, 2), f(3, 3), f(3, 4)], None),
    ("G", [f(3, 2), f(2, 1), O, O, O, f(3, 3)], None),
];

/// Chord name -> shape table used for lookup.
#[derive(Debug, Clone, Default)]
pub struct ChordLibrary {
    shapes: BTreeMap<String, ChordShape>,
}

impl ChordLibrary {
    pub fn builtin() -> Self {
        let shapes = BUILTIN
            .iter()
            .map(|(name, strings, label)| (name.to_string(), ChordShape::new(*strings, *label)))
            .collect();
        Self { shapes }
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ChordError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|e| {
            ChordError::new("E2001", format!("failed to read chord library {}: {e}", path.display()))
                .with_file(path.display().to_string())
        })?;
        Self::from_json_str(&src).map_err(|e| e.with_file(path.display().to_string()))
    }

    pub fn from_json_str(src: &str) -> Result<Self, ChordError> {
        let defs: BTreeMap<String, ChordDef> = serde_json::from_str(src)
            .map_err(|e| ChordError::new("E2002", format!("invalid chord library json: {e}")))?;

        let mut shapes = BTreeMap::new();
        for (name, def) in defs {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ChordError::new("E2003", "chord names must be non-empty"));
            }
            // names double as the default output file name
            if name.contains(['/', '\\']) {
                return Err(
                    ChordError::new("E2003", format!("chord name '{name}' must not contain a path separator"))
                        .with_chord(name),
                );
            }
            let shape = shape_from_def(&def).map_err(|e| e.with_chord(name.clone()))?;
            shapes.insert(name, shape);
        }
        Ok(Self { shapes })
    }

    /// Adds every chord of `other`, replacing entries with the same name.
    pub fn merge(&mut self, other: ChordLibrary) {
        for (name, shape) in other.shapes {
            if self.shapes.contains_key(&name) {
                log::warn!("chord library overrides built-in chord {name}");
            }
            self.shapes.insert(name, shape);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ChordShape> {
        self.shapes.get(name)
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Result<ChordDiagram, ChordError> {
        let Some(shape) = self.shapes.get(name) else {
            let available = self.names().collect::<Vec<_>>().join(", ");
            return Err(ChordError::new(
                "E1001",
                format!("unknown chord '{name}' (available: {available})"),
            )
            .with_chord(name));
        };

        log::debug!("found chord {name}: base fret {}", shape.base_fret());
        Ok(ChordDiagram {
            name: name.to_string(),
            shape: shape.clone(),
        })
    }
}

fn shape_from_def(def: &ChordDef) -> Result<ChordShape, ChordError> {
    if def.frets.len() != STRING_COUNT {
        return Err(ChordError::new(
            "E2003",
            format!(
                "chord definitions must have exactly {STRING_COUNT} fret values (got {})",
                def.frets.len()
            ),
        ));
    }

    let fingers = match &def.fingers {
        Some(fingers) if fingers.len() != STRING_COUNT => {
            return Err(ChordError::new(
                "E2003",
                format!(
                    "fingers must have exactly {STRING_COUNT} values (got {})",
                    fingers.len()
                ),
            ));
        }
        Some(fingers) => fingers.clone(),
        None => vec![0; STRING_COUNT],
    };

    let mut strings = [StringState::Muted; STRING_COUNT];
    for (i, (&fret, &finger)) in def.frets.iter().zip(&fingers).enumerate() {
        if finger > 4 {
            return Err(ChordError::new(
                "E2003",
                format!("finger must be 0..=4 (string {}, finger {finger})", i + 1),
            ));
        }
        strings[i] = match fret {
            -1 | 0 if finger != 0 => {
                return Err(ChordError::new(
                    "E2003",
                    format!("finger given for an unfretted string (string {})", i + 1),
                ));
            }
            -1 => StringState::Muted,
            0 => StringState::Open,
            n if n > 0 && n as u8 <= MAX_FRET => StringState::Fretted {
                fret: n as u8,
                finger: (finger != 0).then_some(finger),
            },
            n => {
                return Err(ChordError::new(
                    "E2003",
                    format!("fret must be -1..={MAX_FRET} (string {}, fret {n})", i + 1),
                ));
            }
        };
    }

    let shape = ChordShape::new(strings, def.label.as_deref());
    if shape.span() > DIAGRAM_FRETS {
        return Err(ChordError::new(
            "E2003",
            format!(
                "shape spans {} frets from fret {}; diagrams show {DIAGRAM_FRETS}",
                shape.span(),
                shape.base_fret()
            ),
        ));
    }
    Ok(shape)
}
