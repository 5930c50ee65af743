use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordErrorKind {
    Lookup,
    Library,
    Render,
    IO,
}

impl ChordErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            // Lookup
            "E1001" => Self::Lookup,

            // Library
            "E2001" | "E2002" | "E2003" => Self::Library,

            // Render
            "E3001" | "E3002" => Self::Render,

            // IO
            "E4001" => Self::IO,

            _ => Self::Render,
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct ChordError {
    pub code: &'static str,
    pub kind: ChordErrorKind,
    pub message: String,

    pub chord: Option<String>,
    pub file: Option<String>,
}

impl ChordError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: ChordErrorKind::from_code(code),
            message: message.into(),

            chord: None,
            file: None,
        }
    }

    pub fn with_chord(mut self, chord: impl Into<String>) -> Self {
        self.chord = Some(chord.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}
