use std::fmt;

const PTR_CODE: u16 = 12;

/// Query type as seen by the synthesis core. Only `PTR` is interesting here;
/// every other type is carried through by its numeric code and forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    PTR,
    Other(u16),
}

impl RecordType {
    pub fn from_code(code: u16) -> Self {
        match code {
            PTR_CODE => RecordType::PTR,
            other => RecordType::Other(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            RecordType::PTR => PTR_CODE,
            RecordType::Other(code) => *code,
        }
    }

    pub fn is_ptr(&self) -> bool {
        matches!(self, RecordType::PTR)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::PTR => write!(f, "PTR"),
            RecordType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}
