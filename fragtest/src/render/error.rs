use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FragmentTestError {
    #[error("coordinate ({x}, {y}) is out of bounds of a {width}x{height} buffer")]
    OutOfBounds { x: u16, y: u16, width: usize, height: usize },

    #[error("{value} is not a valid {kind} code")]
    InvalidEnumValue { kind: &'static str, value: u8 },
}
