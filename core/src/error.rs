use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TacticianError {
    #[error("No card slots available")]
    NoSlotsAvailable,
    #[error("Card slot {0} is outside the hand")]
    InvalidSlot(usize),
    #[error("Emulator failure: {0}")]
    Emulator(String),
}

pub type TacticianResult<T> = Result<T, TacticianError>;
