use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModemError {
    #[error("failed to detect preamble")]
    PreambleNotFound,

    #[error("audio too short to read the length field")]
    InsufficientData,

    #[error("packet too short: {0} bytes")]
    PacketTooShort(usize),

    #[error("invalid packet magic")]
    InvalidMagic,

    #[error("packet field lengths exceed the received buffer")]
    TruncatedPacket,

    #[error("file name must not be empty")]
    EmptyFileName,

    #[error("payload too large to frame: {0} bytes")]
    PayloadTooLarge(usize),

    #[error("only PCM wave files are supported")]
    UnsupportedAudioFormat,

    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, ModemError>;
