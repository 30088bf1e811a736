//! Error types shared by the fixture core and its collaborators.

/// Failure of a register transfer on the sensor bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The device did not acknowledge its address.
    #[error("address not acknowledged")]
    AddressNack,
    /// The device did not acknowledge a data byte.
    #[error("data not acknowledged")]
    DataNack,
    /// Another controller won bus arbitration.
    #[error("bus arbitration lost")]
    ArbitrationLost,
    /// The transfer did not complete within the retry budget.
    #[error("bus busy, retries exhausted")]
    Busy,
}

/// Failure to obtain an illuminance reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    /// One of the ADC channels saturated, the reading is meaningless.
    #[error("sensor channel overflow")]
    Overflow,
    /// The integration cycle never reported a valid sample.
    #[error("sensor integration did not complete")]
    NotReady,
}

/// Rejected fixture requests. None of these are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FixtureError {
    #[error("profile index {0} out of range")]
    InvalidIndex(u8),
    #[error("unknown channel")]
    InvalidChannel,
    #[error("ambient sensor not detected")]
    SensorAbsent,
    #[error("fixture is disabled")]
    Disabled,
}

/// Shell line that could not be turned into a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid command.")]
    Unknown,
    #[error("missing argument")]
    MissingArgument,
    #[error("invalid argument")]
    InvalidArgument,
}
