use crate::gateway::GatewayError;
use crate::memory::MemoryError;
use crate::provider::ProviderError;

#[derive(Debug)]
pub enum RelayError {
    Memory(MemoryError),
    Provider(ProviderError),
    Gateway(GatewayError),
}

impl From<MemoryError> for RelayError {
    fn from(err: MemoryError) -> Self {
        RelayError::Memory(err)
    }
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        RelayError::Provider(err)
    }
}

impl From<GatewayError> for RelayError {
    fn from(err: GatewayError) -> Self {
        RelayError::Gateway(err)
    }
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory(err) => write!(f, "Memory error: {}", err),
            Self::Provider(err) => write!(f, "Provider error: {}", err),
            Self::Gateway(err) => write!(f, "Gateway error: {}", err),
        }
    }
}

impl std::error::Error for RelayError {}

pub type Result<T> = std::result::Result<T, RelayError>;
