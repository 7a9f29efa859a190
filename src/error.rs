//! Startup error types.
//!
//! Anything returned from here aborts startup: a misconfigured peripheral
//! leaves the exercise non-functional.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// Fatal setup error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// S01: Configuration value rejected before touching hardware
    InvalidConfig(&'static str),
    /// S02: FreeRTOS queue could not be allocated
    QueueAlloc,
    /// S03: Task could not be spawned
    TaskSpawn,
    /// S04: ESP-IDF driver call failed
    #[cfg(target_os = "espidf")]
    Esp(EspError),
}

impl SetupError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "S01",
            Self::QueueAlloc => "S02",
            Self::TaskSpawn => "S03",
            #[cfg(target_os = "espidf")]
            Self::Esp(_) => "S04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidConfig(reason) => reason,
            Self::QueueAlloc => "queue allocation failed",
            Self::TaskSpawn => "task spawn failed",
            #[cfg(target_os = "espidf")]
            Self::Esp(_) => "driver call failed",
        }
    }
}

impl core::fmt::Display for SetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(target_os = "espidf")]
            Self::Esp(e) => write!(f, "{}: {} ({})", self.code(), self.message(), e),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

#[cfg(target_os = "espidf")]
impl From<EspError> for SetupError {
    fn from(e: EspError) -> Self {
        SetupError::Esp(e)
    }
}
