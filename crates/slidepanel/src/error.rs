use std::fmt;

/// Invalid construction-time panel parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidExtents { min: f64, max: f64 },
    SnapPointOutOfRange { value: f64 },
    BackdropOpacityOutOfRange { value: f64 },
    InvalidFlingThreshold { threshold: f64, multiplier: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidExtents { min, max } => write!(
                f,
                "invalid panel extents min={min} max={max}; both must be positive and max > min"
            ),
            ConfigError::SnapPointOutOfRange { value } => {
                write!(f, "snap point {value} must lie strictly between 0 and 1")
            }
            ConfigError::BackdropOpacityOutOfRange { value } => {
                write!(f, "backdrop opacity {value} must lie within [0, 1]")
            }
            ConfigError::InvalidFlingThreshold {
                threshold,
                multiplier,
            } => write!(
                f,
                "fling threshold {threshold} must be positive and snap override multiplier {multiplier} at least 1"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// API misuse that can never succeed without changing the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    /// The controller is not bound to a live panel.
    NotAttached,
    /// A snap point operation was requested on a panel without one.
    SnapPointMissing,
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreconditionError::NotAttached => {
                write!(f, "panel controller must be attached to a panel")
            }
            PreconditionError::SnapPointMissing => {
                write!(f, "panel has no snap point configured")
            }
        }
    }
}

impl std::error::Error for PreconditionError {}

/// Position argument outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeError {
    pub value: f64,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel position {} is outside [0, 1]", self.value)
    }
}

impl std::error::Error for RangeError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelError {
    Precondition(PreconditionError),
    Range(RangeError),
}

impl PanelError {
    pub fn is_not_attached(&self) -> bool {
        matches!(self, PanelError::Precondition(PreconditionError::NotAttached))
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Precondition(err) => err.fmt(f),
            PanelError::Range(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for PanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelError::Precondition(err) => Some(err),
            PanelError::Range(err) => Some(err),
        }
    }
}

impl From<PreconditionError> for PanelError {
    fn from(err: PreconditionError) -> Self {
        PanelError::Precondition(err)
    }
}

impl From<RangeError> for PanelError {
    fn from(err: RangeError) -> Self {
        PanelError::Range(err)
    }
}

/// Checks that `value` is a position in `[0, 1]`.
pub(crate) fn check_position(value: f64) -> Result<f64, RangeError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(RangeError { value })
    }
}
