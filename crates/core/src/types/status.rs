//! Status enums for payments and service history records.

use serde::{Deserialize, Serialize};

/// Payment session status.
///
/// `Completed`, `Cancelled`, and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    Failed,
}

impl PaymentStatus {
    /// Whether the session can no longer change state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Lifecycle status of a service-history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    #[default]
    Confirmed,
    TechnicianAssigned,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceStatus {
    /// Whether the booking can still be cancelled by the customer.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Confirmed | Self::TechnicianAssigned)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::TechnicianAssigned => write!(f, "technician-assigned"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "technician-assigned" => Ok(Self::TechnicianAssigned),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid service status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_terminal_states() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
    }

    #[test]
    fn test_service_status_roundtrip() {
        for status in [
            ServiceStatus::Confirmed,
            ServiceStatus::TechnicianAssigned,
            ServiceStatus::InProgress,
            ServiceStatus::Completed,
            ServiceStatus::Cancelled,
        ] {
            let parsed: ServiceStatus = status.to_string().parse().expect("roundtrip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_cancellable() {
        assert!(ServiceStatus::Confirmed.is_cancellable());
        assert!(!ServiceStatus::InProgress.is_cancellable());
        assert!(!ServiceStatus::Completed.is_cancellable());
    }
}
