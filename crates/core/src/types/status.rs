//! Status enums for orders and customers.

use serde::{Deserialize, Serialize};

/// Payment status of an order.
///
/// Only a status field is tracked; there is no payment gateway integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Complete,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "complete" => Ok(Self::Complete),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// Customer membership tier.
///
/// New customers always start at `Bronze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "membership", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl std::fmt::Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bronze => write!(f, "bronze"),
            Self::Silver => write!(f, "silver"),
            Self::Gold => write!(f, "gold"),
        }
    }
}

impl std::str::FromStr for Membership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            _ => Err(format!("invalid membership tier: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn payment_status_defaults_to_pending() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }

    #[test]
    fn payment_status_round_trips_through_str() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Complete,
            PaymentStatus::Failed,
        ] {
            assert_eq!(
                PaymentStatus::from_str(&status.to_string()).unwrap(),
                status
            );
        }
        assert!(PaymentStatus::from_str("refunded").is_err());
    }

    #[test]
    fn membership_defaults_to_bronze() {
        assert_eq!(Membership::default(), Membership::Bronze);
    }

    #[test]
    fn membership_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Membership::Gold).unwrap(), "\"gold\"");
        let back: Membership = serde_json::from_str("\"silver\"").unwrap();
        assert_eq!(back, Membership::Silver);
    }
}
