use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Lifecycle of an order as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Completed and cancelled orders accept no further changes.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CoreError::InvalidOrderStatus(s.to_string()))
    }
}

/// Price of `quantity` bags at `discounted_price` each.
#[must_use]
pub fn total_price(discounted_price: f64, quantity: u32) -> f64 {
    discounted_price * f64::from(quantity)
}

/// Clamps a requested quantity to `[1, quantity_left]`.
///
/// Returns `None` when the bag is sold out and ordering is disabled.
#[must_use]
pub fn clamp_quantity(requested: u32, quantity_left: u32) -> Option<u32> {
    if quantity_left == 0 {
        return None;
    }
    Some(requested.clamp(1, quantity_left))
}

/// Six-digit hexadecimal code the seller checks at handoff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PickupCode(String);

impl PickupCode {
    pub const LEN: usize = 6;

    /// Parses a code, trimming whitespace and normalising to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPickupCode`] unless the trimmed input is
    /// exactly six hexadecimal characters.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.len() != Self::LEN || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidPickupCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PickupCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::str::FromStr for PickupCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<PickupCode> for String {
    fn from(code: PickupCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for PickupCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_quantity_caps_at_quantity_left() {
        assert_eq!(clamp_quantity(5, 3), Some(3));
    }

    #[test]
    fn clamp_quantity_raises_zero_to_one() {
        assert_eq!(clamp_quantity(0, 3), Some(1));
    }

    #[test]
    fn clamp_quantity_passes_valid_request() {
        assert_eq!(clamp_quantity(2, 3), Some(2));
    }

    #[test]
    fn clamp_quantity_sold_out_disables_ordering() {
        assert_eq!(clamp_quantity(1, 0), None);
    }

    #[test]
    fn total_price_multiplies() {
        assert!((total_price(2.5, 4) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn order_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!(" Ready ".parse::<OrderStatus>(), Ok(OrderStatus::Ready));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_status_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn pickup_code_normalises_case_and_whitespace() {
        let code = PickupCode::parse(" a1b2c3\n").unwrap();
        assert_eq!(code.as_str(), "A1B2C3");
    }

    #[test]
    fn pickup_code_rejects_wrong_length_or_alphabet() {
        assert!(PickupCode::parse("A1B2C").is_err());
        assert!(PickupCode::parse("A1B2C3D").is_err());
        assert!(PickupCode::parse("G1B2C3").is_err());
    }

    #[test]
    fn pickup_code_deserializes_with_validation() {
        let code: PickupCode = serde_json::from_str("\"ff00aa\"").unwrap();
        assert_eq!(code.to_string(), "FF00AA");
        assert!(serde_json::from_str::<PickupCode>("\"nope\"").is_err());
    }
}
