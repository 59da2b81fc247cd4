use async_trait::async_trait;
use serde::Deserialize;

use crate::utils::AppError;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Card-processing provider, reduced to the one call this API makes.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a payment intent for `amount` minor units and returns its client secret.
    async fn create_payment_intent(&self, amount: i64) -> Result<String, AppError>;
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: Option<String>,
}

pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    currency: String,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: secret_key.into(),
            currency: currency.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, amount: i64) -> Result<String, AppError> {
        log::info!("💳 Creating payment intent: {} {}", amount, self.currency);

        let amount = amount.to_string();
        let params = [
            ("amount", amount.as_str()),
            ("currency", self.currency.as_str()),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(format!("{}/payment_intents", STRIPE_API_BASE))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(AppError::PaymentError(message));
        }

        let intent: PaymentIntent = response.json().await?;
        log::info!("✅ Payment intent created");

        Ok(intent.client_secret)
    }
}

/// Converts a price in major units (e.g. 12.34 dollars) to minor units (1234 cents).
pub fn to_minor_units(price: f64) -> Result<i64, AppError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Validation(format!(
            "price must be a positive amount, got {}",
            price
        )));
    }

    Ok((price * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_cents() {
        assert_eq!(to_minor_units(12.34).unwrap(), 1234);
        assert_eq!(to_minor_units(0.1 + 0.2).unwrap(), 30);
        assert_eq!(to_minor_units(99.0).unwrap(), 9900);
    }

    #[test]
    fn rejects_non_positive_prices() {
        assert!(matches!(to_minor_units(0.0), Err(AppError::Validation(_))));
        assert!(matches!(to_minor_units(-5.0), Err(AppError::Validation(_))));
        assert!(matches!(to_minor_units(f64::NAN), Err(AppError::Validation(_))));
    }
}
