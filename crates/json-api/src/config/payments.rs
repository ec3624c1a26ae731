//! Payments Config

use std::time::Duration;

use clap::Args;

use shopfusion_app::domain::payments::RazorpayConfig;

/// Payment gateway settings.
///
/// Online payment methods are rejected with 503 unless both keys are set.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment gateway base URL
    #[arg(
        long,
        env = "PAYMENT_GATEWAY_URL",
        default_value = "https://api.razorpay.com"
    )]
    pub gateway_url: String,

    /// Payment gateway key id
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub key_id: Option<String>,

    /// Payment gateway key secret
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub key_secret: Option<String>,

    /// ISO currency code for payment orders
    #[arg(long, env = "PAYMENT_CURRENCY", default_value = "INR")]
    pub currency: String,

    /// Gateway request timeout in seconds
    #[arg(long, env = "PAYMENT_GATEWAY_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub timeout_seconds: u64,
}

impl PaymentsConfig {
    /// Gateway client settings, if credentials were supplied.
    #[must_use]
    pub fn razorpay(&self) -> Option<RazorpayConfig> {
        let key_id = self.key_id.as_deref().filter(|key| !key.trim().is_empty())?;
        let key_secret = self
            .key_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())?;

        Some(RazorpayConfig {
            base_url: self.gateway_url.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
            timeout: Duration::from_secs(self.timeout_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key_id: Option<&str>, key_secret: Option<&str>) -> PaymentsConfig {
        PaymentsConfig {
            gateway_url: "https://gateway.example.com/".to_string(),
            key_id: key_id.map(str::to_string),
            key_secret: key_secret.map(str::to_string),
            currency: "INR".to_string(),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn razorpay_requires_both_keys() {
        assert!(config(None, None).razorpay().is_none());
        assert!(config(Some("key"), None).razorpay().is_none());
        assert!(config(Some(" "), Some("secret")).razorpay().is_none());
    }

    #[test]
    fn razorpay_config_trims_base_url() {
        let razorpay = config(Some("key"), Some("secret")).razorpay();

        assert_eq!(
            razorpay.as_ref().map(|config| config.base_url.as_str()),
            Some("https://gateway.example.com")
        );
        assert_eq!(
            razorpay.map(|config| config.timeout),
            Some(Duration::from_secs(5))
        );
    }
}
