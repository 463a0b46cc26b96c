use serde::{Deserialize, Serialize};

use super::validation::is_valid_mobile;

/// Fixed mock one-time code standing in for real SMS delivery. A production
/// deployment would generate a random code with expiry and deliver it
/// out-of-band; that is a documented limitation here, not a bug.
pub const SENTINEL_OTP: &str = "123456";

/// What the issuer hands back to the client. The code rides along in the
/// response precisely because delivery is mocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpDelivery {
    pub message: String,
    pub otp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("Enter a valid 10-digit mobile number")]
    InvalidMobile,
}

/// Issue the sentinel OTP for a well-formed mobile number. Records nothing.
pub fn send_otp(mobile_number: &str) -> Result<OtpDelivery, OtpError> {
    if !is_valid_mobile(mobile_number) {
        return Err(OtpError::InvalidMobile);
    }

    Ok(OtpDelivery {
        message: "OTP sent".to_string(),
        otp: SENTINEL_OTP.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_sentinel_code_for_valid_mobile() {
        let delivery = send_otp("9876543210").expect("valid mobile accepted");
        assert_eq!(delivery.otp, SENTINEL_OTP);
        assert_eq!(delivery.message, "OTP sent");
    }

    #[test]
    fn rejects_short_and_badly_prefixed_mobiles() {
        for bad in ["12345", "1234567890", "98765432100", ""] {
            assert!(matches!(send_otp(bad), Err(OtpError::InvalidMobile)));
        }
    }
}
