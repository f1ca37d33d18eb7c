use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::invalid_argument("bad key"), 400)]
#[case(AppError::not_found("a.txt"), 404)]
#[case(AppError::payload_too_large(11, 10), 413)]
#[case(AppError::UpstreamGeneration { message: "rate limited".into(), transient: true }, 503)]
#[case(AppError::UpstreamGeneration { message: "policy".into(), transient: false }, 502)]
#[case(AppError::UpstreamStore { message: "slow down".into(), transient: true }, 503)]
#[case(AppError::UpstreamStore { message: "denied".into(), transient: false }, 502)]
#[case(AppError::NotConfigured("generation".into()), 503)]
#[case(AppError::Internal("boom".into()), 500)]
fn test_app_error_status_codes(#[case] err: AppError, #[case] status: u16) {
    assert_eq!(err.status_code(), status);
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(
        AppError::invalid_argument("x").error_code(),
        "invalid_argument"
    );
    assert_eq!(AppError::not_found("x").error_code(), "not_found");
    assert_eq!(
        AppError::payload_too_large(2, 1).error_code(),
        "payload_too_large"
    );
    assert_eq!(
        AppError::UpstreamGeneration {
            message: String::new(),
            transient: false
        }
        .error_code(),
        "upstream_generation_error"
    );
    assert_eq!(
        AppError::UpstreamStore {
            message: String::new(),
            transient: true
        }
        .error_code(),
        "upstream_store_error"
    );
    assert_eq!(
        AppError::NotConfigured(String::new()).error_code(),
        "not_configured"
    );
    assert_eq!(AppError::Internal(String::new()).error_code(), "internal_error");
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::invalid_argument("msg")),
        "Invalid argument: msg"
    );
    assert_eq!(format!("{}", AppError::not_found("msg")), "Not found: msg");
    assert_eq!(
        format!("{}", AppError::payload_too_large(11, 10)),
        "Payload too large: 11 bytes exceeds maximum 10 bytes"
    );
    assert_eq!(
        format!(
            "{}",
            AppError::UpstreamGeneration {
                message: "quota exceeded".into(),
                transient: true
            }
        ),
        "Upstream generation error: quota exceeded"
    );
}

#[test]
fn test_client_error_classification() {
    assert!(AppError::invalid_argument("x").is_client_error());
    assert!(AppError::payload_too_large(2, 1).is_client_error());
    assert!(!AppError::Internal("x".into()).is_client_error());
    assert!(
        !AppError::UpstreamStore {
            message: "x".into(),
            transient: false
        }
        .is_client_error()
    );
}
