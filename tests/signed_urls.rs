//! End-to-end behavior of signed URLs through the public API.

use chrono::{Duration, TimeZone, Utc};
use urlsign::prelude::*;
use urlsign::{canonicalize, TOKEN_TAIL_LENGTH};

const SECRET: &[u8] = b"1qaz@WSX";

const URLS: &[&str] = &[
    "https://anything.com/test?id=1",
    "https://anything.com/test",
    "http://anything.com",
    "https://cdn.example.org:8443/videos/intro.mp4?quality=hd&lang=en",
    "https://user@files.example.net/a/b/c/",
    "https://anything.com?only=query",
];

#[test]
fn test_round_trip() {
    let signer = UrlSigner::new(SECRET).unwrap();

    for url in URLS {
        let signed = signer.sign_url(url).unwrap();
        assert_eq!(signer.verify_url(&signed), Ok(true), "{}", url);
    }
}

#[test]
fn test_concrete_scenario() {
    let signer = UrlSigner::new(SECRET).unwrap();

    let signed = signer.sign_url("https://anything.com/test?id=1").unwrap();
    assert!(signed.starts_with("https://anything.com/test?id=1&hash="));
    assert_eq!(
        signed.len(),
        "https://anything.com/test?id=1&hash=".len() + TOKEN_TAIL_LENGTH
    );

    assert_eq!(signer.verify_url(&signed), Ok(true));
    assert!(signer.is_expired(&signed, -1));
    assert!(!signer.is_expired(&signed, 1));
}

#[test]
fn test_query_parameter_handling() {
    let signer = UrlSigner::new(SECRET).unwrap();

    let with_query = signer.sign_url("https://a.com/x?id=1").unwrap();
    assert!(with_query.starts_with("https://a.com/x?id=1&hash="));
    assert!(signer.verify_url(&with_query).unwrap());

    let without_query = signer.sign_url("https://a.com/x").unwrap();
    assert!(without_query.starts_with("https://a.com/x?hash="));
    assert!(signer.verify_url(&without_query).unwrap());
}

#[test]
fn test_tamper_sensitivity() {
    let signer = UrlSigner::new(SECRET).unwrap();
    let signed = signer
        .sign_url("https://anything.com/download/file.zip?user=42")
        .unwrap();
    let token_start = canonicalize(&signed).unwrap().prefix.len() + "anything.com".len();

    for i in token_start..signed.len() {
        let mut bytes = signed.clone().into_bytes();
        bytes[i] = if bytes[i] == b'z' { b'y' } else { b'z' };
        let tampered = String::from_utf8(bytes).unwrap();

        // The tampered text may no longer be a URL at all; either way it fails.
        assert!(
            signer.verify_url(&tampered).is_err(),
            "flip at byte {} accepted: {}",
            i,
            tampered
        );
    }
}

#[test]
fn test_wrong_key_rejection() {
    let signer = UrlSigner::new(SECRET).unwrap();
    let other = UrlSigner::new(b"2wsx#EDC").unwrap();

    for url in URLS {
        let signed = signer.sign_url(url).unwrap();
        assert_eq!(other.verify_url(&signed), Err(SignerError::InvalidSignature));
    }
}

#[test]
fn test_expiration_monotonicity() {
    let issued = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    let signer = UrlSigner::new(SECRET)
        .unwrap()
        .with_clock(FixedClock::new(issued));
    let signed = signer.sign_url("https://anything.com/test?id=1").unwrap();

    assert!(!signer.is_expired(&signed, 60 * 24 * 365));
    assert!(!signer.is_expired(&signed, 0));
    assert!(signer.is_expired(&signed, -1));

    let mut previously_expired = false;
    for minutes in [0, 1, 5, 30, 61, 600] {
        let at = FixedClock::new(issued).advanced(Duration::minutes(minutes));
        let expired = signer.clone().with_clock(at).is_expired(&signed, 60);
        assert!(!previously_expired || expired, "expiry went backwards at {}", minutes);
        previously_expired = expired;
    }
    assert!(previously_expired);
}

#[test]
fn test_invalid_input_rejection() {
    let signer = UrlSigner::new(SECRET).unwrap();

    for input in ["", "invalid", "not a url"] {
        assert!(matches!(
            signer.sign_url(input),
            Err(SignerError::InvalidUrl(_))
        ));
        assert!(matches!(
            signer.verify_url(input),
            Err(SignerError::InvalidUrl(_))
        ));
    }
}

#[test]
fn test_fresh_verification_uses_authenticated_time() {
    let issued = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    let signer = UrlSigner::new(SECRET)
        .unwrap()
        .with_clock(FixedClock::new(issued));
    let signed = signer.sign_url("https://anything.com/report.pdf").unwrap();

    let later = signer.with_clock(FixedClock::new(issued + Duration::hours(2)));
    let err = later.verify_url_fresh(&signed, 90).unwrap_err();
    assert!(err.is_expired());
    assert_eq!(err.http_status_code(), 410);

    let token = later.verify_url_fresh(&signed, 180).unwrap();
    assert_eq!(token.issued_at, issued);
    assert_eq!(token.payload, "/report.pdf?hash=");
}

#[test]
fn test_signer_is_shareable_across_threads() {
    let signer = std::sync::Arc::new(UrlSigner::new(SECRET).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let signer = signer.clone();
            std::thread::spawn(move || {
                let signed = signer
                    .sign_url(&format!("https://anything.com/item/{}", i))
                    .unwrap();
                signer.verify_url(&signed).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_long_urls_with_raised_length_cap() {
    let config = SignerConfig::default().with_max_token_length(20_000);
    let signer = UrlSigner::with_config(SECRET, config).unwrap();

    let signed = signer
        .sign_url(&format!("https://a.com/{}", "p".repeat(9000)))
        .unwrap();
    assert_eq!(signer.verify_url(&signed), Ok(true));
    assert!(!signer.is_expired(&signed, 60));
    assert!(signer.verify_url_fresh(&signed, 60).is_ok());
}

#[test]
fn test_future_issued_url_with_negative_window() {
    let issued = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    let signer = UrlSigner::new(SECRET)
        .unwrap()
        .with_clock(FixedClock::new(issued + Duration::minutes(5)));
    let signed = signer.sign_url("https://anything.com/test?id=1").unwrap();

    let earlier = signer.with_clock(FixedClock::new(issued));
    assert!(earlier.is_expired(&signed, -1));
    assert!(earlier.verify_url_fresh(&signed, -1).unwrap_err().is_expired());
}
