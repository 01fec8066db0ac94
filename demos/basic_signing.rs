//! Basic URL signing example
//!
//! This example signs a download link, verifies it, and shows how tampered,
//! foreign and expired links are rejected.
//!
//! Run with: cargo run --example basic_signing

use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;
use urlsign::{FixedClock, SignerConfig, SignerError, UrlSigner};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    // Shared secret (at most 64 bytes)
    let secret = b"1qaz@WSX";

    let signer = UrlSigner::new(secret).expect("Secret rejected");

    let signed = signer
        .sign_url("https://anything.com/test?id=1")
        .expect("Failed to sign");

    println!("Signed URL: {}", signed);
    println!();

    match signer.verify_url_fresh(&signed, 30) {
        Ok(token) => {
            println!("[OK] Signed URL verified successfully!");
            println!("  Signed path: {}", token.original_remainder());
            println!("  Issued at:   {}", token.issued_at);
            println!("  Age:         {} seconds", token.age_seconds(Utc::now()));
        }
        Err(e) => {
            println!("[FAIL] Verification failed!");
            println!("  Error: {}", e);
            println!("  HTTP Status: {}", e.http_status_code());
        }
    }

    println!();
    println!("--- Testing Error Cases ---");
    println!();

    // Tampered query
    let tampered = signed.replacen("id=1", "id=2", 1);
    match signer.verify_url(&tampered) {
        Ok(_) => println!("[FAIL] Should have failed!"),
        Err(SignerError::InvalidSignature) => println!("[OK] Correctly rejected tampered URL"),
        Err(e) => println!("[WARN] Unexpected error: {}", e),
    }

    // Wrong secret
    let wrong_signer = UrlSigner::new(b"wrong-secret").expect("Secret rejected");
    match wrong_signer.verify_url(&signed) {
        Ok(_) => println!("[FAIL] Should have failed!"),
        Err(SignerError::InvalidSignature) => println!("[OK] Correctly rejected foreign secret"),
        Err(e) => println!("[WARN] Unexpected error: {}", e),
    }

    // Not a URL
    match signer.sign_url("not a url") {
        Ok(_) => println!("[FAIL] Should have failed!"),
        Err(SignerError::InvalidUrl(_)) => println!("[OK] Correctly rejected invalid URL"),
        Err(e) => println!("[WARN] Unexpected error: {}", e),
    }

    // Expired, by looking at the link from two hours in the future
    let future = signer
        .clone()
        .with_clock(FixedClock::new(Utc::now() + Duration::hours(2)));
    match future.verify_url_fresh(&signed, 30) {
        Ok(_) => println!("[FAIL] Should have failed!"),
        Err(SignerError::Expired) => println!("[OK] Correctly rejected expired URL"),
        Err(e) => println!("[WARN] Unexpected error: {}", e),
    }

    // Domain binding
    let bound = UrlSigner::with_config(secret, SignerConfig::default().with_domain_binding(true))
        .expect("Secret rejected");
    let bound_url = bound
        .sign_url("https://anything.com/test?id=1")
        .expect("Failed to sign");
    let moved = bound_url.replacen("anything.com", "elsewhere.com", 1);
    match bound.verify_url(&moved) {
        Ok(_) => println!("[FAIL] Should have failed!"),
        Err(SignerError::InvalidSignature) => {
            println!("[OK] Correctly rejected URL moved to another domain")
        }
        Err(e) => println!("[WARN] Unexpected error: {}", e),
    }
}
