//! Payment token tool
//!
//! Seals and opens payment-request tokens the way the originating service
//! does. Useful for local testing and for generating payment links without
//! standing up the full originating service.
//!
//! Usage:
//!   token-tool seal < payload.json
//!   token-tool open <token>
//!
//! The process secret is taken from QR_BRIDGE_TOKEN_SECRET.

use std::io::Read;

use vietqr_bridge::domain::token::PaymentRequestData;
use vietqr_bridge::infrastructure::adapters::TokenEnvelope;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mode = match args.get(1).map(String::as_str) {
        Some(mode @ ("seal" | "open")) => mode,
        _ => usage(),
    };

    let secret = match std::env::var("QR_BRIDGE_TOKEN_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            eprintln!("QR_BRIDGE_TOKEN_SECRET is not set");
            std::process::exit(2);
        }
    };
    let envelope = TokenEnvelope::new(&secret);

    match mode {
        "seal" => {
            let mut input = String::new();
            if std::io::stdin().read_to_string(&mut input).is_err() {
                eprintln!("failed to read payload from stdin");
                std::process::exit(2);
            }
            let data: PaymentRequestData = match serde_json::from_str(&input) {
                Ok(data) => data,
                Err(e) => {
                    eprintln!("invalid payload: {}", e);
                    std::process::exit(2);
                }
            };
            match envelope.seal(&data) {
                Ok(token) => println!("{}", token),
                Err(e) => {
                    eprintln!("seal failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        "open" => {
            let token = match args.get(2) {
                Some(token) => token.clone(),
                None => usage(),
            };
            match envelope.open(&token) {
                Ok(data) => match serde_json::to_string_pretty(&data) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("serialize failed: {}", e);
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("open failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        _ => unreachable!(),
    }
}

fn usage() -> ! {
    eprintln!("usage: token-tool seal < payload.json");
    eprintln!("       token-tool open <token>");
    std::process::exit(2);
}
