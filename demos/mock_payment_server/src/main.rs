use std::{env, io::Read};

use serde::Deserialize;
use serde_json::json;
use tiny_http::{Header, Method, Response, Server};

#[derive(Deserialize)]
struct AuthenticateRequest {
    #[serde(rename = "deviceFingerprintingId")]
    device_fingerprinting_id: String,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let port = env::var("MOCK_PAYMENT_SERVER_PORT").unwrap_or_else(|_| "2718".to_string());
    // "1" (legacy), "2" (modern, the default) or "none" (frictionless).
    let step_up_version =
        env::var("MOCK_STEP_UP_VERSION").unwrap_or_else(|_| "2".to_string());

    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)?;
    println!("Running on http://{}", addr);

    // Build CORS headers once
    let cors_headers = || {
        vec![
            Header::from_bytes("Access-Control-Allow-Origin", "*").unwrap(),
            Header::from_bytes("Access-Control-Allow-Methods", "POST, OPTIONS").unwrap(),
            Header::from_bytes("Access-Control-Allow-Headers", "Content-Type").unwrap(),
        ]
    };

    for mut request in server.incoming_requests() {
        // 1) Preflight
        if request.method() == &Method::Options {
            let mut resp = Response::empty(204);
            for h in cors_headers() {
                resp.add_header(h);
            }
            request.respond(resp)?;
            continue;
        }

        // 2) Routes
        match (request.method(), request.url()) {
            // Initiate a payment: pass-through metadata plus the Cardinal
            // device-collection endpoint.
            (&Method::Post, "/payments") => {
                let body = json!({
                    "metadata": {
                        "merchantID": "mock-merchant",
                        "merchantSiteID": "1",
                        "sessionID": "mock-session",
                    },
                    "device_collection_url":
                        "https://centinelapistag.cardinalcommerce.com/V1/Cruise/Collect",
                    "device_collection_jwt": "mock-collection-jwt",
                })
                .to_string();

                let mut resp = Response::from_string(body)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
                for h in cors_headers() {
                    resp.add_header(h);
                }
                request.respond(resp)?;
            }

            // Decide whether the issuer demands a step-up challenge.
            (&Method::Post, "/payments/authenticate") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match serde_json::from_str::<AuthenticateRequest>(&body) {
                    Ok(auth) => println!(
                        "Authenticating fingerprint session {}",
                        auth.device_fingerprinting_id
                    ),
                    Err(err) => println!("Unreadable authenticate body ({}): {}", err, body),
                }

                let reply = match step_up_version.as_str() {
                    "1" => json!({
                        "guid_no": "1000000000000001",
                        "acs_url": "https://acs-mock.example/auth",
                        "pa_req": "mock-pa-req",
                    }),
                    "none" => json!({}),
                    _ => json!({
                        "guid_no": "1000000000000001",
                        "step_up_url":
                            "https://centinelapistag.cardinalcommerce.com/V2/Cruise/StepUp",
                        "step_up_jwt": "mock-step-up-jwt",
                    }),
                };

                let mut resp = Response::from_string(reply.to_string())
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
                for h in cors_headers() {
                    resp.add_header(h);
                }
                request.respond(resp)?;
            }

            // Where the issuing bank lands after a legacy challenge.
            (&Method::Post, "/3ds-return") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                println!("3DS return: {}", body);

                let mut resp = Response::from_string("OK");
                for h in cors_headers() {
                    resp.add_header(h);
                }
                request.respond(resp)?;
            }

            // 404 fallback
            _ => {
                let mut resp = Response::from_string("Not Found").with_status_code(404);
                for h in cors_headers() {
                    resp.add_header(h);
                }
                request.respond(resp)?;
            }
        }
    }

    Ok(())
}
