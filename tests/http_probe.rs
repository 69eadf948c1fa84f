//! Tests for the reqwest-backed probe against a loopback HTTP server

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use registry_check::{HttpProbe, Probe, ProbeResponse};

/// Serve canned responses on 127.0.0.1, one connection per request.
///
/// `respond` maps the request path to the raw response bytes; `{base}` in a
/// response is replaced with the server's own address.
fn serve(respond: fn(&str) -> Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server_base = base.clone();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let request = String::from_utf8_lossy(&request);
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
            let response = respond(&path);
            let response = replace_base(&response, &server_base);
            let _ = stream.write_all(&response);
        }
    });

    base
}

fn replace_base(response: &[u8], base: &str) -> Vec<u8> {
    let marker = b"{base}";
    let mut out = Vec::with_capacity(response.len());
    let mut i = 0;
    while i < response.len() {
        if response[i..].starts_with(marker) {
            out.extend_from_slice(base.as_bytes());
            i += marker.len();
        } else {
            out.push(response[i]);
            i += 1;
        }
    }
    out
}

fn probe() -> HttpProbe {
    HttpProbe::new("registry-check-tests").unwrap()
}

#[test]
fn test_redirect_followed_to_final_response() {
    let base = serve(|path| match path {
        "/download" => b"HTTP/1.1 302 Found\r\nLocation: {base}/files/setup.exe\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
        "/files/setup.exe" => b"HTTP/1.1 200 OK\r\nContent-Type: application/x-msdownload\r\nContent-Length: 4\r\nConnection: close\r\n\r\nMZ\x90\x00".to_vec(),
        _ => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
    });

    let response = probe().get(&format!("{}/download", base)).unwrap();

    assert_eq!(
        response,
        ProbeResponse {
            status: 200,
            content_type: "application/x-msdownload".to_string(),
        }
    );
}

#[test]
fn test_missing_content_type_is_empty() {
    let base = serve(|_| {
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok".to_vec()
    });

    let response = probe().get(&format!("{}/setup.exe", base)).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "");
}

#[test]
fn test_non_200_status_reported() {
    let base = serve(|_| {
        b"HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec()
    });

    let response = probe().get(&format!("{}/gone.msi", base)).unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.content_type, "text/html");
}

#[test]
fn test_non_ascii_content_type_kept() {
    let base = serve(|_| {
        b"HTTP/1.1 200 OK\r\nContent-Type: application/x-caf\xe9\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec()
    });

    let response = probe().get(&format!("{}/setup.exe", base)).unwrap();

    assert_eq!(response.content_type, "application/x-caf\u{FFFD}");
}

#[test]
fn test_connection_refused_is_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = probe().get(&format!("http://{}/setup.exe", addr));

    assert!(result.is_err());
}
