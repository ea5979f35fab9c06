//! Test doubles: a one-shot HTTP stub for the reqwest clients and a scripted translator.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::error::{CredentialKind, Result, TarjomeError, TranslationError};
use crate::translate::Translator;

/// Serve `responses` in order, one connection each, and return the raw requests.
///
/// Each response is `(status line, JSON body)`. The returned URL has no
/// trailing slash.
pub(crate) async fn serve(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status_line, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    line.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).to_string()
}

/// Translator fake: prefixes every text with "fa:"; texts matched by `fail_on` error out
pub(crate) struct ScriptedTranslator {
    pub calls: Mutex<Vec<(String, Option<String>, f32)>>,
    fail_on: fn(&str) -> bool,
    ready: bool,
}

impl ScriptedTranslator {
    pub fn new(fail_on: fn(&str) -> bool) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), fail_on, ready: true })
    }

    pub fn without_key() -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), fail_on: |_| false, ready: false })
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(t, _, _)| t.clone()).collect()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    fn ensure_ready(&self) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            Err(TarjomeError::MissingCredential(CredentialKind::Translation))
        }
    }

    async fn translate(
        &self,
        text: &str,
        style_instructions: Option<&str>,
        temperature: f32,
    ) -> std::result::Result<String, TranslationError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), style_instructions.map(str::to_string), temperature));
        if (self.fail_on)(text) {
            Err(TranslationError::status(500, "upstream error"))
        } else {
            Ok(format!("fa:{}", text))
        }
    }
}
