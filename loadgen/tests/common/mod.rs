use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use goose::{config::GooseConfiguration, goose::get_base_url, prelude::*};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

type Received = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

/// Minimal HTTP/1.1 server answering every request with a fixed status and
/// recording the path and JSON body it received.
pub struct PredictServer {
    addr: SocketAddr,
    received: Received,
}

impl PredictServer {
    pub async fn start(status: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Received::default();

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, status, Arc::clone(&log)));
            }
        });

        Self { addr, received }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn received(&self) -> Vec<(String, serde_json::Value)> {
        self.received.lock().unwrap().clone()
    }
}

async fn serve(stream: TcpStream, status: &'static str, log: Received) {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    // Keep-alive: several requests may share the connection.
    loop {
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
            return;
        }
        let path = request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                return;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).await.unwrap();
        log.lock()
            .unwrap()
            .push((path, serde_json::from_slice(&body).unwrap()));

        let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\n\r\n");
        write.write_all(response.as_bytes()).await.unwrap();
    }
}

/// A standalone goose user targeting `url`, outside of any attack.
pub fn goose_user(url: &str) -> GooseUser {
    let mut config = GooseConfiguration::default();
    config.co_mitigation = Some(GooseCoordinatedOmissionMitigation::Disabled);
    let base_url = get_base_url(Some(url.to_string()), None, None).unwrap();
    GooseUser::single(base_url, &config).unwrap()
}
