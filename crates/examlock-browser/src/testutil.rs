//! Local HTTP fixtures standing in for browser debugging endpoints.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Spawn a fixture endpoint on an ephemeral port and return that port.
///
/// `/json/list` is served with `list_status` and `list_body`; a
/// `/json/close/<id>` request gets a 404 when `<id>` is listed in
/// `close_fail_ids` and a 200 otherwise.
pub(crate) async fn spawn_endpoint(
    list_status: u16,
    list_body: &str,
    close_fail_ids: &[&str],
) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fixture");
    let port = listener.local_addr().expect("fixture addr").port();
    let list_body = list_body.to_string();
    let close_fail_ids: Vec<String> = close_fail_ids.iter().map(|id| (*id).to_string()).collect();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = vec![0u8; 2048];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let path = request
                .split_whitespace()
                .nth(1)
                .unwrap_or("/")
                .to_string();

            let (status, body) = if let Some(id) = path.strip_prefix("/json/close/") {
                if close_fail_ids.iter().any(|fail| fail == id) {
                    (404, String::from("No such target id"))
                } else {
                    (200, String::from("Target is closing"))
                }
            } else {
                (list_status, list_body.clone())
            };

            let response = format!(
                "HTTP/1.1 {status} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    port
}

/// A local port with nothing listening on it.
pub(crate) async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    let port = listener.local_addr().expect("probe addr").port();
    drop(listener);
    port
}
