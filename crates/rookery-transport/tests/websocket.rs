//! WebSocket transport against a real tokio-tungstenite client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use rookery_transport::{
        Connection, Transport, WebSocketConnection, WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on an ephemeral port, connects one client, and returns both
    /// ends.
    async fn pair() -> (WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound address");

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        (server.await.expect("accept task"), client)
    }

    #[tokio::test]
    async fn test_websocket_json_goes_out_as_text_frame() {
        let (conn, mut client) = pair().await;
        assert!(conn.id().into_inner() > 0);

        conn.send(br#"{"action":"PONG","data":{}}"#).await.unwrap();

        let msg = client.next().await.unwrap().unwrap();
        match msg {
            Message::Text(text) => {
                assert_eq!(text.as_str(), r#"{"action":"PONG","data":{}}"#);
            }
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_websocket_recv_accepts_text_and_binary() {
        let (conn, mut client) = pair().await;

        client.send(Message::text("hello".to_string())).await.unwrap();
        client
            .send(Message::binary(b"bytes".to_vec()))
            .await
            .unwrap();

        assert_eq!(conn.recv().await.unwrap().unwrap(), b"hello");
        assert_eq!(conn.recv().await.unwrap().unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (conn, mut client) = pair().await;
        client.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_send_not_blocked_by_pending_recv() {
        let (conn, mut client) = pair().await;
        let conn = Arc::new(conn);

        // Park a reader on the connection with nothing to read.
        let reader = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(2), conn.send(b"pushed"))
            .await
            .expect("send must not wait for the reader")
            .unwrap();
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"pushed");

        client.send(Message::text("wake".to_string())).await.unwrap();
        let got = reader.await.unwrap().unwrap();
        assert_eq!(got.as_deref(), Some(&b"wake"[..]));
    }
}
