use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

use super::*;
use crate::transport::PipeTransport;

fn create_test_connection() -> (Connection, DuplexStream, DuplexStream) {
	let (stdin_read, stdin_write) = duplex(4096);
	let (stdout_read, stdout_write) = duplex(4096);

	let (transport, message_rx) = PipeTransport::new(stdin_write, stdout_read);
	let parts = transport.into_transport_parts(message_rx);
	let connection = Connection::new(parts);

	(connection, stdin_read, stdout_write)
}

async fn read_frame(reader: &mut DuplexStream) -> Value {
	let mut len_buf = [0u8; 4];
	reader.read_exact(&mut len_buf).await.unwrap();
	let mut buf = vec![0u8; u32::from_le_bytes(len_buf) as usize];
	reader.read_exact(&mut buf).await.unwrap();
	serde_json::from_slice(&buf).unwrap()
}

async fn write_frame(writer: &mut DuplexStream, message: Value) {
	let bytes = serde_json::to_vec(&message).unwrap();
	writer.write_all(&(bytes.len() as u32).to_le_bytes()).await.unwrap();
	writer.write_all(&bytes).await.unwrap();
	writer.flush().await.unwrap();
}

#[test]
fn request_ids_are_sequential() {
	let (connection, _, _) = create_test_connection();
	assert_eq!((connection.next_id(), connection.next_id(), connection.next_id()), (0, 1, 2));
}

#[tokio::test]
async fn response_resolves_pending_request() {
	let (connection, _, _) = create_test_connection();

	let id = connection.next_id();
	let (tx, rx) = oneshot::channel();
	connection.pending.lock().insert(id, tx);

	let response = Message::Response(Response {
		id,
		result: Some(serde_json::json!({"topic": "abc"})),
		error: None,
	});
	connection.dispatch(response).unwrap();

	let result = rx.await.unwrap().unwrap();
	assert_eq!(result["topic"], "abc");
}

#[tokio::test]
async fn error_response_becomes_remote_error() {
	let (connection, _, _) = create_test_connection();

	let id = connection.next_id();
	let (tx, rx) = oneshot::channel();
	connection.pending.lock().insert(id, tx);

	let response = Message::Response(Response {
		id,
		result: None,
		error: Some(ErrorPayload {
			code: Some(5000),
			message: "User rejected.".to_string(),
		}),
	});
	connection.dispatch(response).unwrap();

	let err = rx.await.unwrap().unwrap_err();
	assert_eq!(err.remote_code(), Some(5000));
	assert_eq!(err.to_string(), "User rejected.");
}

#[tokio::test]
async fn response_for_unknown_id_is_rejected() {
	let (connection, _, _) = create_test_connection();

	let err = connection
		.dispatch(Message::Response(Response {
			id: 99,
			result: None,
			error: None,
		}))
		.unwrap_err();
	assert!(matches!(err, Error::ProtocolError(_)));
}

#[tokio::test]
async fn events_reach_every_subscriber() {
	let (connection, _, _) = create_test_connection();
	let mut first = connection.subscribe();
	let mut second = connection.subscribe();

	let event = Event {
		event: "display_uri".into(),
		params: serde_json::json!({"uri": "wc:abc@2"}),
	};
	connection.dispatch(Message::Event(event.clone())).unwrap();

	assert_eq!(first.recv().await.unwrap(), event);
	assert_eq!(second.recv().await.unwrap(), event);
}

#[test]
fn frame_with_id_is_response() {
	let json = r#"{"id": 42, "result": {"topic": "abc"}}"#;
	let message: Message = serde_json::from_str(json).unwrap();

	match message {
		Message::Response(response) => {
			assert_eq!(response.id, 42);
			assert_eq!(response.result.unwrap()["topic"], "abc");
			assert!(response.error.is_none());
		}
		other => panic!("expected response, got {other:?}"),
	}
}

#[test]
fn frame_with_event_is_event() {
	let json = r#"{"event": "session_delete", "params": {"topic": "abc"}}"#;
	let message: Message = serde_json::from_str(json).unwrap();

	match message {
		Message::Event(event) => {
			assert_eq!(event.event, "session_delete");
			assert_eq!(event.params["topic"], "abc");
		}
		other => panic!("expected event, got {other:?}"),
	}
}

#[test]
fn other_frames_are_unknown() {
	let message: Message = serde_json::from_str(r#"{"hello": "bridge"}"#).unwrap();
	assert!(matches!(message, Message::Unknown(_)));
}

#[tokio::test]
async fn round_trip_through_running_connection() {
	let (connection, mut bridge_stdin, mut bridge_stdout) = create_test_connection();
	let connection = Arc::new(connection);

	let runner = Arc::clone(&connection);
	let run_task = tokio::spawn(async move { runner.run().await });

	let caller = Arc::clone(&connection);
	let call = tokio::spawn(async move { caller.send_message("sessions", serde_json::json!({})).await });

	let request = read_frame(&mut bridge_stdin).await;
	assert_eq!(request["method"], "sessions");
	let id = request["id"].as_u64().unwrap();

	write_frame(&mut bridge_stdout, serde_json::json!({ "id": id, "result": [] })).await;

	let result = call.await.unwrap().unwrap();
	assert_eq!(result, serde_json::json!([]));

	drop(bridge_stdout);
	run_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn pending_requests_fail_when_transport_closes() {
	let (connection, mut bridge_stdin, bridge_stdout) = create_test_connection();
	let connection = Arc::new(connection);

	let runner = Arc::clone(&connection);
	let run_task = tokio::spawn(async move { runner.run().await });

	let caller = Arc::clone(&connection);
	let call = tokio::spawn(async move { caller.send_message("connect", serde_json::json!({})).await });

	let _ = read_frame(&mut bridge_stdin).await;
	drop(bridge_stdout);

	let err = call.await.unwrap().unwrap_err();
	assert!(matches!(err, Error::ChannelClosed));
	run_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn run_twice_is_rejected() {
	let (connection, _stdin, stdout) = create_test_connection();
	let connection = Arc::new(connection);

	drop(stdout);
	connection.run().await.unwrap();
	assert!(matches!(connection.run().await, Err(Error::ProtocolError(_))));
}

#[tokio::test]
async fn abandoned_request_leaves_no_pending_entry() {
	let (connection, _stdin, _stdout) = create_test_connection();

	let call = connection.send_message("connect", serde_json::json!({}));
	// Polling once registers the request; the timeout then drops it.
	let _ = tokio::time::timeout(std::time::Duration::from_millis(10), call).await;

	assert!(connection.pending.lock().is_empty());
}
