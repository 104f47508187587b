use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::RngCore;
use sockhttp::network::application::http::*;
use sockhttp::network::Timeouts;

use crate::{Fault, MockNetwork};

const OK: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nOK";

fn split_head(request: &[u8]) -> (String, &[u8]) {
    let end = request
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("request has no blank line")
        + 4;
    (String::from_utf8(request[..end].to_vec()).unwrap(), &request[end..])
}

#[test]
fn test_get_exchange() {
    let network = MockNetwork::new().reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    let body = client.get("").unwrap();

    assert_eq!(body, b"OK");
    assert_eq!(client.status(), Some("HTTP/1.1 200 OK"));
    assert_eq!(client.status_code(), Some(200));
    let headers = client.response_headers().unwrap();
    assert_eq!(headers.get("content-length"), Some("2"));

    let log = log.borrow();
    assert_eq!(
        log.requests[0],
        format!("GET / HTTP/1.1\r\nUser-Agent: {DEFAULT_USER_AGENT}\r\nHost: example.com\r\n\r\n").into_bytes()
    );
    assert_eq!(log.remotes, vec![("example.com".to_owned(), 80, Timeouts::default())]);
    assert_eq!(log.closed, 1);
}

#[test]
fn test_fresh_connection_per_exchange() {
    let network = MockNetwork::new().reply(OK).reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 8080).unwrap();

    client.get("a").unwrap();
    client.get("b").unwrap();

    let log = log.borrow();
    assert_eq!(log.remotes.len(), 2);
    assert_eq!(log.closed, 2);
    assert!(log.requests[0].starts_with(b"GET /a HTTP/1.1\r\n"));
    assert!(log.requests[1].starts_with(b"GET /b HTTP/1.1\r\n"));
}

#[test]
fn test_get_with_query_and_fields() {
    let network = MockNetwork::new().reply(OK).reply(OK).reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    client.get_with_query("search", "?q=rust").unwrap();
    client
        .get_with_fields("search", [("q", "a b"), ("lang", "en&fr")])
        .unwrap();
    client
        .get_with_fields("search", Vec::<(&str, &str)>::new())
        .unwrap();

    let log = log.borrow();
    assert!(log.requests[0].starts_with(b"GET /search?q=rust HTTP/1.1\r\n"));
    assert!(log.requests[1].starts_with(b"GET /search?q=a+b&lang=en%26fr HTTP/1.1\r\n"));
    assert!(log.requests[2].starts_with(b"GET /search HTTP/1.1\r\n"));
}

#[test]
fn test_post_form_encodes_fields() {
    let network = MockNetwork::new().reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    client
        .post_form("submit", [("name", "Jörg"), ("note", "a&b=c")])
        .unwrap();

    let request = log.borrow().requests[0].clone();
    let (head, body) = split_head(&request);
    assert_eq!(body, b"name=J%C3%B6rg&note=a%26b%3Dc");
    assert!(head.starts_with("POST /submit HTTP/1.1\r\n"));
    assert!(head.contains("Content-Type: application/x-www-form-urlencoded\r\n"));
    assert!(head.contains("Content-Length: 29\r\n"));
}

#[test]
fn test_post_raw_and_empty_post() {
    let network = MockNetwork::new().reply(OK).reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    client.post_raw("raw", "already=encoded%20").unwrap();
    client.post("empty").unwrap();

    let log = log.borrow();
    let (head, body) = split_head(&log.requests[0]);
    assert_eq!(body, b"already=encoded%20");
    assert!(head.contains("Content-Length: 18\r\n"));

    let (head, body) = split_head(&log.requests[1]);
    assert!(body.is_empty());
    assert!(head.contains("Content-Type: application/x-www-form-urlencoded\r\n"));
    assert!(head.contains("Content-Length: 0\r\n"));
}

#[test]
fn test_multipart_upload_carries_binary_content() {
    let mut payload = vec![0u8; 4096];
    rand::thread_rng().fill_bytes(&mut payload);

    let network = MockNetwork::new().reply(b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n");
    let log = network.log();
    let mut client = Client::new(network, "uploads.example.com", 80).unwrap();

    let boundary = Boundary::from_seed(7);
    let form = Form::new()
        .text("caption", "sunset")
        .file("photo", InputFile::new("photo.bin", "application/octet-stream", &payload));
    let body = client.post_multipart_with("upload", &form, &boundary).unwrap();
    assert!(body.is_empty());
    assert_eq!(client.status_code(), Some(201));

    let request = log.borrow().requests[0].clone();
    let (head, sent) = split_head(&request);
    assert_eq!(sent, multipart::encode(&boundary, &form));
    assert!(head.contains(&format!("Content-Type: {}\r\n", boundary.content_type())));
    assert!(head.contains(&format!("Content-Length: {}\r\n", sent.len())));
    assert!(sent.windows(payload.len()).any(|w| w == payload.as_slice()));
}

#[cfg(feature = "std")]
#[test]
fn test_post_file_uses_generated_boundary() {
    let network = MockNetwork::new().reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    let file = InputFile::new("notes.txt", "text/plain", b"remember");
    client
        .post_file("files", [("owner", "me")], "attachment", file)
        .unwrap();

    let request = log.borrow().requests[0].clone();
    let (head, body) = split_head(&request);
    let marker = "Content-Type: multipart/form-data; boundary=";
    let start = head.find(marker).unwrap() + marker.len();
    let boundary = &head[start..start + head[start..].find("\r\n").unwrap()];

    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.starts_with(&format!("--{boundary}\r\n")));
    assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    let owner = body.find("name=\"owner\"").unwrap();
    let attachment = body.find("name=\"attachment\"; filename=\"notes.txt\"").unwrap();
    assert!(owner < attachment);
}

#[test]
fn test_reserved_headers_are_rejected() {
    let mut client = Client::new(MockNetwork::new(), "example.com", 80).unwrap();

    for name in ["Host", "CONTENT-LENGTH", "content-type", " User-Agent "] {
        assert!(matches!(
            client.set_header(name, "x"),
            Err(Error::ReservedHeader(_))
        ));
    }
    assert!(matches!(client.set_header("", "x"), Err(Error::InvalidHeader(_))));
    assert!(matches!(
        client.set_header("X-Evil", "a\r\nHost: other"),
        Err(Error::InvalidHeader(_))
    ));
    assert!(client.headers().is_empty());
}

#[test]
fn test_host_with_line_break_is_rejected() {
    let network = MockNetwork::new().reply(OK);
    let log = network.log();

    let err = Client::new(network, "a\r\nX-Evil: 1", 80).unwrap_err();
    assert_eq!(err, Error::InvalidHeader("host".into()));
    assert!(err.is_config());
    assert!(log.borrow().remotes.is_empty());

    assert!(Client::new(MockNetwork::new(), "two words", 80).is_err());
    assert!(Client::new(MockNetwork::new(), "", 80).is_err());
}

#[test]
fn test_custom_headers_on_the_wire() {
    let network = MockNetwork::new().reply(OK).reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    client.set_header("X-Trace", " abc ").unwrap();
    client.set_header("Accept", "*/*").unwrap();
    client.get("").unwrap();

    client.unset_header("x-trace");
    client.unset_header("never-set");
    client.get("").unwrap();

    let log = log.borrow();
    let (first, _) = split_head(&log.requests[0]);
    assert!(first.ends_with("Host: example.com\r\naccept: */*\r\nx-trace: abc\r\n\r\n"));
    let (second, _) = split_head(&log.requests[1]);
    assert!(second.ends_with("Host: example.com\r\naccept: */*\r\n\r\n"));
}

#[test]
fn test_connect_failure() {
    let network = MockNetwork::new().reply_with(b"", Fault::Connect);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    let err = client.get("").unwrap_err();
    assert!(matches!(err, Error::Transport { stage: Stage::Connect, .. }));
    assert!(err.is_transport());
    assert_eq!(client.status(), None);
    assert_eq!(log.borrow().closed, 0);
}

#[test]
fn test_write_failure_closes_connection() {
    let network = MockNetwork::new().reply_with(OK, Fault::Write);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    let err = client.get("").unwrap_err();
    assert!(matches!(err, Error::Transport { stage: Stage::Write, .. }));
    assert_eq!(log.borrow().closed, 1);
}

#[test]
fn test_read_failure_clears_last_response() {
    let network = MockNetwork::new()
        .reply(OK)
        .reply_with(b"HTTP/1.1 200 OK\r\nContent-Length: 50\r\n\r\npartial", Fault::ReadAfterReply);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    client.get("").unwrap();
    assert!(client.status().is_some());

    let err = client.get("").unwrap_err();
    assert!(matches!(err, Error::Transport { stage: Stage::Read, .. }));
    assert_eq!(client.status(), None);
    assert!(client.response_headers().is_none());
    assert_eq!(log.borrow().closed, 2);
}

#[test]
fn test_close_failure_is_not_an_error() {
    let network = MockNetwork::new().reply_with(OK, Fault::Close);
    let mut client = Client::new(network, "example.com", 80).unwrap();

    assert_eq!(client.get("").unwrap(), b"OK");
    assert_eq!(client.status_code(), Some(200));
}

#[test]
fn test_malformed_response_is_absorbed() {
    let network = MockNetwork::new()
        .reply(b"garbage\r\nno colon here\r\nContent-Length: nope\r\n\r\ntrailing");
    let mut client = Client::new(network, "example.com", 80).unwrap();

    let body = client.get("").unwrap();
    assert!(body.is_empty());
    assert_eq!(client.status(), Some("garbage"));
    assert_eq!(client.status_code(), None);
    assert_eq!(client.response_headers().unwrap().len(), 1);
}

#[test]
fn test_send_returns_full_response() {
    let network = MockNetwork::new()
        .reply(b"HTTP/1.1 404 Not Found\r\nServer: mock\r\nContent-Length: 4\r\n\r\ngone");
    let mut client = Client::new(network, "example.com", 80).unwrap();

    let response = client.send(&Request::get("missing")).unwrap();
    assert_eq!(response.status_code(), Some(404));
    assert_eq!(response.headers.get("server"), Some("mock"));
    assert_eq!(response.body, b"gone");
}

#[test]
fn test_observer_sees_every_response() {
    let network = MockNetwork::new()
        .reply(OK)
        .reply(b"HTTP/1.1 500 Internal Server Error\r\n\r\n")
        .reply(OK);
    let mut client = Client::new(network, "example.com", 80).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    client.set_observer(move |response: &Response| {
        sink.lock().unwrap().push(response.status_code());
    });

    client.get("").unwrap();
    client.get("").unwrap();
    client.clear_observer();
    client.get("").unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some(200), Some(500)]);
}

#[test]
fn test_timeouts_reach_the_connector() {
    let network = MockNetwork::new().reply(OK);
    let log = network.log();
    let mut client = Client::new(network, "example.com", 80).unwrap();

    assert_eq!(client.set_connect_timeout(Duration::ZERO), Err(Error::InvalidTimeout));
    assert_eq!(client.set_response_timeout(Duration::ZERO), Err(Error::InvalidTimeout));
    client.set_connect_timeout(Duration::from_secs(5)).unwrap();
    client.set_response_timeout(Duration::from_millis(750)).unwrap();
    client.get("").unwrap();

    let expected = Timeouts {
        connect: Duration::from_secs(5),
        response: Duration::from_millis(750),
    };
    assert_eq!(client.timeouts(), expected);
    assert_eq!(log.borrow().remotes[0].2, expected);
}

#[test]
fn test_client_from_config() {
    let config = Config::from_json(
        r#"{"host":"api.local","port":8081,"user_agent":"probe/2","response_timeout_ms":1500}"#,
    )
    .unwrap();
    let network = MockNetwork::new().reply(OK);
    let log = network.log();
    let mut client = Client::with_config(network, config).unwrap();
    client.get("ping").unwrap();

    let log = log.borrow();
    assert_eq!(log.remotes[0].0, "api.local");
    assert_eq!(log.remotes[0].1, 8081);
    assert_eq!(log.remotes[0].2.response, Duration::from_millis(1500));
    assert_eq!(
        log.requests[0],
        b"GET /ping HTTP/1.1\r\nUser-Agent: probe/2\r\nHost: api.local\r\n\r\n"
    );
}

#[test]
fn test_invalid_user_agent_is_rejected() {
    let err = Client::with_user_agent(MockNetwork::new(), "example.com", 80, "bad\r\nagent").unwrap_err();
    assert!(err.is_config());

    let client = Client::with_user_agent(MockNetwork::new(), "example.com", 80, "probe/3").unwrap();
    assert_eq!(client.user_agent(), "probe/3");
    assert_eq!(client.host(), "example.com");
    assert_eq!(client.port(), 80);
}
