use std::time::{Duration, Instant};

use httpmock::prelude::*;

use copyaudit::{Error, Fetcher, Options};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fast_options() -> Options {
    Options {
        retry_base_delay: Duration::from_millis(50),
        request_timeout: Duration::from_secs(5),
        ..Options::default()
    }
}

#[tokio::test]
async fn redirect_chain_accumulates_cookies() {
    init_logging();
    let server = MockServer::start_async().await;

    let first = server
        .mock_async(|when, then| {
            when.method(GET).path("/a");
            then.status(302)
                .header("Location", "/b")
                .header("Set-Cookie", "a=1; Path=/");
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path("/b").header("cookie", "a=1");
            then.status(302)
                .header("Location", "/c")
                .header("Set-Cookie", "b=2; HttpOnly");
        })
        .await;
    let last = server
        .mock_async(|when, then| {
            when.method(GET).path("/c").header("cookie", "a=1; b=2");
            then.status(200)
                .header("Set-Cookie", "c=3")
                .body("<html><body><p>You made it to the landing page.</p></body></html>");
        })
        .await;

    let fetcher = Fetcher::new(&fast_options()).unwrap();
    let result = fetcher.fetch(&server.url("/a")).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    last.assert_async().await;
    assert!(result.final_url.ends_with("/c"));
    assert!(result.html.contains("landing page"));
}

#[tokio::test]
async fn script_redirect_without_location_header_is_followed() {
    init_logging();
    let server = MockServer::start_async().await;

    let hop = server
        .mock_async(|when, then| {
            when.method(GET).path("/go");
            then.status(302).body(format!(
                "<html><body><script>window.location.href='{}';</script></body></html>",
                server.url("/dest")
            ));
        })
        .await;
    let dest = server
        .mock_async(|when, then| {
            when.method(GET).path("/dest");
            then.status(200)
                .body("<html><body><p>Destination page content here.</p></body></html>");
        })
        .await;

    let fetcher = Fetcher::new(&fast_options()).unwrap();
    let result = fetcher.fetch(&server.url("/go")).await.unwrap();

    hop.assert_async().await;
    dest.assert_async().await;
    assert!(result.final_url.ends_with("/dest"));
    assert_eq!(result.content.paragraphs, vec![
        "Destination page content here.".to_string()
    ]);
}

#[tokio::test]
async fn relative_redirect_resolves_against_current_hop() {
    init_logging();
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/campaign/entry");
            then.status(301).header("Location", "final");
        })
        .await;
    let dest = server
        .mock_async(|when, then| {
            when.method(GET).path("/campaign/final");
            then.status(200)
                .body("<html><body><p>Relative target reached.</p></body></html>");
        })
        .await;

    let fetcher = Fetcher::new(&fast_options()).unwrap();
    let result = fetcher.fetch(&server.url("/campaign/entry")).await.unwrap();

    dest.assert_async().await;
    assert!(result.final_url.ends_with("/campaign/final"));
}

#[tokio::test]
async fn server_errors_are_retried_with_backoff() {
    init_logging();
    let server = MockServer::start_async().await;

    let failing = server
        .mock_async(|when, then| {
            when.method(GET).path("/flaky");
            then.status(503).body("try later");
        })
        .await;

    let options = Options {
        max_retries: 3,
        ..fast_options()
    };
    let fetcher = Fetcher::new(&options).unwrap();
    let before = Instant::now();
    let err = fetcher.fetch(&server.url("/flaky")).await.unwrap_err();
    let elapsed = before.elapsed();

    assert_eq!(failing.hits_async().await, 3);
    match err {
        Error::Fetch { attempts, message } => {
            assert_eq!(attempts, 3);
            assert!(message.contains("503"), "unexpected message: {message}");
        }
        other => panic!("expected Error::Fetch, got {other:?}"),
    }
    // Two backoff sleeps: 50ms + 100ms.
    assert!(
        elapsed >= Duration::from_millis(150),
        "retries finished too fast: {elapsed:?}"
    );
}

#[tokio::test]
async fn timeouts_recover_on_a_later_attempt() {
    init_logging();
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // httpmock cannot vary a response across calls, so a minimal
    // hand-rolled server stalls the first two connections past the
    // client timeout and answers the third.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut connections = 0u32;
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            connections += 1;
            let stall = connections <= 2;
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                if stall {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    return;
                }
                let body =
                    "<html><body><p>Recovered after transient failures.</p></body></html>";
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    let options = Options {
        request_timeout: Duration::from_millis(200),
        retry_base_delay: Duration::from_millis(50),
        ..Options::default()
    };
    let fetcher = Fetcher::new(&options).unwrap();
    let before = Instant::now();
    let result = fetcher.fetch(&format!("http://{addr}/flaky")).await.unwrap();

    assert!(result.html.contains("Recovered"));
    // Two timed-out attempts plus backoff sleeps of 50ms and 100ms
    // must pass before the third attempt can succeed.
    assert!(
        before.elapsed() >= Duration::from_millis(550),
        "succeeded too fast: {:?}",
        before.elapsed()
    );
}

#[tokio::test]
async fn client_errors_fail_without_retry() {
    init_logging();
    let server = MockServer::start_async().await;

    let gone = server
        .mock_async(|when, then| {
            when.method(GET).path("/gone");
            then.status(404).body("nope");
        })
        .await;

    let fetcher = Fetcher::new(&fast_options()).unwrap();
    let err = fetcher.fetch(&server.url("/gone")).await.unwrap_err();

    assert_eq!(gone.hits_async().await, 1);
    match err {
        Error::Fetch { attempts, message } => {
            assert_eq!(attempts, 1);
            assert!(message.contains("404"), "unexpected message: {message}");
        }
        other => panic!("expected Error::Fetch, got {other:?}"),
    }
}

#[tokio::test]
async fn redirect_cap_uses_the_last_response() {
    init_logging();
    let server = MockServer::start_async().await;

    // Redirects to itself forever.
    let looping = server
        .mock_async(|when, then| {
            when.method(GET).path("/loop");
            then.status(302)
                .header("Location", "/loop")
                .body("<html><body><p>Interstitial page body text.</p></body></html>");
        })
        .await;

    let options = Options {
        max_redirects: 3,
        ..fast_options()
    };
    let fetcher = Fetcher::new(&options).unwrap();
    let result = fetcher.fetch(&server.url("/loop")).await.unwrap();

    // Initial request plus three followed hops.
    assert_eq!(looping.hits_async().await, 4);
    assert!(result.html.contains("Interstitial"));
}
