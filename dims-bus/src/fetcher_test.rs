use std::{sync::Arc, time::Duration};

use futures::future::join_all;
use tokio::sync::Semaphore;

use super::ItemFetcher;
use crate::{
    testing::{Reply, StubTransport},
    types::{Dimensions, FetchOutcome},
};

fn fetcher(transport: Arc<StubTransport>, permits: usize, timeout: Duration) -> ItemFetcher {
    ItemFetcher::new(
        transport,
        Arc::new(Semaphore::new(permits)),
        timeout,
        10 * 1024 * 1024,
    )
}

#[tokio::test]
async fn test_fetch_success() {
    let transport = Arc::new(StubTransport::new().reply("http://x/1.png", Reply::Image(10, 10)));
    let fetcher = fetcher(transport.clone(), 4, Duration::from_secs(10));

    let (id, outcome) = fetcher.fetch("http://x/1.png".to_string()).await;
    assert_eq!(id, "http://x/1.png");
    assert_eq!(outcome, FetchOutcome::Success(Dimensions::new(10, 10)));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_fetch_transport_timeout_is_failure() {
    let transport = Arc::new(StubTransport::new().reply("http://x/2.png", Reply::Timeout));
    let fetcher = fetcher(transport, 4, Duration::from_secs(10));

    let (id, outcome) = fetcher.fetch("http://x/2.png".to_string()).await;
    assert_eq!(id, "http://x/2.png");
    assert_eq!(outcome, FetchOutcome::Failure);
}

#[tokio::test]
async fn test_fetch_hang_resolves_after_timeout() {
    let transport = Arc::new(StubTransport::new().reply("http://x/hang", Reply::Hang));
    let fetcher = fetcher(transport, 4, Duration::from_millis(50));

    let started = std::time::Instant::now();
    let (_, outcome) = fetcher.fetch("http://x/hang".to_string()).await;
    assert_eq!(outcome, FetchOutcome::Failure);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_fetch_status_and_decode_failures() {
    let transport = Arc::new(
        StubTransport::new()
            .reply("http://x/500", Reply::Status(500))
            .reply("http://x/text", Reply::Body(b"hello".to_vec())),
    );
    let fetcher = fetcher(transport, 4, Duration::from_secs(10));

    for url in ["http://x/500", "http://x/text", "http://x/unknown"] {
        let (_, outcome) = fetcher.fetch(url.to_string()).await;
        assert_eq!(outcome, FetchOutcome::Failure, "{}", url);
    }
}

#[tokio::test]
async fn test_fetch_respects_permit_ceiling() {
    let mut stub = StubTransport::new().delay(Duration::from_millis(20));
    let urls: Vec<String> = (0..12).map(|i| format!("http://x/{}.png", i)).collect();
    for url in &urls {
        stub = stub.reply(url, Reply::Image(1, 1));
    }
    let transport = Arc::new(stub);
    let fetcher = fetcher(transport.clone(), 3, Duration::from_secs(10));

    let results = join_all(urls.iter().cloned().map(|u| fetcher.fetch(u))).await;
    assert!(results.iter().all(|(_, o)| o.is_success()));
    assert!(transport.peak() <= 3, "peak {}", transport.peak());
    assert_eq!(transport.calls(), 12);
}

#[tokio::test]
async fn test_fetch_with_closed_permits_is_failure() {
    let transport = Arc::new(StubTransport::new().reply("http://x/1.png", Reply::Image(1, 1)));
    let permits = Arc::new(Semaphore::new(2));
    let fetcher = ItemFetcher::new(
        transport.clone(),
        Arc::clone(&permits),
        Duration::from_secs(10),
        1024,
    );
    permits.close();

    let (_, outcome) = fetcher.fetch("http://x/1.png".to_string()).await;
    assert_eq!(outcome, FetchOutcome::Failure);
    assert_eq!(transport.calls(), 0);
}
