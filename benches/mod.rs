use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    network::application::http::client::bench_encode_query,
    network::application::http::client::bench_multipart,
    network::application::http::client::bench_read_response,
    network::application::http::client::bench_exchange
);
criterion_main!(benches);
