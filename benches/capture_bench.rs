// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nuotta::network::{CapturedEntry, Redactor, ResponseInfo, TransportKind};
use nuotta::users::{dispatch, UserRegistry};
use serde_json::json;

fn redaction_benchmark(c: &mut Criterion) {
    let redactor = Redactor::default();
    let body = "token=xoxc-1234567890-abcdef&channel=C01&ts=1700000000.0001&\
                cookie_hint=xoxd-AbCd%2FeFgH&_x_reason=conversations-view"
        .repeat(20);
    let headers = vec![
        ("Authorization", "Bearer xoxp-1-2-3"),
        ("Content-Type", "application/x-www-form-urlencoded"),
        ("Cookie", "d=xoxd-secret"),
        ("X-Slack-Client-Request-Id", "abc"),
    ];

    c.bench_function("sanitize_body_text", |b| {
        b.iter(|| black_box(redactor.sanitize_body_text(black_box(&body))))
    });

    c.bench_function("sanitize_headers", |b| {
        b.iter(|| black_box(redactor.sanitize_headers(headers.iter().copied())))
    });
}

fn dispatch_benchmark(c: &mut Criterion) {
    let items: Vec<_> = (0..100)
        .map(|n| {
            json!({
                "id": format!("U{:04}", n),
                "name": format!("user{}", n),
                "profile": {
                    "display_name": format!("User {}", n),
                    "real_name": format!("User Number {}", n),
                    "email": format!("user{}@example.com", n),
                    "image_72": "https://avatars.example.com/72.png"
                }
            })
        })
        .collect();
    let body = json!({ "ok": true, "items": items });
    let entry = CapturedEntry::new(
        TransportKind::Xhr,
        "POST",
        "https://app.slack.com/api/search.modules.people",
    )
    .with_response(ResponseInfo::new(200).with_body(body.to_string(), Some(body)));

    c.bench_function("dispatch_people_search_100", |b| {
        b.iter(|| {
            let mut registry = UserRegistry::new();
            black_box(dispatch(black_box(&entry), &mut registry))
        })
    });

    let mut warm = UserRegistry::new();
    dispatch(&entry, &mut warm);
    c.bench_function("dispatch_people_search_100_merge", |b| {
        b.iter(|| black_box(dispatch(black_box(&entry), &mut warm)))
    });
}

criterion_group!(benches, redaction_benchmark, dispatch_benchmark);
criterion_main!(benches);
