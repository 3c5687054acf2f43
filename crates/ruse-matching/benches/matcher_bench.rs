use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ruse_matching::{Matcher, RequestMessage, RequestSpec};

fn build_specs(count: usize) -> Vec<RequestSpec> {
    (0..count)
        .map(|i| {
            RequestSpec::builder()
                .get()
                .path(format!("/api/v1/endpoint{i}"))
                .build()
                .unwrap()
        })
        .collect()
}

fn build_specs_with_regex(count: usize) -> Vec<RequestSpec> {
    (0..count)
        .map(|i| {
            RequestSpec::builder()
                .get()
                .path(Matcher::regex(format!(r"^/api/v\d+/endpoint{i}$")).unwrap())
                .build()
                .unwrap()
        })
        .collect()
}

/// First-match selection, as a routing layer would run it.
fn find_matching_spec<'a>(
    specs: &'a [RequestSpec],
    request: &RequestMessage,
) -> Option<&'a RequestSpec> {
    specs.iter().find(|spec| spec.is_match(request))
}

fn bench_spec_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("spec_matching");

    for spec_count in [10, 50, 100, 500, 1000].iter() {
        let specs = build_specs(*spec_count);

        // Matching the first spec (best case)
        let first = RequestMessage::new(
            "http://localhost/api/v1/endpoint0".parse().unwrap(),
            "GET",
        );

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("match_first", spec_count),
            spec_count,
            |b, _| {
                b.iter(|| find_matching_spec(black_box(&specs), black_box(&first)));
            },
        );

        // Matching a middle spec (average case)
        let middle_idx = spec_count / 2;
        let middle = RequestMessage::new(
            format!("http://localhost/api/v1/endpoint{middle_idx}")
                .parse()
                .unwrap(),
            "GET",
        );

        group.bench_with_input(
            BenchmarkId::new("match_middle", spec_count),
            spec_count,
            |b, _| {
                b.iter(|| find_matching_spec(black_box(&specs), black_box(&middle)));
            },
        );

        // Matching the last spec (worst case)
        let last_idx = spec_count - 1;
        let last = RequestMessage::new(
            format!("http://localhost/api/v1/endpoint{last_idx}")
                .parse()
                .unwrap(),
            "GET",
        );

        group.bench_with_input(
            BenchmarkId::new("match_last", spec_count),
            spec_count,
            |b, _| {
                b.iter(|| find_matching_spec(black_box(&specs), black_box(&last)));
            },
        );

        // No match (scans every spec)
        let none = RequestMessage::new("http://localhost/not/found".parse().unwrap(), "GET");

        group.bench_with_input(
            BenchmarkId::new("match_none", spec_count),
            spec_count,
            |b, _| {
                b.iter(|| find_matching_spec(black_box(&specs), black_box(&none)));
            },
        );
    }

    group.finish();
}

fn bench_regex_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("regex_matching");

    for spec_count in [10, 50, 100].iter() {
        let specs = build_specs_with_regex(*spec_count);
        let request = RequestMessage::new(
            "http://localhost/api/v1/endpoint50".parse().unwrap(),
            "GET",
        );

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("regex_match", spec_count),
            spec_count,
            |b, _| {
                b.iter(|| find_matching_spec(black_box(&specs), black_box(&request)));
            },
        );
    }

    group.finish();
}

fn bench_single_spec_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_spec_eval");
    group.throughput(Throughput::Elements(1));

    let path_spec = RequestSpec::builder()
        .get()
        .path("/api/v1/test")
        .build()
        .unwrap();
    let plain = RequestMessage::new("http://localhost/api/v1/test".parse().unwrap(), "GET");

    group.bench_function("path_only", |b| {
        b.iter(|| path_spec.is_match(black_box(&plain)));
    });

    // Structural body matchers re-parse the candidate per evaluation
    let xpath_spec = RequestSpec::builder()
        .post()
        .body(Matcher::xpath("/todo-list[count(todo-item) = 3]").unwrap())
        .build()
        .unwrap();
    let xml = RequestMessage::new("http://localhost/todo".parse().unwrap(), "POST")
        .with_body("<todo-list><todo-item/><todo-item/><todo-item/></todo-list>");

    group.bench_function("xpath_body", |b| {
        b.iter(|| xpath_spec.is_match(black_box(&xml)));
    });

    let json_spec = RequestSpec::builder()
        .post()
        .body(Matcher::json_path("$.things[?(@.name == 'RequiredThing')]").unwrap())
        .build()
        .unwrap();
    let json = RequestMessage::new("http://localhost/things".parse().unwrap(), "POST")
        .with_body(r#"{"things": [{"name": "RequiredThing"}]}"#);

    group.bench_function("jsonpath_body", |b| {
        b.iter(|| json_spec.is_match(black_box(&json)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_spec_matching,
    bench_regex_matching,
    bench_single_spec_evaluation
);
criterion_main!(benches);
