use chisel_dom::builder::Parser;
use criterion::{criterion_group, criterion_main, Criterion};

/// Generate a synthetic document with the given number of records
fn synthetic_document(records: usize) -> String {
    let mut buffer = String::from("{\"records\":[");
    for i in 0..records {
        if i > 0 {
            buffer.push(',');
        }
        buffer.push_str(&format!(
            "{{\"id\":{},\"label\":\"record-{}\",\"weight\":{}.25,\"active\":{}}}",
            i,
            i,
            i,
            i % 3 == 0
        ));
    }
    buffer.push_str("]}");
    buffer
}

macro_rules! build_parse_benchmark {
    ($func : tt, $records : expr) => {
        fn $func(c: &mut Criterion) {
            let document = synthetic_document($records);
            let parser = Parser::default();
            c.bench_function(concat!("parse of ", stringify!($func)), |b| {
                b.iter(|| parser.parse_str(&document))
            });
        }
    };
}

build_parse_benchmark!(small_documents, 10);
build_parse_benchmark!(medium_documents, 1_000);
build_parse_benchmark!(large_documents, 50_000);

criterion_group!(
    benches,
    small_documents,
    medium_documents,
    large_documents
);
criterion_main!(benches);
