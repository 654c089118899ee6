use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vehicle_config_audit::json;
use vehicle_config_audit::services::normalizer;

const INFO: &str = r#"{
    // exported by the vehicle editor
    "Name": "Pickup Crew Cab",
    "Brand": "Gavril",
    "Country": "United States",
    "Type": "Truck",
    "Body Style": "Pickup",
    "Config Type": "Factory",
    "Configuration": "Crew Cab /* long bed */",
    "Years": {"min": 1990, "max": 1998,},
    "Value": 12000,
    "Population": 800,
    "aggregates": {"Years": {"min": 1987, "max": 2001}},
}"#;

fn jbeam_document(parts: usize) -> String {
    let mut text = String::from("{\n");
    for i in 0..parts {
        text.push_str(&format!(
            "    \"part_{i}\": {{\n        // slot {i}\n        \"information\": {{\"name\": \"Part {i}\", \"value\": {}}},\n        \"slotType\": \"slot_{i}\",\n    }},\n",
            i * 10
        ));
    }
    text.push('}');
    text
}

fn bench_parse_info(c: &mut Criterion) {
    c.bench_function("parse info file", |b| {
        b.iter(|| json::parse(black_box(INFO)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let Ok(root) = json::parse(INFO) else {
        panic!("benchmark fixture must parse");
    };
    c.bench_function("normalize info fields", |b| {
        b.iter(|| normalizer::normalize(black_box(&root), "crew"))
    });
}

fn bench_parse_jbeam(c: &mut Criterion) {
    let text = jbeam_document(500);
    c.bench_function("parse 500-part jbeam", |b| {
        b.iter(|| json::parse(black_box(&text)))
    });
}

criterion_group!(benches, bench_parse_info, bench_normalize, bench_parse_jbeam);
criterion_main!(benches);
