use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use bytesize::ByteSize;
use chisel_dom::builder::{Parser, TreeBuilder};
use chisel_dom::events::Match;
use chisel_dom::pointer::JsonPointer;
use chisel_dom::tags::TypeTag;
use std::rc::Rc;
use std::time::Instant;

/// Assemble a reasonably involved synthetic document
fn synthetic_document(records: usize) -> String {
    let mut buffer = String::from("{\"records\":[");
    for i in 0..records {
        if i > 0 {
            buffer.push(',');
        }
        buffer.push_str(&format!(
            "{{\"id\":{},\"label\":\"record-{}\",\"weight\":{}.5,\"active\":{},\"notes\":null}}",
            i,
            i,
            i,
            i % 2 == 0
        ));
    }
    buffer.push_str("],\"count\":");
    buffer.push_str(&records.to_string());
    buffer.push('}');
    buffer
}

#[test]
fn should_parse_a_full_document_end_to_end() {
    let parser = Parser::default();
    let root = parser
        .parse_str(
            r#"{
                "title": "readings",
                "enabled": "yes",
                "threshold": "42",
                "series": [1, 2.5, true, null, "x"]
            }"#,
        )
        .unwrap();
    assert!(root.is_object());
    assert_eq!(root.name(), Some("root"));

    let enabled = root.lookup("ENABLED").unwrap();
    assert!(enabled.payload().unwrap().as_bool().unwrap());

    let threshold = root.lookup("threshold").unwrap();
    assert_eq!(threshold.payload().unwrap().as_i32().unwrap(), 42);

    let series = root.lookup("series").unwrap();
    assert!(series.is_array());
    // the pending property name leaks onto the array elements, so even the null element
    // carries a name and is attached rather than dropped
    assert_eq!(series.len(), 5);
    assert_eq!(series.get(0).unwrap().name(), Some("series"));
    assert_eq!(series.get(0).unwrap().tag(), Some(TypeTag::Int64));
    assert_eq!(series.get(1).unwrap().tag(), Some(TypeTag::Double));
    assert_eq!(series.get(2).unwrap().tag(), Some(TypeTag::Boolean));
    assert_eq!(series.get(3).unwrap().tag(), Some(TypeTag::Empty));
    assert!(series.get(3).unwrap().is_empty());
    assert_eq!(series.get(4).unwrap().tag(), Some(TypeTag::String));
}

#[test]
fn should_parse_bytes_and_chars_the_same_way() {
    let text = r#"{"a":{"b":3}}"#;
    let parser = Parser::default();
    let from_str = parser.parse_str(text).unwrap();
    let from_bytes = parser.parse_bytes(text.as_bytes()).unwrap();
    let from_chars = parser.parse(&mut text.chars()).unwrap();
    for root in [&from_str, &from_bytes, &from_chars] {
        assert_eq!(
            JsonPointer::parse("/a/b")
                .resolve(root)
                .unwrap()
                .payload()
                .unwrap()
                .as_i64()
                .unwrap(),
            3
        );
    }
}

#[test]
fn base64_wrapped_documents_should_parse_transparently() {
    let text = r#"{"payload": {"value": 17}}"#;
    let encoded = BASE64_STANDARD.encode(text);
    let parser = Parser::default();
    let root = parser.parse_str(&encoded).unwrap();
    // the single-property envelope also collapses away during the unwrap pass
    assert_eq!(root.name(), Some("payload"));
    assert_eq!(
        root.lookup("value")
            .unwrap()
            .payload()
            .unwrap()
            .as_i64()
            .unwrap(),
        17
    );
}

#[test]
fn collapse_should_make_wrapped_and_bare_objects_equivalent() {
    let parser = Parser::default();
    let wrapped = parser.parse_str(r#"[{"a":1}]"#).unwrap();
    let bare = parser.parse_str(r#"{"a":1}"#).unwrap();
    assert_eq!(wrapped.name(), bare.name());
    assert_eq!(wrapped.len(), bare.len());
    assert_eq!(
        wrapped.get(0).unwrap().payload(),
        bare.get(0).unwrap().payload()
    );
}

#[test]
fn token_level_builds_should_not_require_the_lexer() {
    let mut builder = TreeBuilder::new();
    builder
        .push(Match::StartObject)
        .push(Match::PropertyName("blob".to_string()))
        .push(Match::Bytes(b"\x00\x01\x02".to_vec()))
        .push(Match::PropertyName("flag".to_string()))
        .push(Match::Boolean(true))
        .push(Match::EndObject);
    let root = builder.finish().unwrap();
    let blob = root.lookup("blob").unwrap();
    assert_eq!(blob.tag(), Some(TypeTag::Bytes));
    assert_eq!(blob.payload().unwrap().as_bytes().unwrap().len(), 3);
}

#[test]
fn parents_should_be_walkable_from_any_depth() {
    let parser = Parser::default();
    let root = parser.parse_str(r#"{"a":{"b":{"c":1}},"d":2}"#).unwrap();
    let c = JsonPointer::parse("/a/b/c").resolve(&root).unwrap();
    let mut walked = c;
    let mut hops = 0;
    while let Some(parent) = walked.parent() {
        walked = parent;
        hops += 1;
    }
    assert_eq!(hops, 3);
    assert!(Rc::ptr_eq(&walked, &root));
}

#[test]
fn should_parse_larger_documents() {
    let text = synthetic_document(1000);
    let start = Instant::now();
    let parser = Parser::default();
    let root = parser.parse_str(&text).unwrap();
    println!(
        "Parsed {} in {:?}",
        ByteSize(text.len() as u64),
        start.elapsed()
    );
    let records = root.lookup("records").unwrap();
    assert_eq!(records.len(), 1000);
    assert_eq!(
        records
            .get(999)
            .unwrap()
            .lookup("label")
            .unwrap()
            .payload()
            .unwrap()
            .as_string()
            .unwrap(),
        "record-999"
    );
    assert_eq!(
        root.lookup("count")
            .unwrap()
            .payload()
            .unwrap()
            .as_u64()
            .unwrap(),
        1000
    );
}

#[test]
fn should_successfully_bail_on_malformed_input() {
    let parser = Parser::default();
    let parsed = parser.parse_str(r#"{"a": @}"#);
    println!("Parse result = {:?}", parsed);
    assert!(parsed.is_err());
}

#[test]
fn missing_files_should_be_reported_not_panicked() {
    let parser = Parser::default();
    assert!(parser.parse_file("no/such/file.json").is_err());
}
