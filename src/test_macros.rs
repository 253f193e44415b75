#[macro_export]
macro_rules! parsed {
    ($text : expr) => {{
        $crate::builder::Parser::default().parse_str($text).unwrap()
    }};
}

#[macro_export]
macro_rules! int_payload {
    ($node : expr) => {{
        $node.payload().unwrap().as_i64().unwrap()
    }};
}
