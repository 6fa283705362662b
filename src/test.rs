use crate::schema::DRAFT_2020_12;
use crate::{parse, Encoder, OfficialResolver};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

mod any;
mod arrays;
mod canonicalizer;
mod integers;
mod objects;

macro_rules! category {
    ($category:ident) => {
        #[test]
        fn $category() {
            run_category(stringify!($category));
        }
    };
}

category!(integer);
category!(real);
category!(string);
category!(choice);
category!(array);
category!(object);
category!(any);

fn run_category(name: &str) {
    for r in fs::read_dir(format!("tests/{}", name)).unwrap() {
        let path = r.unwrap().path();
        if path.extension() != Some(OsStr::new("json")) {
            continue;
        }

        run_test(&path);
    }
}

fn run_test(path: &Path) {
    println!("testing {}", path.display());

    let test_case = fs::read(path).unwrap();
    let test_case = serde_json::from_slice::<TestCase>(&test_case).unwrap();

    let encoding = crate::load(&test_case.schema, &OfficialResolver, Some(DRAFT_2020_12)).unwrap();
    if let Some(expected) = &test_case.encoding {
        assert_eq!(parse(expected).unwrap(), encoding);
    }

    let expected = STANDARD.decode(&test_case.bytes).unwrap();

    let mut encoder = Encoder::new(vec![]);
    encoder.encode(&test_case.value, &encoding).unwrap();
    let actual = encoder.into_inner();
    assert_eq!(expected, actual);

    let actual = crate::from_slice(&expected, &encoding).unwrap();
    assert_eq!(test_case.value, actual);

    let actual = crate::from_reader(&*expected, &encoding).unwrap();
    assert_eq!(test_case.value, actual);
}

#[derive(Deserialize)]
struct TestCase {
    schema: Value,
    #[serde(default)]
    encoding: Option<Value>,
    value: Value,
    bytes: String,
}
