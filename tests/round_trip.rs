mod common;

use go125_astjson::{
    json_to_source, marshal, reprint, source_to_json, to_json, unmarshal, Options,
};
use go125_astjson::syntax::{parse_file, ParseMode};

#[test]
fn fixtures_print_identically_under_every_option_combination() {
    for (name, src) in common::fixtures() {
        for opts in Options::all_combinations() {
            let json = source_to_json(&src, &name, &opts)
                .unwrap_or_else(|e| panic!("{name} {opts:?}: {e}"));
            let back = json_to_source(&json, &opts)
                .unwrap_or_else(|e| panic!("{name} {opts:?}: {e}"));
            let expected = reprint(&src, &name, opts.with_comments).unwrap();
            assert_eq!(back, expected, "{name} with {opts:?}");
        }
    }
}

#[test]
fn decoded_trees_encode_to_the_same_document() {
    for (name, src) in common::fixtures() {
        for opts in Options::all_combinations() {
            let json = source_to_json(&src, &name, &opts).unwrap();
            let sf = unmarshal(&json, &opts).unwrap();
            let again = to_json(&marshal(&sf, &opts), 0).unwrap();
            assert_eq!(again, json, "{name} with {opts:?}");
        }
    }
}

#[test]
fn decoded_trees_keep_every_kind() {
    for (name, src) in common::fixtures() {
        let sf = parse_file(&name, &src, ParseMode::default()).unwrap();
        let opts = Options::new();
        let json = source_to_json(&src, &name, &opts).unwrap();
        let back = unmarshal(&json, &opts).unwrap();
        assert_eq!(common::kinds(&back), common::kinds(&sf), "{name}");
    }
}

#[test]
fn pretty_and_compact_decode_alike() {
    let (name, src) = common::fixtures().remove(0);
    let compact = source_to_json(&src, &name, &Options::new()).unwrap();
    let pretty = source_to_json(&src, &name, &Options::new().with_indent(2)).unwrap();
    assert!(pretty.lines().count() > 10);
    assert!(pretty.ends_with('\n'));
    assert_eq!(
        json_to_source(&pretty, &Options::new()).unwrap(),
        json_to_source(&compact, &Options::new()).unwrap()
    );
}

#[test]
fn positions_survive_a_round_trip() {
    let (name, src) = common::fixtures().remove(0);
    let opts = Options::new().with_positions(true);
    let json = source_to_json(&src, &name, &opts).unwrap();
    let sf = unmarshal(&json, &opts).unwrap();
    assert_eq!(sf.source_map.filename(), name);

    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    let pkg = &v["Package"];
    let line = pkg["Line"].as_u64().unwrap() as usize;
    let resolved = sf.source_map.resolve(sf.file.package).unwrap();
    assert_eq!(resolved.line, line);
    assert_eq!(resolved.column, 1);
}
