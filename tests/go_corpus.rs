use go125_astjson::{json_to_source, reprint, source_to_json, Options};
use walkdir::WalkDir;

#[test]
fn round_trips_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GO125_ASTJSON_CORPUS") else {
        eprintln!("GO125_ASTJSON_CORPUS not set; skipping corpus test");
        return;
    };

    let root = root.to_string_lossy().to_string();
    let opts = Options::new()
        .with_comments(true)
        .with_positions(true)
        .with_references(true)
        .with_imports(true);
    let mut total = 0usize;
    let mut skipped = 0usize;

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        // testdata trees are full of intentionally broken files.
        if path.to_string_lossy().contains("testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };
        let name = path.display().to_string();

        // Files the parser rejects are not the codec's concern.
        let Ok(expected) = reprint(&src, &name, true) else {
            skipped += 1;
            continue;
        };
        total += 1;

        let json = source_to_json(&src, &name, &opts)
            .unwrap_or_else(|e| panic!("{name}: marshal failed: {e}"));
        let back = json_to_source(&json, &opts)
            .unwrap_or_else(|e| panic!("{name}: unmarshal failed: {e}"));
        assert_eq!(back, expected, "round trip changed {name}");
    }

    eprintln!("Round-tripped {total} Go files ({skipped} not parseable).");
}
