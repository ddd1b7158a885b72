//! Whole-file conversions and the stdin/stdout conventions of the CLI.

use std::fs;
use std::io::{self, Read, Write};

use go125_syntax::{parse_file, ParseMode};
use tracing::instrument;

use crate::error::Result;
use crate::marshal::{marshal, to_json};
use crate::options::Options;
use crate::unmarshal::unmarshal;

/// Parses Go source and writes its JSON form. The source is parsed with
/// comments exactly when `opts.with_comments` is set.
#[instrument(skip(src, opts), fields(len = src.len()))]
pub fn source_to_json(src: &str, filename: &str, opts: &Options) -> Result<String> {
    let sf = parse_file(filename, src, opts.parse_mode())?;
    to_json(&marshal(&sf, opts), opts.indent)
}

/// Decodes a JSON document and prints it as Go source.
#[instrument(skip_all, fields(len = json.len()))]
pub fn json_to_source(json: &str, opts: &Options) -> Result<String> {
    Ok(unmarshal(json, opts)?.print())
}

/// Parses and prints without going through JSON; the reference output a
/// round trip is compared against.
#[instrument(skip(src), fields(len = src.len()))]
pub fn reprint(src: &str, filename: &str, comments: bool) -> Result<String> {
    Ok(parse_file(filename, src, ParseMode::with_comments(comments))?.print())
}

/// Reads `path`, or stdin for `""` and `"-"`.
pub fn read_input(path: &str) -> Result<String> {
    if path.is_empty() || path == "-" {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(fs::read_to_string(path)?)
}

/// Writes `text` to `path`, or stdout for `""`.
pub fn write_output(path: &str, text: &str) -> Result<()> {
    if path.is_empty() {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        return Ok(());
    }
    Ok(fs::write(path, text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    const SRC: &str = "package main\n\nfunc main() {\n\tprintln(\"hi\")\n}\n";

    #[test]
    fn go_json_go() {
        for opts in Options::all_combinations() {
            let json = source_to_json(SRC, "main.go", &opts).unwrap();
            assert_eq!(json_to_source(&json, &opts).unwrap(), reprint(SRC, "main.go", opts.with_comments).unwrap());
        }
    }

    #[test]
    fn parse_errors_surface_as_parse_failures() {
        let err = source_to_json("package\n", "bad.go", &Options::new()).unwrap_err();
        assert!(matches!(err, CodecError::Parse(_)), "{err}");
        assert!(err.to_string().starts_with("bad.go:"), "{err}");
    }

    #[test]
    fn files_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("go125_astjson_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.json");
        let path = path.to_str().unwrap();
        write_output(path, "{}").unwrap();
        assert_eq!(read_input(path).unwrap(), "{}");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let err = read_input("/definitely/not/here.go").unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
