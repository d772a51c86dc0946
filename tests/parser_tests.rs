//! Integration tests for reading and printing path text.

use tracepath::path::{IndexOperation, Path, PathError, PathToken, SyntaxErrorKind};

fn syntax_error(text: &str) -> (usize, SyntaxErrorKind) {
    match Path::parse(text) {
        Err(PathError::Syntax { offset, kind }) => (offset, kind),
        other => panic!("expected a syntax error for {:?}, got {:?}", text, other),
    }
}

fn only_index(text: &str) -> (IndexOperation, Vec<i64>) {
    let path = Path::parse(text).unwrap();
    assert_eq!(path.token_count(), 2, "{} should have one token after $", text);
    match path.last() {
        PathToken::Index(index) => (index.operation(), index.operands().to_vec()),
        other => panic!("expected an index token, got {:?}", other),
    }
}

#[test]
fn test_slice_and_single_index() {
    let slice = Path::parse("$[2:5]").unwrap();
    assert_eq!(only_index("$[2:5]"), (IndexOperation::SliceBetween, vec![2, 5]));
    assert!(!slice.is_path_definite());

    let single = Path::parse("$[7]").unwrap();
    assert_eq!(only_index("$[7]"), (IndexOperation::SingleIndex, vec![7]));
    assert!(single.is_path_definite());
}

#[test]
fn test_every_index_form() {
    assert_eq!(only_index("$[2:]"), (IndexOperation::SliceFrom, vec![2]));
    assert_eq!(only_index("$[:5]"), (IndexOperation::SliceTo, vec![5]));
    assert_eq!(only_index("$[1,3,5]"), (IndexOperation::IndexSequence, vec![1, 3, 5]));
    assert_eq!(only_index("$[@.size()-1]"), (IndexOperation::ContextSize, vec![-1]));
    assert_eq!(only_index("$[@.size()+2]"), (IndexOperation::ContextSize, vec![2]));
}

#[test]
fn test_canonical_text() {
    let cases = [
        ("$", "$"),
        ("$.dataset[3].name", "$.dataset[3].name"),
        ("$['dataset']", "$.dataset"),
        ("$[\"my prop\"]", "$[\"my prop\"]"),
        ("$['a', 'b']", "$[\"a\",\"b\"]"),
        ("$.dataset.*", "$.dataset[*]"),
        ("$[ALL][ 2 ]", "$[ALL][2]"),
        ("$[\"3\"]", "$[\"3\"]"),
        ("$[\"a.b\"]", "$[\"a.b\"]"),
        ("$[\"say \\\"hi\\\"\"]", "$[\"say \\\"hi\\\"\"]"),
        (" $.padded ", "$.padded"),
    ];

    for (input, expected) in cases {
        let path = Path::parse(input).unwrap();
        assert_eq!(path.to_text(), expected, "canonical form of {}", input);
        assert_eq!(Path::parse(&path.to_text()).unwrap(), path);
    }
}

#[test]
fn test_whitespace_between_segments() {
    let spaced = Path::parse("$ . store [ 0 ] . name").unwrap();
    assert_eq!(spaced, Path::parse("$.store[0].name").unwrap());
}

#[test]
fn test_extreme_size_offsets_round_trip() {
    for offset in [i64::MIN, -1, 0, i64::MAX] {
        let path = Path::root()
            .append(PathToken::context_size(offset).unwrap())
            .unwrap();
        assert_eq!(Path::parse(&path.to_text()).unwrap(), path, "{}", path);
    }
    assert_eq!(
        Path::root()
            .append(PathToken::context_size(i64::MIN).unwrap())
            .unwrap()
            .to_text(),
        "$[@.size()-9223372036854775808]"
    );
}

#[test]
fn test_wildcard_spellings_are_distinct() {
    let star = Path::parse("$.rows[*]").unwrap();
    let all = Path::parse("$.rows[ALL]").unwrap();

    assert_ne!(star, all);
    assert_eq!(star.last(), &PathToken::wildcard());
    assert_eq!(all.last(), &PathToken::all());
}

#[test]
fn test_numeric_property_stays_a_property() {
    let path = Path::parse("$[\"3\"]").unwrap();
    assert_eq!(path.last(), &PathToken::property("3").unwrap());
    assert_ne!(path, Path::parse("$[3]").unwrap());
}

#[test]
fn test_syntax_error_offsets() {
    assert_eq!(syntax_error(""), (0, SyntaxErrorKind::EmptyPath));
    assert_eq!(syntax_error("dataset"), (0, SyntaxErrorKind::MalformedRoot));
    assert_eq!(syntax_error("$.a[3"), (3, SyntaxErrorKind::UnterminatedBracket));
    assert_eq!(syntax_error("$..price"), (2, SyntaxErrorKind::RecursiveDescent));
    assert_eq!(
        syntax_error("$[abc]"),
        (2, SyntaxErrorKind::NonNumericIndex("abc".to_string()))
    );
    assert_eq!(syntax_error("$['open"), (2, SyntaxErrorKind::UnterminatedString));
}

#[test]
fn test_invalid_tokens_in_text() {
    assert!(matches!(
        syntax_error("$.items[-1]"),
        (7, SyntaxErrorKind::InvalidToken(_))
    ));
    assert!(matches!(
        syntax_error("$[5:2]"),
        (1, SyntaxErrorKind::InvalidToken(_))
    ));
}

#[test]
fn test_syntax_error_message() {
    let err = Path::parse("$.a[3").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid path syntax at position 3: unterminated bracket"
    );
}
