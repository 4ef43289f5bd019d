//! Tests for snippet packing and base-name segments

use rstest::rstest;

use redoscript::domain::{pack, unpack, unpack_join, DomainError, Snippets};

#[rstest]
#[case(&["abc"], "abc")]
#[case(&["abc", "def"], "abc+def")]
#[case(&["abc+def", "ghi"], "abc$def+ghi")]
#[case(&["a$b", "c"], "a!b+c")]
fn given_parts_when_packing_at_level_zero_then_encoding_matches(
    #[case] parts: &[&str],
    #[case] expected: &str,
) {
    let parts: Vec<String> = parts.iter().map(|s| s.to_string()).collect();
    assert_eq!(pack(&parts, 0).unwrap(), expected);
}

#[rstest]
#[case("abc", &["abc"])]
#[case("abc+def", &["abc", "def"])]
#[case("abc$def+ghi", &["abc+def", "ghi"])]
fn given_packed_name_when_unpacking_then_parts_match(
    #[case] name: &str,
    #[case] expected: &[&str],
) {
    assert_eq!(unpack(name, 0).unwrap(), expected);
}

#[rstest]
#[case(&["report", "2024"], 0)]
#[case(&["a+b", "c$d", "plain"], 0)]
#[case(&["x", "y"], 1)]
#[case(&["one"], 2)]
fn given_any_parts_when_packing_then_unpacking_restores_them(
    #[case] parts: &[&str],
    #[case] level: usize,
) {
    let parts: Vec<String> = parts.iter().map(|s| s.to_string()).collect();
    let packed = pack(&parts, level).unwrap();
    assert_eq!(unpack(&packed, level).unwrap(), parts);
}

#[test]
fn given_packed_name_when_unpack_joining_then_parts_become_dotted_name() {
    assert_eq!(unpack_join("a+b+c", 0).unwrap(), "a.b.c");
}

#[test]
fn given_level_beyond_ladder_then_pack_and_unpack_reject_it() {
    assert!(matches!(
        pack(&["a".to_string()], 9).unwrap_err(),
        DomainError::InvalidPackLevel { level: 9, .. }
    ));
    assert!(matches!(
        unpack("a", 9).unwrap_err(),
        DomainError::InvalidPackLevel { level: 9, .. }
    ));
}

#[test]
fn given_base_name_then_snippets_expose_segments_and_groupings() {
    let snippets = Snippets::new("out/report.2024.csv");

    assert_eq!(snippets.segments(), ["report", "2024", "csv"]);
    assert_eq!(snippets.joined(), "report.2024.csv");
    assert_eq!(snippets.take(2), ["report", "2024.csv"]);
    assert_eq!(snippets.iter().count(), 3);
}
