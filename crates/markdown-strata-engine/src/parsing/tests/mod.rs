//! End-to-end tests for block parsing.
//!
//! Each case parses a small document, checks the structural invariants and
//! compares the outline rendering.

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::error::ParseError;
use crate::parsing::{
    Parser, ParserOptions,
    blocks::BlockKind,
    inline::{InlineInput, InlineTextCollector},
    snapshot::{invariants, outline},
};

fn parse_outline(md: &str) -> String {
    let doc = Parser::new().parse(md).unwrap();
    invariants(&doc);
    outline(&doc)
}

#[test]
fn quote_then_paragraph() {
    assert_snapshot!(parse_outline("> a\n> b\n\nc\n"), @r#"
    Document
      BlockQuote
        Paragraph ["a", "b"]
      Paragraph ["c"]
    "#);
}

#[test]
fn lazy_continuation_stays_in_quote() {
    assert_snapshot!(parse_outline("> a\nb"), @r#"
    Document
      BlockQuote
        Paragraph ["a", "b"]
    "#);
}

#[test]
fn two_blank_lines_end_a_list() {
    assert_snapshot!(parse_outline("- a\n\n\n  b\n"), @r#"
    Document
      ListBlock(bullet -, tight)
        ListItem
          Paragraph ["a"]
      Paragraph ["b"]
    "#);
}

#[test]
fn blank_line_between_items_makes_list_loose() {
    assert_snapshot!(parse_outline("- a\n\n- b\n"), @r#"
    Document
      ListBlock(bullet -, loose)
        ListItem
          Paragraph ["a"]
        ListItem
          Paragraph ["b"]
    "#);
}

#[test]
fn changing_bullet_starts_a_new_list() {
    assert_snapshot!(parse_outline("- a\n+ b\n"), @r#"
    Document
      ListBlock(bullet -, tight)
        ListItem
          Paragraph ["a"]
      ListBlock(bullet +, tight)
        ListItem
          Paragraph ["b"]
    "#);
}

#[test]
fn only_lists_starting_at_one_interrupt_paragraphs() {
    assert_snapshot!(parse_outline("text\n2. no\n1. yes\n"), @r#"
    Document
      Paragraph ["text", "2. no"]
      ListBlock(ordered 1., tight)
        ListItem
          Paragraph ["yes"]
    "#);
}

#[test]
fn tab_indented_continuation_of_list_item() {
    assert_snapshot!(parse_outline("  - foo\n\n\tbar\n"), @r#"
    Document
      ListBlock(bullet -, loose)
        ListItem
          Paragraph ["foo"]
          Paragraph ["bar"]
    "#);
}

#[test]
fn partial_tab_inside_quote_becomes_spaces() {
    assert_snapshot!(parse_outline(">\t\tfoo\n"), @r#"
    Document
      BlockQuote
        IndentedCodeBlock ["  foo"]
    "#);
}

#[test]
fn setext_heading_replaces_paragraph() {
    assert_snapshot!(parse_outline("Title\n=====\n\nbody\n"), @r#"
    Document
      Heading(h1, setext) ["Title"]
      Paragraph ["body"]
    "#);
}

#[test]
fn setext_underline_wins_over_thematic_break() {
    assert_snapshot!(parse_outline("Foo\n---\n- - -\n"), @r#"
    Document
      Heading(h2, setext) ["Foo"]
      ThematicBreak
    "#);
}

#[test]
fn atx_heading_strips_closing_sequence() {
    assert_snapshot!(parse_outline("# Hello #\n## World\n"), @r#"
    Document
      Heading(h1) ["Hello"]
      Heading(h2) ["World"]
    "#);
}

#[test]
fn fenced_code_keeps_raw_lines() {
    assert_snapshot!(parse_outline("```rust\nfn main() {}\n\n> not a quote\n```\nafter\n"), @r#"
    Document
      FencedCodeBlock(rust) ["fn main() {}", "", "> not a quote"]
      Paragraph ["after"]
    "#);
}

#[test]
fn unclosed_fence_runs_to_end_of_container() {
    assert_snapshot!(parse_outline("> ~~~\n> code\n\nafter\n"), @r#"
    Document
      BlockQuote
        FencedCodeBlock ["code"]
      Paragraph ["after"]
    "#);
}

#[test]
fn indented_code_drops_trailing_blank_lines() {
    assert_snapshot!(parse_outline("    code\n\n    more\n\n\ntext\n"), @r#"
    Document
      IndentedCodeBlock ["code", "", "more"]
      Paragraph ["text"]
    "#);
}

#[test]
fn indented_line_after_paragraph_is_continuation() {
    assert_snapshot!(parse_outline("para\n    still para\n"), @r#"
    Document
      Paragraph ["para", "still para"]
    "#);
}

#[test]
fn html_block_ends_at_blank_line() {
    assert_snapshot!(parse_outline("<div>\n*hi*\n\npara\n"), @r#"
    Document
      HtmlBlock(condition 6) ["<div>", "*hi*"]
      Paragraph ["para"]
    "#);
}

#[test]
fn html_comment_ends_at_its_closer() {
    assert_snapshot!(parse_outline("<!-- a -->\nafter\n"), @r#"
    Document
      HtmlBlock(condition 2) ["<!-- a -->"]
      Paragraph ["after"]
    "#);
}

#[test]
fn reference_definitions_are_collected_and_removed() {
    let doc = Parser::new()
        .parse("[foo]: /url \"title\"\n\nSee [Foo].\n")
        .unwrap();
    invariants(&doc);
    assert_snapshot!(outline(&doc), @r#"
    Document
      Paragraph ["See [Foo]."]
    "#);

    let references = doc.references().unwrap();
    assert_eq!(references.len(), 1);
    let foo = references.get("FOO").unwrap();
    assert_eq!(foo.destination, "/url");
    assert_eq!(foo.title.as_deref(), Some("title"));
}

#[test]
fn reference_definition_consumes_only_its_lines() {
    assert_snapshot!(parse_outline("[foo]: /url\nbar\n"), @r#"
    Document
      Paragraph ["bar"]
    "#);
}

#[test]
fn first_reference_definition_wins() {
    let doc = Parser::new()
        .parse("[a]: /first\n[A]: /second\n")
        .unwrap();
    assert!(doc.children(doc.root()).is_empty());
    assert_eq!(doc.references().unwrap().get("a").unwrap().destination, "/first");
}

#[test]
fn disabled_reference_definitions_stay_paragraphs() {
    let options = ParserOptions {
        reference_definitions: false,
        ..ParserOptions::default()
    };
    let doc = Parser::with_options(options).parse("[foo]: /url\n").unwrap();
    assert!(doc.references().is_none());
    assert_eq!(doc.lines_of(doc.children(doc.root())[0]), vec!["[foo]: /url"]);
}

#[test]
fn disabled_lists_are_paragraphs() {
    let options = ParserOptions {
        lists: false,
        ..ParserOptions::default()
    };
    let doc = Parser::with_options(options).parse("- a\n- b\n").unwrap();
    assert_snapshot!(outline(&doc), @r#"
    Document
      Paragraph ["- a", "- b"]
    "#);
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("   \n\t\n")]
fn blank_documents_have_no_blocks(#[case] md: &str) {
    let doc = Parser::new().parse(md).unwrap();
    assert!(doc.children(doc.root()).is_empty());
}

#[test]
fn crlf_line_endings() {
    assert_snapshot!(parse_outline("a\r\nb\r\n\r\n- c\r\n"), @r#"
    Document
      Paragraph ["a", "b"]
      ListBlock(bullet -, tight)
        ListItem
          Paragraph ["c"]
    "#);
}

#[test]
fn nested_containers() {
    assert_snapshot!(parse_outline("> - one\n>   > deep\n> - two\n"), @r#"
    Document
      BlockQuote
        ListBlock(bullet -, tight)
          ListItem
            Paragraph ["one"]
            BlockQuote
              Paragraph ["deep"]
          ListItem
            Paragraph ["two"]
    "#);
}

#[rstest]
#[case("> a\n> b\n\nc\n")]
#[case("- a\n  - b\n\n    c\n- d\n")]
#[case("1. x\n2. y\n\n\n3. z\n")]
#[case("> ```\n> a\n\n```\n")]
#[case("# h\n===\n---\n***\n")]
#[case("\t- a\n\t\t- b\n")]
#[case("<pre>\n\n</pre>\n<?x?>\n")]
#[case("[a]: <b>\n[c]: d 'e'\nf\n\n[g]: h\n")]
fn trees_are_well_formed(#[case] md: &str) {
    let doc = Parser::new().parse(md).unwrap();
    invariants(&doc);
    for block in doc.blocks() {
        assert!(doc.tree().is_attached(block));
    }
}

#[test]
fn inline_parser_sees_leaf_content_once() {
    let mut collector = InlineTextCollector::default();
    let doc = Parser::new()
        .parse_with_inline("# Head\n\npara\nmore\n```\ncode\n```\n", &mut collector)
        .unwrap();
    let children = doc.children(doc.root()).to_vec();

    assert_eq!(collector.initialized, 1);
    assert_eq!(collector.finalized, 1);
    assert_eq!(
        collector.inputs,
        vec![
            InlineInput {
                block: children[0],
                kind: BlockKind::Heading,
                text: "Head".to_string(),
            },
            InlineInput {
                block: children[1],
                kind: BlockKind::Paragraph,
                text: "para\nmore".to_string(),
            },
        ]
    );
}

#[test]
fn replaced_paragraph_is_not_handed_to_inline_parser() {
    let mut collector = InlineTextCollector::default();
    Parser::new()
        .parse_with_inline("Title\n---\n", &mut collector)
        .unwrap();
    let kinds: Vec<_> = collector.inputs.iter().map(|input| input.kind).collect();
    assert_eq!(kinds, vec![BlockKind::Heading]);
}

/// A reader that fails on the first read.
struct BrokenReader;

impl std::io::Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk went away"))
    }
}

#[test]
fn reader_failure_is_an_io_error() {
    let err = Parser::new().parse_reader(BrokenReader).unwrap_err();
    assert!(matches!(err, ParseError::Io(_)));
    assert!(err.to_string().contains("disk went away"));
}

#[test]
fn parse_reader_reads_everything() {
    let doc = Parser::new().parse_reader("a\n\nb\n".as_bytes()).unwrap();
    assert_eq!(doc.children(doc.root()).len(), 2);
}
