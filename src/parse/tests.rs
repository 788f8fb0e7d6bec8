use super::*;
use crate::prompt::PromptTemplate;

fn parse_response(text: &str) -> ParsedResult {
    ResponseParser::new(&PromptTemplate::default().critique_label)
        .unwrap()
        .parse(text)
}

fn card(title: &str, content: &str) -> TransformationCard {
    TransformationCard { title: title.into(), content: content.into() }
}

#[test]
fn parses_critique_and_cards_in_order() {
    let text = "**Coach's Critique:** Use active voice.\n\n### Proofread\n```\nHello world.\n```\n\n### Shorten\n```\nHi.\n```";
    let parsed = parse_response(text);
    assert_eq!(parsed.critique, "Use active voice.");
    assert_eq!(
        parsed.transformations,
        vec![card("Proofread", "Hello world."), card("Shorten", "Hi.")]
    );
}

#[test]
fn empty_input_yields_empty_result() {
    assert_eq!(parse_response(""), ParsedResult::default());
}

#[test]
fn garbage_input_yields_empty_result() {
    let parsed = parse_response("\u{0}\u{1}```###\u{7f}``` not markdown at all ### ");
    assert_eq!(parsed.critique, "");
    assert!(parsed.transformations.is_empty());
}

#[test]
fn missing_critique_keeps_cards() {
    let text = "### Friendly\n```\nHey there!\n```\n";
    let parsed = parse_response(text);
    assert_eq!(parsed.critique, "");
    assert_eq!(parsed.transformations, vec![card("Friendly", "Hey there!")]);
}

#[test]
fn critique_marker_is_case_insensitive() {
    let text = "**COACH'S CRITIQUE:** Cut the hedging.\n### Shorten\n```\nDo it.\n```";
    assert_eq!(parse_response(text).critique, "Cut the hedging.");
}

#[test]
fn critique_falls_back_to_bare_marker() {
    let text = "Critique: Too many adverbs.\n\n### Simplify\n```\nShort.\n```";
    assert_eq!(parse_response(text).critique, "Too many adverbs.");
}

#[test]
fn fallback_keeps_text_after_the_bare_marker_verbatim() {
    // A curly apostrophe misses the bold label, so the bare marker matches and
    // its closing `**` stays in the critique.
    let text = "**Coach\u{2019}s Critique:** Weak verbs.\n### Modernize\n```\nLead.\n```";
    assert_eq!(parse_response(text).critique, "** Weak verbs.");
}

#[test]
fn critique_without_following_heading_is_ignored() {
    let text = "**Coach's Critique:** Nothing follows.";
    assert_eq!(parse_response(text).critique, "");
}

#[test]
fn critique_spans_multiple_lines() {
    let text = "**Coach's Critique:** Line one.\nLine two.\n\n### Proofread\n```\nx\n```";
    assert_eq!(parse_response(text).critique, "Line one.\nLine two.");
}

#[test]
fn custom_label_parser() {
    let parser = ResponseParser::new("Rationale").unwrap();
    let text = "**Rationale:** Prioritized proofreading.\n\n### Proofread\n```\nFixed.\n```";
    let parsed = parser.parse(text);
    assert_eq!(parsed.critique, "Prioritized proofreading.");
    assert_eq!(parsed.transformations, vec![card("Proofread", "Fixed.")]);
}

#[test]
fn label_with_regex_metacharacters_is_literal() {
    let parser = ResponseParser::new("Notes (v2)?").unwrap();
    let text = "**Notes (v2)?:** Literal.\n### A\n```\nb\n```";
    assert_eq!(parser.parse(text).critique, "Literal.");
}

#[test]
fn tolerates_gap_between_heading_and_fence() {
    let text = "### Rephrase for Clarity\n\nA smoother version follows.\n\n```\nSmooth text.\n```";
    let parsed = parse_response(text);
    assert_eq!(parsed.transformations, vec![card("Rephrase for Clarity", "Smooth text.")]);
}

#[test]
fn heading_takes_next_fence_even_if_it_belongs_to_a_later_heading() {
    let text = "### Proofread\nno block here\n\n### Shorten\n```\nHi.\n```\n\n### Emojify\n```\nHi 👋\n```";
    let parsed = parse_response(text);
    assert_eq!(
        parsed.transformations,
        vec![card("Proofread", "Hi."), card("Emojify", "Hi 👋")]
    );
}

#[test]
fn trailing_heading_without_fence_is_omitted() {
    let text = "### Proofread\n```\nOk.\n```\n\n### Shorten\nforgot the block";
    let parsed = parse_response(text);
    assert_eq!(parsed.transformations, vec![card("Proofread", "Ok.")]);
}

#[test]
fn heading_with_unclosed_fence_is_omitted() {
    let text = "### Proofread\n```\nnever closed";
    assert!(parse_response(text).transformations.is_empty());
}

#[test]
fn order_follows_source_not_alphabet() {
    let text = "### Zebra\n```\nz\n```\n### Apple\n```\na\n```\n### Mango\n```\nm\n```";
    let titles: Vec<String> = parse_response(text)
        .transformations
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, ["Zebra", "Apple", "Mango"]);
}

#[test]
fn duplicate_titles_are_kept() {
    let text = "### Shorten\n```\none\n```\n### Shorten\n```\ntwo\n```";
    let parsed = parse_response(text);
    assert_eq!(parsed.transformations, vec![card("Shorten", "one"), card("Shorten", "two")]);
}

#[test]
fn count_is_not_padded_to_the_requested_categories() {
    let text = "**Coach's Critique:** x\n### Only One\n```\n1\n```";
    assert_eq!(parse_response(text).transformations.len(), 1);
}

#[test]
fn heading_marker_inside_a_block_is_content() {
    let text = "### Proofread\n```\n### not a heading\nbody\n```\n### Shorten\n```\ns\n```";
    let parsed = parse_response(text);
    assert_eq!(
        parsed.transformations,
        vec![card("Proofread", "### not a heading\nbody"), card("Shorten", "s")]
    );
}

#[test]
fn info_string_stays_in_content() {
    let text = "### Proofread\n```text\nHello.\n```";
    assert_eq!(parse_response(text).transformations, vec![card("Proofread", "text\nHello.")]);
}

#[test]
fn empty_block_yields_empty_content() {
    let text = "### Proofread\n```\n```";
    assert_eq!(parse_response(text).transformations, vec![card("Proofread", "")]);
}

#[test]
fn heading_after_closing_fence_on_same_line() {
    let text = "### A\n```\na\n```### B\n```\nb\n```";
    assert_eq!(parse_response(text).transformations, vec![card("A", "a"), card("B", "b")]);
}

#[test]
fn whitespace_only_block_does_not_close_on_its_own_fence() {
    // Leading whitespace is skipped before looking for the closing fence.
    let text = "### A\n```\n   \n```\nx\n```";
    assert_eq!(parse_response(text).transformations, vec![card("A", "```\nx")]);
}

#[test]
fn marker_alone_takes_title_from_next_line() {
    let text = "###\n\nFriendly\n```\nHey!\n```";
    assert_eq!(parse_response(text).transformations, vec![card("Friendly", "Hey!")]);
}

#[test]
fn crlf_line_endings() {
    let text = "**Coach's Critique:** Tighten.\r\n\r\n### Shorten\r\n```\r\nShort.\r\n```\r\n";
    let parsed = parse_response(text);
    assert_eq!(parsed.critique, "Tighten.");
    assert_eq!(parsed.transformations, vec![card("Shorten", "Short.")]);
}

#[test]
fn content_is_not_escaped() {
    let text = "### Friendly\n```\n<b>hi</b> & \"bye\"\n```";
    assert_eq!(parse_response(text).transformations[0].content, "<b>hi</b> & \"bye\"");
}

#[test]
fn parsing_twice_gives_equal_results() {
    let text = "**Coach's Critique:** a\n### B\n```\nc\n```";
    assert_eq!(parse_response(text), parse_response(text));
}

#[test]
fn parses_output_shaped_like_the_prompt_requests() {
    let prompt = PromptTemplate::default().build(&crate::wire::GenerationRequestConfig {
        user_text: "x".into(),
        ..Default::default()
    });
    // The format example in the prompt is itself parseable.
    let parsed = parse_response(&prompt);
    assert_eq!(parsed.transformations, vec![card("[Category Name]", "[Transformed Text]")]);
}
