use formula_kit::highlight::{
    Category, DmlTokenizer, ExpressionTokenizer, Language, LineStream, QueryTokenizer, Tokenizer,
    TokenizerState, highlight_document, highlight_line,
};
use proptest::prelude::*;

fn tokenizers() -> Vec<(&'static str, &'static dyn Tokenizer)> {
    vec![
        ("cel", &ExpressionTokenizer as &dyn Tokenizer),
        ("soql", &QueryTokenizer as &dyn Tokenizer),
        ("dml", &DmlTokenizer as &dyn Tokenizer),
    ]
}

fn tokens<'a>(tokenizer: &dyn Tokenizer, line: &'a str) -> Vec<(&'a str, Category)> {
    let mut state = tokenizer.start_state();
    highlight_line(tokenizer, line, &mut state)
        .into_iter()
        .map(|span| (&line[span.start..span.end], span.category))
        .collect()
}

#[test]
fn test_well_formed_lines_close_strings() {
    let lines: [(&dyn Tokenizer, &str); 3] = [
        (&ExpressionTokenizer, r#"record.Name == "it's" && user.Id != 'x\'y'"#),
        (&QueryTokenizer, "SELECT Id FROM Account WHERE Name = 'O\\'Brien'"),
        (&DmlTokenizer, "UPDATE Account SET Name = 'a''b' WHERE Id = :id"),
    ];
    for (tokenizer, line) in lines {
        let mut state = tokenizer.start_state();
        highlight_line(tokenizer, line, &mut state);
        assert!(!state.in_string(), "{}", line);
    }
}

#[test]
fn test_unterminated_string_resumes_on_next_line() {
    for (name, tokenizer) in tokenizers() {
        let mut state = tokenizer.start_state();
        highlight_line(tokenizer, "x = 'first half", &mut state);
        assert_eq!(state.open_quote, Some('\''), "{}", name);

        let spans = highlight_line(tokenizer, "second half' 42", &mut state);
        assert!(!state.in_string(), "{}", name);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, "second half'".len());
        assert_eq!(spans[0].category, Category::String);
        assert_eq!(spans[1].category, Category::Number);
    }
}

#[test]
fn test_escaped_quote_does_not_close() {
    let mut state = TokenizerState::default();
    highlight_line(&QueryTokenizer, r"Name = 'abc\'", &mut state);
    assert_eq!(state.open_quote, Some('\''));
}

#[test]
fn test_double_quoted_string_carries_its_quote() {
    let mut state = TokenizerState::default();
    highlight_line(&ExpressionTokenizer, r#""it's"#, &mut state);
    assert_eq!(state.open_quote, Some('"'));
    let spans = highlight_line(&ExpressionTokenizer, r#"'still inside" + 1"#, &mut state);
    assert_eq!(spans[0].end, r#"'still inside""#.len());
    assert!(!state.in_string());
}

#[test]
fn test_block_comment_spans_lines() {
    let doc = "1 + /* start\n still comment\n end */ 2";
    let lines = highlight_document(&ExpressionTokenizer, doc);
    assert_eq!(lines[0].last().unwrap().category, Category::Comment);
    assert_eq!(lines[1].len(), 1);
    assert_eq!(lines[1][0].category, Category::Comment);
    assert_eq!(lines[2][0].category, Category::Comment);
    assert_eq!(lines[2][1].category, Category::Number);
}

#[test]
fn test_sql_languages_have_no_block_comments() {
    let line = "SELECT /* x */ Id -- trailing";
    let found = tokens(&QueryTokenizer, line);
    assert_eq!(found[1], ("/", Category::Operator));
    assert_eq!(found.last().unwrap(), &("-- trailing", Category::Comment));
}

#[test]
fn test_line_comments() {
    let found = tokens(&ExpressionTokenizer, "a // b 'c");
    assert_eq!(found, vec![("a", Category::Identifier), ("// b 'c", Category::Comment)]);
    let found = tokens(&DmlTokenizer, "DELETE FROM x -- why");
    assert_eq!(found.last().unwrap().1, Category::Comment);
}

#[test]
fn test_multi_character_operators_are_single_tokens() {
    let found = tokens(&ExpressionTokenizer, "a&&b||c==d!=e>=f<=g");
    let operators: Vec<&str> = found
        .iter()
        .filter(|(_, c)| *c == Category::Operator)
        .map(|(t, _)| *t)
        .collect();
    assert_eq!(operators, vec!["&&", "||", "==", "!=", ">=", "<="]);

    let found = tokens(&QueryTokenizer, "a<>b");
    assert_eq!(found[1], ("<>", Category::Operator));
}

#[test]
fn test_expression_categories() {
    let found = tokens(
        &ExpressionTokenizer,
        "has(record.Email) ? fn.fmt(now) : null",
    );
    assert_eq!(
        found,
        vec![
            ("has", Category::Function),
            ("(", Category::Punctuation),
            ("record", Category::Variable),
            (".", Category::Punctuation),
            ("Email", Category::Identifier),
            (")", Category::Punctuation),
            ("?", Category::Operator),
            ("fn", Category::Namespace),
            (".", Category::Punctuation),
            ("fmt", Category::Identifier),
            ("(", Category::Punctuation),
            ("now", Category::Variable),
            (")", Category::Punctuation),
            (":", Category::Operator),
            ("null", Category::Bool),
        ]
    );
}

#[test]
fn test_query_dates() {
    let found = tokens(
        &QueryTokenizer,
        "WHERE CreatedDate = TODAY OR CloseDate > NEXT_N_FISCAL_QUARTERS:2 OR d = 2024-03-01",
    );
    let dates: Vec<&str> = found
        .iter()
        .filter(|(_, c)| *c == Category::Date)
        .map(|(t, _)| *t)
        .collect();
    assert_eq!(dates, vec!["TODAY", "NEXT_N_FISCAL_QUARTERS:2", "2024-03-01"]);
}

#[test]
fn test_query_functions_and_literals() {
    let found = tokens(&QueryTokenizer, "SELECT count(Id) FROM Task WHERE IsClosed = false");
    assert_eq!(found[1], ("count", Category::Function));
    assert_eq!(found.last().unwrap(), &("false", Category::Bool));
}

#[test]
fn test_unknown_characters_are_skipped() {
    let found = tokens(&QueryTokenizer, "a # b");
    assert_eq!(found, vec![("a", Category::Identifier), ("b", Category::Identifier)]);
}

#[test]
fn test_language_names() {
    assert_eq!("cel".parse::<Language>(), Ok(Language::Expression));
    assert_eq!("SOQL".parse::<Language>(), Ok(Language::Query));
    assert_eq!("dml".parse::<Language>(), Ok(Language::Dml));
    assert!("yaml".parse::<Language>().is_err());
    assert_eq!(Language::Query.to_string(), "soql");
}

proptest! {
    #[test]
    fn prop_each_call_makes_progress(line in "\\PC{0,60}", lang in 0usize..3, quoted in any::<bool>()) {
        let (_, tokenizer) = tokenizers()[lang];
        let mut state = tokenizer.start_state();
        if quoted {
            state.open_quote = Some('\'');
        }
        let mut stream = LineStream::new(&line);
        while !stream.eol() {
            let before = stream.pos();
            tokenizer.token(&mut stream, &mut state);
            prop_assert!(stream.pos() > before);
        }
    }

    #[test]
    fn prop_spans_are_ordered_and_in_bounds(line in "\\PC{0,60}", lang in 0usize..3) {
        let (_, tokenizer) = tokenizers()[lang];
        let mut state = tokenizer.start_state();
        let spans = highlight_line(tokenizer, &line, &mut state);
        let mut last_end = 0;
        for span in spans {
            prop_assert!(span.start >= last_end);
            prop_assert!(span.end > span.start);
            prop_assert!(span.end <= line.len());
            prop_assert!(line.is_char_boundary(span.start) && line.is_char_boundary(span.end));
            last_end = span.end;
        }
    }
}
