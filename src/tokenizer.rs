/// Splits a command line into tokens.
///
/// Tokens are separated by ASCII spaces. A pair of `"` groups a token so it can
/// contain spaces; the quotes themselves are dropped. Inside a quoted span a
/// doubled quote (`""`) stands for one literal `"`. A quote left open simply
/// runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut frozen = false;
    let mut just_unfroze = false;

    for c in line.chars() {
        if !frozen && c == ' ' {
            just_unfroze = false;
            if !buffer.is_empty() {
                tokens.push(std::mem::take(&mut buffer));
            }
            continue;
        }

        if c == '"' {
            if just_unfroze {
                // `""` inside a span: literal quote, span continues
                buffer.push('"');
                frozen = true;
                just_unfroze = false;
            } else {
                just_unfroze = frozen;
                frozen = !frozen;
            }
            continue;
        }

        just_unfroze = false;
        buffer.push(c);
    }

    if !buffer.is_empty() {
        tokens.push(buffer);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|token| token.to_string()).collect()
    }

    #[test]
    fn splits_on_spaces_and_drops_runs_of_them() {
        assert_eq!(tokenize("a b c"), owned(&["a", "b", "c"]));
        assert_eq!(tokenize("  new   10  20 "), owned(&["new", "10", "20"]));
    }

    #[test]
    fn quotes_group_spaces_into_one_token() {
        assert_eq!(tokenize("a \"b c\" d"), owned(&["a", "b c", "d"]));
        assert_eq!(
            tokenize("save \"my picture.png\""),
            owned(&["save", "my picture.png"])
        );
    }

    #[test]
    fn doubled_quote_inside_span_is_literal() {
        assert_eq!(tokenize("a \"\"\"\" b"), owned(&["a", "\"", "b"]));
        assert_eq!(tokenize("\"a\"\"b\""), owned(&["a\"b"]));
        assert_eq!(tokenize("\"a\"\"b c\""), owned(&["a\"b c"]));
    }

    #[test]
    fn quotes_glue_onto_adjacent_text() {
        assert_eq!(tokenize("ab\"c d\"e f"), owned(&["abc de", "f"]));
    }

    #[test]
    fn empty_quoted_span_yields_nothing() {
        assert_eq!(tokenize("a \"\" b"), owned(&["a", "b"]));
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        assert_eq!(tokenize("a \"bc"), owned(&["a", "bc"]));
        assert_eq!(tokenize("a \"b c "), owned(&["a", "b c "]));
    }

    #[test]
    fn empty_and_blank_lines_have_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
    }

    #[test]
    fn tabs_are_not_separators() {
        assert_eq!(tokenize("a\tb"), owned(&["a\tb"]));
    }
}
