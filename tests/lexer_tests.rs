use lox::error::ErrorKind;
use lox::lexer::{scan, TokenType};
use lox::value::Value;
use pretty_assertions::assert_eq;

fn types(source: &str) -> Vec<TokenType> {
    scan(source)
        .unwrap()
        .into_iter()
        .map(|token| token.token_type)
        .collect()
}

#[test]
fn punctuation_and_operators() {
    use TokenType::*;
    assert_eq!(
        types("(){},.-+;/*?: ! != = == > >= < <="),
        vec![
            LeftParen,
            RightParen,
            LeftBrace,
            RightBrace,
            Comma,
            Dot,
            Minus,
            Plus,
            Semicolon,
            Slash,
            Star,
            Question,
            Colon,
            Bang,
            BangEqual,
            Equal,
            EqualEqual,
            Greater,
            GreaterEqual,
            Less,
            LessEqual,
            Eof,
        ]
    );
}

#[test]
fn keywords_and_identifiers() {
    use TokenType::*;
    assert_eq!(
        types("and class else false for fun if nil or print return super this true var while _name x1"),
        vec![
            And, Class, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True,
            Var, While, Identifier, Identifier, Eof,
        ]
    );
}

#[test]
fn number_literals_are_doubles() {
    let tokens = scan("123 45.67 8.").unwrap();
    assert_eq!(tokens[0].literal, Some(Value::Number(123.0)));
    assert_eq!(tokens[1].literal, Some(Value::Number(45.67)));
    assert_eq!(tokens[1].lexeme, "45.67");
    // A trailing dot is not part of the number
    assert_eq!(tokens[2].literal, Some(Value::Number(8.0)));
    assert_eq!(tokens[3].token_type, TokenType::Dot);
}

#[test]
fn string_literal_holds_contents() {
    let tokens = scan("\"hi there\"").unwrap();
    assert_eq!(tokens[0].token_type, TokenType::String);
    assert_eq!(tokens[0].lexeme, "\"hi there\"");
    assert_eq!(tokens[0].literal, Some(Value::String("hi there".to_string())));
}

#[test]
fn tracks_lines_and_columns() {
    let tokens = scan("1 +\n  \"a\nb\" // note\n*").unwrap();
    let positions: Vec<(usize, usize)> = tokens.iter().map(|t| (t.line, t.column)).collect();
    assert_eq!(positions, vec![(1, 1), (1, 3), (2, 3), (4, 1), (4, 2)]);
}

#[test]
fn spans_count_characters() {
    let tokens = scan("\"é\" + 1").unwrap();
    assert_eq!((tokens[0].span.start, tokens[0].span.end), (0, 3));
    assert_eq!((tokens[1].span.start, tokens[1].span.end), (4, 5));
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        types("// only a comment\n1 // another"),
        vec![TokenType::Number, TokenType::Eof]
    );
}

#[test]
fn empty_source_is_just_end_of_input() {
    let tokens = scan("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type, TokenType::Eof);
}

#[test]
fn unexpected_character() {
    let error = scan("1 +\n #").unwrap_err();
    assert_eq!(error.kind, ErrorKind::LexError);
    assert_eq!(error.message, "Unexpected character: '#'");
    assert_eq!((error.line, error.column), (2, 2));
    assert!(error.token.is_none());
    assert_eq!(error.to_string(), "[Pos 2:2] Error: Unexpected character: '#'");
}

#[test]
fn unterminated_string() {
    let error = scan("1 + \"abc").unwrap_err();
    assert_eq!(error.kind, ErrorKind::LexError);
    assert_eq!(error.message, "Unterminated string");
    assert_eq!((error.line, error.column), (1, 5));
}
