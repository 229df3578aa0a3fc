use lox::ast::{Expr, Stmt};
use lox::error::ErrorKind;
use lox::lexer::{scan, Token, TokenType};
use lox::parser::{parse, Parser};
use lox::value::Value;
use pretty_assertions::assert_eq;

fn parse_source(source: &str) -> Result<Expr, lox::LoxError> {
    parse(scan(source)?)
}

fn parsed(source: &str) -> Expr {
    match parse_source(source) {
        Ok(expr) => expr,
        Err(error) => panic!("failed to parse {:?}: {}", source, error),
    }
}

fn op(token_type: TokenType, lexeme: &str) -> Token {
    Token::synthetic(token_type, lexeme)
}

fn num(n: f64) -> Expr {
    Expr::literal(n)
}

fn plus() -> Token {
    op(TokenType::Plus, "+")
}

fn minus() -> Token {
    op(TokenType::Minus, "-")
}

fn star() -> Token {
    op(TokenType::Star, "*")
}

fn slash() -> Token {
    op(TokenType::Slash, "/")
}

#[test]
fn simple_binary_expression() {
    assert_eq!(parsed("1 + 2"), Expr::binary(num(1.0), plus(), num(2.0)));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        parsed("1 + 2 * 3"),
        Expr::binary(num(1.0), plus(), Expr::binary(num(2.0), star(), num(3.0)))
    );
}

#[test]
fn grouping_overrides_precedence() {
    assert_eq!(
        parsed("(1 + 2) * 3"),
        Expr::binary(
            Expr::grouping(Expr::binary(num(1.0), plus(), num(2.0))),
            star(),
            num(3.0)
        )
    );
}

#[test]
fn term_is_left_associative() {
    assert_eq!(
        parsed("1 - 2 - 3"),
        Expr::binary(Expr::binary(num(1.0), minus(), num(2.0)), minus(), num(3.0))
    );
}

#[test]
fn factor_is_left_associative() {
    assert_eq!(
        parsed("8 / 4 / 2"),
        Expr::binary(Expr::binary(num(8.0), slash(), num(4.0)), slash(), num(2.0))
    );
}

#[test]
fn comparison_is_left_associative() {
    let less = op(TokenType::Less, "<");
    let less_equal = op(TokenType::LessEqual, "<=");
    assert_eq!(
        parsed("1 < 2 <= 3"),
        Expr::binary(Expr::binary(num(1.0), less, num(2.0)), less_equal, num(3.0))
    );
}

#[test]
fn equality_is_left_associative() {
    let equal = op(TokenType::EqualEqual, "==");
    let not_equal = op(TokenType::BangEqual, "!=");
    assert_eq!(
        parsed("1 == 2 != true"),
        Expr::binary(
            Expr::binary(num(1.0), equal, num(2.0)),
            not_equal,
            Expr::literal(true)
        )
    );
}

#[test]
fn comparison_binds_tighter_than_equality() {
    let equal = op(TokenType::EqualEqual, "==");
    let greater = op(TokenType::Greater, ">");
    assert_eq!(
        parsed("true == 2 > 1"),
        Expr::binary(
            Expr::literal(true),
            equal,
            Expr::binary(num(2.0), greater, num(1.0))
        )
    );
}

#[test]
fn repeated_unary_minus_nests() {
    assert_eq!(
        parsed("---5"),
        Expr::unary(minus(), Expr::unary(minus(), Expr::unary(minus(), num(5.0))))
    );
}

#[test]
fn unary_binds_tighter_than_factor() {
    let bang = op(TokenType::Bang, "!");
    assert_eq!(
        parsed("-1 * !2"),
        Expr::binary(
            Expr::unary(minus(), num(1.0)),
            star(),
            Expr::unary(bang, num(2.0))
        )
    );
}

#[test]
fn literals() {
    assert_eq!(parsed("nil"), Expr::Literal { value: Value::Nil });
    assert_eq!(parsed("false"), Expr::literal(false));
    assert_eq!(parsed("12.5"), num(12.5));
    assert_eq!(parsed("\"a b\""), Expr::literal("a b"));
}

#[test]
fn ternary_chains_in_false_branch() {
    assert_eq!(
        parsed("true ? 1 : false ? 2 : 3"),
        Expr::ternary(
            Expr::literal(true),
            num(1.0),
            Expr::ternary(Expr::literal(false), num(2.0), num(3.0))
        )
    );
}

#[test]
fn ternary_nests_in_true_branch() {
    assert_eq!(
        parsed("false ? true ? 1 : 2 : 3"),
        Expr::ternary(
            Expr::literal(false),
            Expr::ternary(Expr::literal(true), num(1.0), num(2.0)),
            num(3.0)
        )
    );
}

#[test]
fn ternary_binds_looser_than_equality() {
    let equal = op(TokenType::EqualEqual, "==");
    assert_eq!(
        parsed("1 == 2 ? 3 : 4 + 5"),
        Expr::ternary(
            Expr::binary(num(1.0), equal, num(2.0)),
            num(3.0),
            Expr::binary(num(4.0), plus(), num(5.0))
        )
    );
}

#[test]
fn parses_hand_built_tokens() {
    // Only the literal matters for number tokens; lexemes and positions are
    // whatever the producer put there.
    let tokens = vec![
        Token::synthetic(TokenType::Number, "1").with_literal(Value::Number(1.0)),
        op(TokenType::Plus, "+"),
        Token::synthetic(TokenType::Number, "2").with_literal(Value::Number(2.0)),
        Token::synthetic(TokenType::Eof, ""),
    ];
    assert_eq!(
        parse(tokens).unwrap(),
        Expr::binary(num(1.0), plus(), num(2.0))
    );
}

#[test]
fn missing_end_marker_is_supplied() {
    let tokens = vec![Token::synthetic(TokenType::True, "true")];
    assert_eq!(parse(tokens).unwrap(), Expr::literal(true));
    assert_eq!(
        parse(Vec::new()).unwrap_err().message,
        "Expect expression."
    );
}

#[test]
fn number_without_literal_falls_back_to_lexeme() {
    let tokens = vec![Token::synthetic(TokenType::Number, "7.25")];
    assert_eq!(parse(tokens).unwrap(), num(7.25));

    let tokens = vec![Token::synthetic(TokenType::Number, "seven")];
    let error = parse(tokens).unwrap_err();
    assert_eq!(error.message, "Invalid number literal.");
    assert_eq!(error.token.unwrap().lexeme, "seven");
}

#[test]
fn missing_close_paren_reports_end_of_input() {
    let error = parse_source("(1 + 2").unwrap_err();
    assert_eq!(error.kind, ErrorKind::ParseError);
    assert_eq!(error.message, "Expect ')' after expression.");
    assert_eq!(error.token.as_ref().unwrap().token_type, TokenType::Eof);
    assert_eq!(
        error.to_string(),
        "[Pos 1:7] Error at end: Expect ')' after expression."
    );
    assert!(error.help.is_some());
}

#[test]
fn missing_operand_reports_offending_token() {
    let error = parse_source("(1 + )").unwrap_err();
    assert_eq!(error.message, "Expect expression.");
    assert_eq!(error.token.as_ref().unwrap().lexeme, ")");
    assert_eq!((error.line, error.column), (1, 6));
    assert_eq!(error.to_string(), "[Pos 1:6] Error at ')': Expect expression.");
}

#[test]
fn missing_ternary_colon() {
    let error = parse_source("true ? 1").unwrap_err();
    assert_eq!(
        error.message,
        "Expect ':' after true branch of ternary expression."
    );
}

#[test]
fn error_position_tracks_lines() {
    let error = parse_source("1 +\n  * 2").unwrap_err();
    assert_eq!(error.message, "Expect expression.");
    assert_eq!((error.line, error.column), (2, 3));
}

#[test]
fn empty_input_fails() {
    assert_eq!(parse_source("").unwrap_err().message, "Expect expression.");
}

#[test]
fn parses_independently() {
    let mut first = Parser::new(scan("1 + 2").unwrap());
    let mut second = Parser::new(scan("3 * 4").unwrap());
    let b = second.parse().unwrap();
    let a = first.parse().unwrap();
    assert_eq!(a, Expr::binary(num(1.0), plus(), num(2.0)));
    assert_eq!(b, Expr::binary(num(3.0), star(), num(4.0)));
}

#[test]
fn program_of_expression_statements() {
    let statements = Parser::new(scan("1 + 2; 3 * 4;; \"x\"").unwrap())
        .parse_program()
        .unwrap();
    assert_eq!(
        statements,
        vec![
            Stmt::Expression {
                expr: Expr::binary(num(1.0), plus(), num(2.0))
            },
            Stmt::Expression {
                expr: Expr::binary(num(3.0), star(), num(4.0))
            },
            Stmt::Expression {
                expr: Expr::literal("x")
            },
        ]
    );
}

#[test]
fn program_collects_every_error() {
    let errors = Parser::new(scan("1 +; 2; (3").unwrap())
        .parse_program()
        .unwrap_err();
    let messages: Vec<&str> = errors.errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Expect expression.", "Expect ')' after expression."]
    );
    assert_eq!(errors.first().unwrap().token.as_ref().unwrap().lexeme, ";");
}

#[test]
fn program_requires_separators() {
    let errors = Parser::new(scan("1 2; 3").unwrap())
        .parse_program()
        .unwrap_err();
    assert_eq!(errors.errors.len(), 1);
    assert_eq!(errors.errors[0].message, "Expect ';' after expression.");
}

#[test]
fn synchronize_stops_after_semicolon() {
    let mut parser = Parser::new(scan("a ; b").unwrap());
    parser.synchronize();
    assert_eq!(parser.position(), 2);
}

#[test]
fn synchronize_stops_before_statement_keyword() {
    let mut parser = Parser::new(scan("1 + 2 print 3").unwrap());
    parser.synchronize();
    assert_eq!(parser.position(), 3);

    for keyword in ["class", "fun", "var", "for", "if", "while", "return"] {
        let mut parser = Parser::new(scan(&format!("1 2 {} 3", keyword)).unwrap());
        parser.synchronize();
        assert_eq!(parser.position(), 2, "keyword {}", keyword);
    }
}

#[test]
fn synchronize_stops_at_end_of_input() {
    let mut parser = Parser::new(scan("1 + 2").unwrap());
    parser.synchronize();
    assert_eq!(parser.position(), 3);
}
