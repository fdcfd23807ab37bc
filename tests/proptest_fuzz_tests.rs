//! Property-based fuzzing tests for the Crisp scanner, lexer, parser and pipeline
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. The scanner hands back exactly the characters it was given
//! 2. No stage panics on arbitrary input
//! 3. The threaded pipeline builds the same tree as a sequential parse

use crisp::{
    CharScanner, Evaluator, Pipeline, SExprLexer, SExprParser, Scanner, Scope, TokenKind,
};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random strings that might break the lexer
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,500}").unwrap()
}

/// Generate valid-ish S-expressions
fn sexp_like_string() -> impl Strategy<Value = String> {
    prop::collection::vec(sexp_token(), 0..50).prop_map(|tokens| tokens.join(" "))
}

/// Generate tokens that look like S-expression elements
fn sexp_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("]".to_string()),
        Just("'".to_string()),
        // Builtins
        Just("def".to_string()),
        Just("lambda".to_string()),
        Just("quote".to_string()),
        Just("not".to_string()),
        Just("#t".to_string()),
        Just("#f".to_string()),
        // Numbers
        (0i64..100_000i64).prop_map(|n| n.to_string()),
        (0.0f64..100.0f64).prop_map(|f| format!("{:.2}", f)),
        // Strings
        r#""[a-zA-Z0-9 ]{0,20}""#.prop_map(|s| s),
        // Identifiers
        "[a-z][a-z0-9_]{0,10}".prop_map(|s| s),
        // Comments
        "#[^\n]{0,20}\n".prop_map(|s| s),
    ]
}

/// Generate small programs that define a name and read it back
fn def_program() -> impl Strategy<Value = (String, i64)> {
    ("[a-z][a-z0-9]{0,5}", 0i64..1000i64).prop_filter_map(
        "builtin names are reserved",
        |(name, value)| {
            if ["def", "lambda", "quote", "not"].contains(&name.as_str()) {
                None
            } else {
                Some((name, value))
            }
        },
    )
}

// =============================================================================
// SCANNER FUZZ TESTS
// =============================================================================

proptest! {
    /// The scanner yields every character once, in order
    #[test]
    fn scanner_reproduces_input(source in any::<String>()) {
        let mut scanner = CharScanner::from_source(&source);
        let mut seen = String::new();
        while let Some(c) = scanner.next_char() {
            seen.push(c);
        }
        prop_assert_eq!(seen, source);
        prop_assert!(scanner.is_empty());
    }

    /// Pushing a character back restores the previous position
    #[test]
    fn scanner_back_restores_position(source in "[a-z\n ]{1,40}", steps in 1usize..40) {
        let mut scanner = CharScanner::from_source(&source);
        for _ in 0..steps {
            let before = scanner.position();
            match scanner.next_char() {
                Some(c) => {
                    scanner.back(c);
                    prop_assert_eq!(scanner.position(), before);
                    prop_assert_eq!(scanner.next_char(), Some(c));
                }
                None => break,
            }
        }
    }
}

// =============================================================================
// LEXER / PARSER FUZZ TESTS
// =============================================================================

proptest! {
    /// The lexer should never panic on arbitrary input
    #[test]
    fn lexer_never_panics(source in arbitrary_source_string()) {
        let _ = SExprLexer::from_source(&source).count();
    }

    /// At most one error token is produced, and it is the last token
    #[test]
    fn lexer_error_ends_stream(source in arbitrary_source_string()) {
        let tokens: Vec<_> = SExprLexer::from_source(&source).collect();
        if let Some(index) = tokens.iter().position(|t| t.kind == TokenKind::Error) {
            prop_assert_eq!(index, tokens.len() - 1);
        }
    }

    /// Token positions never move backwards
    #[test]
    fn lexer_positions_monotonic(source in sexp_like_string()) {
        let tokens: Vec<_> = SExprLexer::from_source(&source).collect();
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].position <= pair[1].position);
        }
    }

    /// The parser handles S-expression-like streams without panic
    #[test]
    fn parser_never_panics(source in sexp_like_string()) {
        let output = SExprParser::parse_tokens(SExprLexer::from_source(&source));
        let _ = output.root.to_string();
    }

    /// Parser handles unbalanced parentheses without panic
    #[test]
    fn parser_handles_unbalanced_parens(
        opens in 0usize..50,
        closes in 0usize..50
    ) {
        let source = format!("{}1{}", "(".repeat(opens), ")".repeat(closes));
        let output = SExprParser::parse_tokens(SExprLexer::from_source(&source));
        // Missing closers end the stream with one lex error; each extra
        // closer is reported on its own
        let expected = if opens > closes { 1 } else { closes - opens };
        prop_assert_eq!(output.diagnostics.len(), expected);
    }

    /// Parser handles deeply nested expressions
    #[test]
    fn parser_handles_deep_nesting(depth in 1usize..5_000) {
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let output = SExprParser::parse_tokens(SExprLexer::from_source(&source));
        prop_assert_eq!(output.root.to_string(), source);
        prop_assert!(output.diagnostics.is_empty());
    }
}

// =============================================================================
// PIPELINE / EVALUATOR FUZZ TESTS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The threaded pipeline agrees with a sequential parse
    #[test]
    fn pipeline_matches_sequential(source in sexp_like_string(), capacity in 1usize..8) {
        let threaded = Pipeline::new(capacity).run_source(&source).unwrap();
        let sequential = SExprParser::parse_tokens(SExprLexer::from_source(&source));
        prop_assert_eq!(threaded.root, sequential.root);
        prop_assert_eq!(threaded.diagnostics, sequential.diagnostics);
    }

    /// Evaluation of arbitrary trees terminates without panic
    #[test]
    fn evaluator_never_panics(source in sexp_like_string()) {
        let output = SExprParser::parse_tokens(SExprLexer::from_source(&source));
        let evaluator = Evaluator::with_max_depth(24);
        let _ = evaluator.eval(&output.root, &Scope::global()).to_string();
    }

    /// A defined number reads back unchanged
    #[test]
    fn def_then_lookup((name, value) in def_program()) {
        let source = format!("(def {} {})\n{}", name, value, name);
        let output = SExprParser::parse_tokens(SExprLexer::from_source(&source));
        let result = Evaluator::new().eval(&output.root, &Scope::global());
        let results = result.children().unwrap();
        prop_assert_eq!(results[1].to_string(), value.to_string());
    }
}
