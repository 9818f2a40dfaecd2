//! Facade tests: lookup outcomes, caching and concurrent use

use std::sync::Arc;
use std::thread;

use super::*;

fn book_grammar() -> DtdGrammar {
    let grammar = DtdGrammar::new();
    grammar.declare("book", "(title,(author|editor)+,chapter*)");
    grammar.declare("title", "(#PCDATA)");
    grammar.declare("author", "(#PCDATA)");
    grammar.declare("editor", "(#PCDATA)");
    grammar.declare("chapter", "(heading,(para|note)*)");
    grammar.declare("para", "(#PCDATA|em|strong)*");
    grammar.declare("br", "EMPTY");
    grammar.declare("appendix", "ANY");
    grammar.declare("broken", "(a,b");
    grammar
}

fn names(candidates: &Candidates) -> Vec<&str> {
    candidates.iter().collect()
}

#[test]
fn test_candidates_after_siblings() {
    let grammar = book_grammar();

    let first = grammar.what_can_follow("book", Vec::<String>::new()).unwrap();
    assert_eq!(names(&first), vec!["title"]);

    let next = grammar.what_can_follow("book", ["title"]).unwrap();
    assert_eq!(names(&next), vec!["author", "editor"]);

    let body = grammar.what_can_follow("chapter", ["heading"]).unwrap();
    assert_eq!(names(&body), vec!["para", "note"]);
}

#[test]
fn test_optional_tail_completes_content() {
    let grammar = book_grammar();
    let answer = grammar
        .what_can_follow("chapter", ["heading", "para", "note"])
        .unwrap();
    assert!(answer.is_empty());
}

#[test]
fn test_complete_content_yields_empty_candidates() {
    let grammar = DtdGrammar::new();
    grammar.declare("pair", "(left,right)");
    let answer = grammar.what_can_follow("pair", ["left", "right"]).unwrap();
    assert!(answer.is_empty());
}

#[test]
fn test_violation_yields_no_hint() {
    let grammar = book_grammar();
    assert_eq!(grammar.hint("book", ["chapter"]), Hint::Invalid);
    assert!(grammar.what_can_follow("book", ["chapter"]).is_none());
}

#[test]
fn test_no_model_is_distinct_from_unparseable() {
    let grammar = book_grammar();

    assert_eq!(
        grammar.hint("br", ["x"]),
        Hint::NoModel {
            spec: Some(ContentSpec::Empty)
        }
    );
    assert_eq!(
        grammar.hint("appendix", Vec::<String>::new()),
        Hint::NoModel {
            spec: Some(ContentSpec::Any)
        }
    );
    assert_eq!(
        grammar.hint("title", Vec::<String>::new()),
        Hint::NoModel {
            spec: Some(ContentSpec::Text)
        }
    );
    assert_eq!(grammar.hint("undeclared", ["x"]), Hint::NoModel { spec: None });

    match grammar.hint("broken", Vec::<String>::new()) {
        Hint::Unparseable { reason } => assert_eq!(reason, "missing ')'"),
        other => panic!("unexpected hint {other:?}"),
    }
    assert!(grammar.what_can_follow("broken", ["a"]).is_none());
}

#[test]
fn test_mixed_content_model() {
    let grammar = book_grammar();
    let answer = grammar
        .what_can_follow("para", Vec::<String>::new())
        .unwrap();
    assert_eq!(answer.unique_sorted(), vec!["em", "strong"]);

    let answer = grammar.what_can_follow("para", ["em", "p"]).unwrap();
    assert_eq!(answer.unique_sorted(), vec!["em", "strong"]);
}

#[test]
fn test_malformed_model_parsed_once() {
    let grammar = book_grammar();
    for _ in 0..5 {
        assert!(matches!(
            grammar.hint("broken", ["a"]),
            Hint::Unparseable { .. }
        ));
    }
    assert_eq!(grammar.cache().parse_count(), 1);
}

#[test]
fn test_reused_model_is_reset_between_queries() {
    let grammar = book_grammar();
    let siblings = ["title", "author", "chapter"];

    let before = grammar.hint("book", siblings);
    let _ = grammar.hint("book", ["title"]);
    let _ = grammar.hint("book", ["nonsense"]);
    assert_eq!(grammar.hint("book", siblings), before);
    assert_eq!(grammar.cache().parse_count(), 1);
}

#[test]
fn test_declared_elements() {
    let grammar = book_grammar();
    let declared = grammar.declared_elements();
    assert!(declared.contains("book"));
    assert!(declared.contains("broken"));
    assert_eq!(declared.iter().next().map(String::as_str), Some("appendix"));
    assert_eq!(
        grammar.declaration("para"),
        Some(ContentSpec::Mixed("(#PCDATA|em|strong)*".to_string()))
    );
}

#[test]
fn test_grammars_do_not_share_state() {
    let first = DtdGrammar::new();
    let second = DtdGrammar::new();
    first.declare("list", "(item+)");
    second.declare("list", "(entry*)");

    assert_eq!(
        names(&first.what_can_follow("list", Vec::<String>::new()).unwrap()),
        vec!["item"]
    );
    assert_eq!(
        names(&second.what_can_follow("list", Vec::<String>::new()).unwrap()),
        vec!["entry"]
    );
}

#[test]
fn test_shared_cache_sees_new_declarations() {
    let cache = Arc::new(ModelCache::new());
    let grammar = DtdGrammar::with_cache(Arc::clone(&cache));
    assert_eq!(grammar.hint("list", ["item"]), Hint::NoModel { spec: None });

    cache.declare("list", ContentSpec::classify("(item+)"));
    let answer = grammar.what_can_follow("list", ["item"]).unwrap();
    assert_eq!(names(&answer), vec!["item"]);
}

#[test]
fn test_concurrent_queries_parse_once() {
    let grammar = book_grammar();
    let queries: [&[&str]; 4] = [
        &[],
        &["title"],
        &["title", "editor"],
        &["chapter"],
    ];

    let expected: Vec<Hint> = {
        let reference = book_grammar();
        queries
            .iter()
            .map(|siblings| reference.hint("book", siblings.iter().copied()))
            .collect()
    };

    thread::scope(|scope| {
        for worker in 0..8 {
            let grammar = &grammar;
            let queries = &queries;
            let expected = &expected;
            scope.spawn(move || {
                for round in 0..50 {
                    let i = (worker + round) % queries.len();
                    let hint = grammar.hint("book", queries[i].iter().copied());
                    assert_eq!(hint, expected[i]);
                }
            });
        }
    });

    assert_eq!(grammar.cache().parse_count(), 1);
}

#[test]
fn test_declarations_while_querying() {
    let cache = Arc::new(ModelCache::new());
    let grammar = DtdGrammar::with_cache(Arc::clone(&cache));

    thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..100 {
                cache.declare(format!("e{i}"), ContentSpec::classify("(a,b?)"));
            }
        });
        scope.spawn(|| {
            for i in 0..100 {
                match grammar.hint(&format!("e{i}"), ["a"]) {
                    Hint::NoModel { spec: None } => {}
                    Hint::Candidates { candidates } => {
                        assert_eq!(candidates.into_vec(), vec!["b".to_string()]);
                    }
                    other => panic!("unexpected hint {other:?}"),
                }
            }
        });
    });

    assert_eq!(grammar.declared_elements().len(), 100);
}

#[test]
fn test_candidate_helpers() {
    let candidates: Candidates = ["strong", "em", "strong", "emph"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(candidates.len(), 4);
    assert_eq!(candidates.with_prefix("em").collect::<Vec<_>>(), vec!["em", "emph"]);
    assert_eq!(candidates.unique_sorted(), vec!["em", "emph", "strong"]);
}

#[test]
fn test_hint_serialization() {
    let hint = Hint::Candidates {
        candidates: Candidates::new(vec!["a".to_string()]),
    };
    assert_eq!(
        serde_json::to_string(&hint).unwrap(),
        r#"{"status":"candidates","candidates":["a"]}"#
    );
    assert_eq!(
        serde_json::to_string(&Hint::Invalid).unwrap(),
        r#"{"status":"invalid"}"#
    );
    assert_eq!(
        serde_json::to_string(&Hint::NoModel {
            spec: Some(ContentSpec::Empty)
        })
        .unwrap(),
        r#"{"status":"no_model","spec":{"kind":"empty"}}"#
    );
}
