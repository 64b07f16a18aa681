use crate::preprocess::preprocess;
use crate::report::CollectingReporter;
use crate::Error;

fn preprocess_clean(source: &str) -> (String, crate::MacroTable) {
    let mut reporter = CollectingReporter::new();
    match preprocess(source, "test.as", &mut reporter) {
        Ok(result) => result,
        Err(error) => panic!(
            "preprocessing failed: {}\ndiagnostics: {:#?}",
            error, reporter.diagnostics
        ),
    }
}

fn preprocess_failing(source: &str) -> (u32, CollectingReporter) {
    let mut reporter = CollectingReporter::new();
    match preprocess(source, "test.as", &mut reporter) {
        Ok(_) => panic!("expected errors in:\n{}", source),
        Err(Error::SyntaxErrors { count }) => (count, reporter),
    }
}

#[test]
fn strips_comments_and_blank_lines() {
    let (output, macros) = preprocess_clean("; a comment\n\n   \nstop\n");

    assert_eq!(output, "stop\n");
    assert!(macros.is_empty());
}

#[test]
fn trims_surrounding_whitespace() {
    let (output, _) = preprocess_clean("   mov  r1 , r2  \n");
    assert_eq!(output, "mov  r1 , r2\n");
}

#[test]
fn expands_macro_usages() {
    let source = "macr mmm\ninc r1\nmov r1, r2\nendmacr\nmmm\nstop\n";
    let (output, macros) = preprocess_clean(source);

    assert_eq!(output, "inc r1\nmov r1, r2\nstop\n");
    assert_eq!(macros.len(), 1);
    assert_eq!(macros.find("mmm"), Some("inc r1\nmov r1, r2\n"));
}

#[test]
fn macro_definitions_are_not_emitted() {
    let (output, _) = preprocess_clean("macr unused\nstop\nendmacr\nrts\n");
    assert_eq!(output, "rts\n");
}

#[test]
fn comments_inside_macro_bodies_are_dropped() {
    let (output, _) = preprocess_clean("macr mmm\n; note\ninc r1\nendmacr\nmmm\n");
    assert_eq!(output, "inc r1\n");
}

#[test]
fn macro_redefinition_is_rejected() {
    let source = "macr mmm\nstop\nendmacr\nmacr mmm\nrts\nendmacr\n";
    let (count, reporter) = preprocess_failing(source);

    assert_eq!(count, 1);
    assert!(reporter.diagnostics[0].message.contains("already defined"));
}

#[test]
fn reserved_macro_name_is_rejected() {
    let (count, reporter) = preprocess_failing("macr mov\nstop\nendmacr\n");

    assert_eq!(count, 1);
    assert!(reporter.diagnostics[0].message.contains("reserved"));
}

#[test]
fn extraneous_characters_after_macro_guards() {
    assert_eq!(preprocess_failing("macr mmm junk\nstop\nendmacr\n").0, 1);
    assert_eq!(preprocess_failing("macr mmm\nstop\nendmacr junk\n").0, 1);
}

#[test]
fn unterminated_macro_is_rejected() {
    let (count, reporter) = preprocess_failing("macr mmm\nstop\n");

    assert_eq!(count, 1);
    assert!(reporter.diagnostics[0].message.contains("endmacr"));
}

#[test]
fn macro_name_collision_with_symbol_is_caught_later() {
    // The preprocessor accepts the macro; defining a like-named label is
    // the assembler's error.
    let (output, macros) = preprocess_clean("macr mmm\nstop\nendmacr\nmmm\n");
    assert_eq!(output, "stop\n");

    let mut reporter = CollectingReporter::new();
    let result = crate::assemble("mmm: stop", "test.am", &macros, &mut reporter);
    assert!(result.is_err());
    assert!(reporter.diagnostics[0].message.contains("macro"));
}
