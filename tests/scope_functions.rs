//! Scope, declaration, and call-resolution rules
//!
//! Covers function keys (name plus sorted particle signature), conjugated
//! spellings, collision detection, shadowing across scopes, and call-site
//! particle diagnostics.

use kotoba::kotoba::errors::ErrorKind;
use kotoba::kotoba::testing::{kinds, tokenize, tokenize_err};
use kotoba::TokenKind as K;

#[test]
fn same_scope_conjugation_collision_is_fatal() {
    // 帰る (ambiguous る) and 帰つ both conjugate to 帰って/帰った under
    // the same signature
    let error = tokenize_err("ほげを 帰るとは\n　・・・\nほげを 帰つとは\n　・・・\n");
    assert_eq!(
        error.kind,
        ErrorKind::AmbiguousConjugation("帰る".to_string(), "帰つ".to_string())
    );
    assert_eq!(error.line, 3);
}

#[test]
fn sibling_scope_conjugations_do_not_collide() {
    let source = "\
もし 1が 1と 等しければ
　ほげを 帰るとは
　　・・・
それ以外
　ほげを 帰つとは
　　・・・
";
    // both declarations live in sibling frames and never meet
    tokenize(source);
}

#[test]
fn different_signatures_share_a_name() {
    let source = "\
ほげを 乗せるとは
　・・・
ほげを ふがに 乗せるとは
　・・・
";
    let tokens = tokenize(source);
    let defs = tokens.iter().filter(|t| t.kind == K::FunctionDef).count();
    assert_eq!(defs, 2);
}

#[test]
fn redeclaring_a_signature_is_fatal() {
    let error = tokenize_err("ほげを 乗せるとは\n　・・・\nふがを 乗せるとは\n　・・・\n");
    assert_eq!(
        error.kind,
        ErrorKind::FunctionAlreadyDeclared("乗せる".to_string())
    );
}

#[test]
fn inner_scope_shadows_outer_function() {
    let source = "\
ほげを 帰るとは
　・・・
もし 1が 1と 等しければ
　ほげを 帰つとは
　　・・・
　5を 帰って
";
    // 帰って resolves to the inner 帰つ; the collision rule only applies
    // within one frame
    tokenize(source);
}

#[test]
fn call_to_unknown_function_is_unmatched_input() {
    let error = tokenize_err("3を 飛ばす\n");
    assert_eq!(error.kind, ErrorKind::UnexpectedInput("飛ばす".to_string()));
}

#[test]
fn call_missing_a_particle() {
    let error = tokenize_err("ほげに ふがを 渡すとは\n　・・・\n5を 渡す\n");
    assert_eq!(
        error.kind,
        ErrorKind::MissingParticle("渡す".to_string(), "に".to_string())
    );
}

#[test]
fn call_with_a_wrong_particle() {
    let error = tokenize_err("ほげを 渡すとは\n　・・・\n5を 3に 渡す\n");
    assert_eq!(
        error.kind,
        ErrorKind::WrongParticle("渡す".to_string(), "に".to_string())
    );
}

#[test]
fn call_with_undeclared_argument() {
    let error = tokenize_err("ぴよを 言う\n");
    assert_eq!(error.kind, ErrorKind::UndeclaredVariable("ぴよ".to_string()));
}

#[test]
fn function_name_must_be_verb_shaped() {
    let error = tokenize_err("ほげを ひまわりとは\n　・・・\n");
    assert_eq!(
        error.kind,
        ErrorKind::FunctionDefNonVerbName("ひまわり".to_string())
    );
}

#[test]
fn function_name_must_not_be_reserved() {
    let error = tokenize_err("ほげを 繰り返すとは\n　・・・\n");
    assert_eq!(
        error.kind,
        ErrorKind::FunctionDefReservedName("繰り返す".to_string())
    );
}

#[test]
fn function_parameters_must_be_fresh_names() {
    let error = tokenize_err("10を 食べるとは\n　・・・\n");
    assert_eq!(
        error.kind,
        ErrorKind::FunctionDefLiteralParameter("10".to_string())
    );

    let error = tokenize_err("それを 食べるとは\n　・・・\n");
    assert_eq!(
        error.kind,
        ErrorKind::FunctionDefReservedParameter("それ".to_string())
    );

    let error = tokenize_err("ほげと ほげを 食べるとは\n　・・・\n");
    assert_eq!(
        error.kind,
        ErrorKind::FunctionDefDuplicateParameter("ほげ".to_string())
    );
}

#[test]
fn parameters_become_body_variables() {
    let source = "\
ほげと ふがを 集めるとは
　ぴよは ほげ
　ぴよを 返す
";
    let tokens = tokenize(source);
    assert_eq!(
        kinds(&tokens),
        vec![
            K::Parameter,
            K::Parameter,
            K::FunctionDef,
            K::ScopeBegin,
            K::Assignment,
            K::Variable,
            K::Eol,
            K::Parameter,
            K::Return,
            K::Eol,
            K::ScopeClose,
        ]
    );
}

#[test]
fn body_variables_do_not_leak() {
    let error = tokenize_err("ほげを 食べるとは\n　ぽちは 1\nぴよは ぽち\n");
    assert_eq!(error.kind, ErrorKind::UndeclaredVariable("ぽち".to_string()));
}

#[test]
fn built_ins_resolve_under_aliases_and_conjugations() {
    for call in ["「やあ」を 言う\n", "「やあ」を 言って\n", "「やあ」を いう\n"] {
        let tokens = tokenize(call);
        let call_token = tokens.iter().find(|t| t.kind == K::FunctionCall).unwrap();
        assert_eq!(call_token.text, "言う", "for {:?}", call);
    }
}

#[test]
fn built_in_with_two_particles() {
    let tokens = tokenize("ほげは 配列\nほげに 5を 追加する\n");
    let call_token = tokens.iter().find(|t| t.kind == K::FunctionCall).unwrap();
    assert_eq!(call_token.text, "追加する");
}
