// End-to-end compile tests: source text in, JavaScript text out.

use oddo::compile_default;
use oddo::errors::ErrorCategory;

fn compile(source: &str) -> String {
    compile_default(source).unwrap()
}

fn compile_err(source: &str) -> oddo::OddoError {
    compile_default(source).unwrap_err()
}

// ---
// Declaration vs assignment
// ---

#[test]
fn equals_always_declares_const() {
    assert_eq!(compile("x = 1\n"), "const x = 1;\n");
    assert_eq!(compile("pair = [1, 2]\n"), "const pair = [1, 2];\n");
}

#[test]
fn walrus_on_identifier_never_declares() {
    let out = compile("x := 1\n");
    assert_eq!(out, "x = 1;\n");
    assert!(!out.contains("const"));
}

#[test]
fn member_mutation_compiles_member_declaration_fails() {
    assert_eq!(compile("x.y := 1\n"), "x.y = 1;\n");

    let err = compile_err("x.y = 1\n");
    assert!(err.to_string().contains("must use := operator, not ="));

    let err = compile_err("arr[1...3] = v\n");
    assert!(err.to_string().contains("must use := operator, not ="));
}

#[test]
fn compound_assignment_operators_map_one_to_one() {
    assert_eq!(compile("x +:= 1\n"), "x += 1;\n");
    assert_eq!(compile("x **:= 2\n"), "x **= 2;\n");
    assert_eq!(compile("x ??:= 0\n"), "x ??= 0;\n");
    assert_eq!(compile("x >>>:= 1\n"), "x >>>= 1;\n");
}

// ---
// Associativity
// ---

#[test]
fn additive_left_exponent_right() {
    // (1+2)+3 and 2**(3**2): the printer re-emits without parens exactly
    // when the tree already has the default grouping.
    assert_eq!(compile("1+2+3\n"), "1 + 2 + 3;\n");
    assert_eq!(compile("2**3**2\n"), "2 ** 3 ** 2;\n");
    assert_eq!(compile("(1+2)+3\n"), "1 + 2 + 3;\n");
    assert_eq!(compile("1+(2+3)\n"), "1 + (2 + 3);\n");
    assert_eq!(compile("(2**3)**2\n"), "(2 ** 3) ** 2;\n");
}

#[test]
fn unary_minus_base_of_exponent_gets_parens() {
    // `-x ** 2` is a JavaScript SyntaxError; the base must be wrapped.
    assert_eq!(compile("y = -x ** 2\n"), "const y = (-x) ** 2;\n");
}

#[test]
fn double_negation_does_not_print_decrement() {
    // `--x` would be a prefix decrement, not two negations.
    assert_eq!(compile("y = -(-x)\n"), "const y = - -x;\n");
}

// ---
// Pipe and compose
// ---

#[test]
fn pipe_chain_lowers_inside_out() {
    assert_eq!(compile("a |> b |> c\n"), "c(b(a));\n");
}

#[test]
fn compose_chain_lowers_right_associated() {
    assert_eq!(compile("c <| b <| a\n"), "c(b(a));\n");
}

// ---
// Modifiers
// ---

#[test]
fn two_state_statements_one_import() {
    let out = compile("@state x = 3\n@state y = 5\n");
    assert_eq!(out.matches("import Oddo from \"oddo\";").count(), 1);
    assert_eq!(out.matches("Oddo.state(").count(), 2);
    // The import is the first statement.
    assert!(out.starts_with("import Oddo from \"oddo\";\n"));
}

#[test]
fn no_modifiers_no_import() {
    let out = compile("x = 1\ny := 2\n");
    assert!(!out.contains("import"));
}

#[test]
fn unknown_modifier_fails() {
    let err = compile_err("@foo x = 1\n");
    assert!(err.to_string().contains("Unknown modifier"));
    assert_eq!(err.category(), ErrorCategory::Compile);
}

#[test]
fn mutate_rejects_non_function() {
    let err = compile_err("@mutate f = x + 1\n");
    assert!(err.to_string().contains("must be a function"));
    assert_eq!(err.category(), ErrorCategory::Compile);
}

#[test]
fn computed_dependency_closure() {
    let out = compile("@computed total = price * qty\n");
    assert_eq!(
        out,
        "import Oddo from \"oddo\";\nconst total = Oddo.computed((price, qty) => price * qty, [price, qty]);\n"
    );
}

// ---
// JSX
// ---

#[test]
fn jsx_preserves_single_space_before_nested_element() {
    let out = compile("view = <div>Hello <b>World</b></div>\n");
    assert_eq!(
        out,
        "const view = <div>{\"Hello \"}<b>{\"World\"}</b></div>;\n"
    );
}

#[test]
fn jsx_indented_markup_drops_gap_whitespace() {
    let out = compile("view = <ul>\n  <li>one</li>\n  <li>two</li>\n</ul>\n");
    assert_eq!(
        out,
        "const view = <ul><li>{\"one\"}</li><li>{\"two\"}</li></ul>;\n"
    );
}

#[test]
fn jsx_attributes_keep_order_and_forms() {
    let out = compile("view = <input name=\"q\" value={text} {...rest} disabled />\n");
    assert_eq!(
        out,
        "const view = <input name=\"q\" value={text} {...rest} disabled />;\n"
    );
}

// ---
// Slices
// ---

#[test]
fn bare_ellipsis_copies_whole_array() {
    assert_eq!(compile("copy = numbers[...]\n"), "const copy = numbers.slice(0);\n");
}

#[test]
fn slice_write_splices_in_place() {
    assert_eq!(
        compile("a[1...3] := v\n"),
        "a.splice.apply(a, [1, 2].concat(v));\n"
    );
}

// ---
// Blocks and statements
// ---

#[test]
fn modifier_block_distributes_and_imports_once() {
    let out = compile("@state:\n  count = 0\n  name = \"ada\"\n");
    assert_eq!(
        out,
        "import Oddo from \"oddo\";\nconst count = Oddo.state(0);\nconst name = Oddo.state(\"ada\");\n"
    );
}

#[test]
fn templates_survive_with_raw_quasis() {
    assert_eq!(
        compile("msg = `hi ${name}!`\n"),
        "const msg = `hi ${name}!`;\n"
    );
}

#[test]
fn export_and_import_statements() {
    let out = compile("import { h } from \"preact\"\nexport view = h\nexport default view\n");
    assert_eq!(
        out,
        "import { h } from \"preact\";\nexport const view = h;\nexport default view;\n"
    );
}

// ---
// Error taxonomy
// ---

#[test]
fn each_phase_has_its_category() {
    assert_eq!(compile_err("x = №\n").category(), ErrorCategory::Lex);
    assert_eq!(compile_err("x = )\n").category(), ErrorCategory::Parse);
    assert_eq!(compile_err("@nope x = 1\n").category(), ErrorCategory::Compile);
}

#[test]
fn parse_errors_aggregate_without_partial_output() {
    let err = compile_err("x.y = 1\nz.w = 2\n");
    let text = err.to_string();
    assert!(text.contains("2 syntax errors"), "got: {text}");
}
