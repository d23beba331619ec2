use astgen_core::emit::emit_accessor;
use astgen_core::frontend::parse_schema;
use astgen_core::header::{provenance_header, strip_provenance};
use astgen_core::schema::{IDENTIFIER_FIELD, NO_IDENTIFIER};
use astgen_core::{generate, generate_report, Declaration, Field, FlagSet, GenError, Record, Variant};

const TS: &str = "2024-01-01 00:00:00";

fn run(src: &str) -> Result<String, GenError> {
    let decls = parse_schema(src).expect("schema parses");
    generate(&decls, TS)
}

fn accessor_records(doc: &str) -> Vec<String> {
    doc.lines()
        .filter_map(|l| l.strip_prefix("impl GetNodeId for "))
        .map(|l| l.trim_end_matches(" {").to_string())
        .collect()
}

#[test]
fn field_named_id_is_used_without_markers() {
    let doc = run("struct Point { x: i32, y: i32, id: NodeId }").expect("generate");
    assert_eq!(
        doc,
        format!("{}\n{}", provenance_header(TS), emit_accessor("Point", "id"))
    );
}

#[test]
fn no_node_id_struct_gets_nothing() {
    let doc = run("#[no_node_id] struct Expr { id: NodeId }").expect("generate");
    assert_eq!(doc, provenance_header(TS));
}

#[test]
fn no_node_id_wins_over_ambiguous_markers() {
    let doc = run("#[no_node_id] struct Expr { #[node_id] a: NodeId, #[node_id] b: NodeId }")
        .expect("generate");
    assert!(accessor_records(&doc).is_empty());
}

#[test]
fn marked_field_wins_over_id() {
    let doc = run("struct Stmt { #[node_id] uid: NodeId, id: NodeId }").expect("generate");
    assert!(doc.contains(&emit_accessor("Stmt", "uid")), "{doc}");
    assert!(!doc.contains("self.id"), "{doc}");
}

#[test]
fn two_marked_fields_fail_the_run() {
    let err = run("struct Ok { id: NodeId }\nstruct Bad { #[node_id] a: NodeId, #[node_id] b: NodeId }")
        .expect_err("ambiguous schema");
    assert_eq!(
        err,
        GenError::AmbiguousIdentifier {
            decl: "Bad".to_string(),
            count: 2,
        }
    );
    let rendered = err.diagnostic().to_string();
    assert!(rendered.contains("Bad"), "{rendered}");
    assert!(rendered.contains("2 fields"), "{rendered}");
}

#[test]
fn variants_and_flag_sets_never_get_accessors() {
    let src = r#"
        #[node_id]
        enum Op { Add { id: NodeId }, Sub }
        bitflags! {
            struct Flags: u32 {
                const A = 1;
            }
        }
    "#;
    assert_eq!(run(src).expect("generate"), provenance_header(TS));

    let by_hand = vec![
        Declaration::from(Variant {
            name: "Op".to_string(),
            attrs: [IDENTIFIER_FIELD].into(),
            variants: vec!["id".to_string()],
        }),
        Declaration::from(FlagSet {
            name: "Flags".to_string(),
            attrs: [IDENTIFIER_FIELD].into(),
            flags: vec!["id".to_string()],
        }),
    ];
    let report = generate_report(&by_hand, TS).expect("generate");
    assert_eq!(report.records, 0);
    assert!(report.accessors.is_empty());
}

#[test]
fn output_is_deterministic_apart_from_timestamp() {
    let decls = parse_schema(
        "struct A { id: NodeId }\nenum B { X }\nstruct C { #[node_id] node: NodeId }",
    )
    .expect("schema parses");
    let first = generate(&decls, "first run").expect("generate");
    let second = generate(&decls, "second run").expect("generate");
    let again = generate(&decls, "first run").expect("generate");

    assert_eq!(first, again);
    assert_ne!(first, second);
    assert_eq!(strip_provenance(&first), strip_provenance(&second));
}

#[test]
fn blocks_follow_declaration_order() {
    let names = ["Zeta", "Alpha", "Mid", "Beta"];
    let decls: Vec<Declaration> = names
        .iter()
        .map(|n| Record::new(*n).with_field(Field::new("id")).into())
        .collect();
    let doc = generate(&decls, TS).expect("generate");
    assert_eq!(accessor_records(&doc), names);
}

#[test]
fn mixed_schema_end_to_end() {
    let src = r#"
        pub struct Crate { pub items: Vec<Item>, #[node_id] pub crate_id: NodeId }
        pub struct Item { pub id: NodeId, pub name: Ident }
        pub enum ItemKind { Fn, Struct }
        #[no_node_id]
        pub struct Ident { pub id: NodeId, pub name: String }
        pub struct Span { pub lo: u32, pub hi: u32 }
        pub struct Path(#[node_id] NodeId, Vec<Ident>);
    "#;
    let decls = parse_schema(src).expect("schema parses");
    let report = generate_report(&decls, TS).expect("generate");
    assert_eq!(report.declarations, 6);
    assert_eq!(report.records, 5);

    let pairs: Vec<(&str, &str)> = report
        .accessors
        .iter()
        .map(|a| (a.record.as_str(), a.field.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("Crate", "crate_id"), ("Item", "id"), ("Path", "0")]
    );
    assert!(report.document.contains("        self.0\n"));
}

#[test]
fn hand_built_records_honor_markers() {
    let decls = vec![
        Declaration::from(
            Record::new("Expr")
                .with_attr(NO_IDENTIFIER)
                .with_field(Field::new("id")),
        ),
        Declaration::from(Record::new("Empty")),
    ];
    assert_eq!(generate(&decls, TS).expect("generate"), provenance_header(TS));
}

#[test]
fn raw_id_field_falls_back_and_keeps_raw_projection() {
    let doc = run("struct S { kind: u8, r#id: NodeId }\nstruct K { r#type: NodeId }").expect("generate");
    assert_eq!(accessor_records(&doc), ["S"]);
    assert!(doc.contains("        self.r#id\n"), "{doc}");
    syn::parse_file(&doc).expect("generated document parses");
}
