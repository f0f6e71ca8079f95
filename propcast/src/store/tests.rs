//! Unit tests for merging, expansion and lookup.

use camino::Utf8Path;
use rstest::{fixture, rstest};

use super::{PropsSource, PropsStore, StoreOptions};
use crate::argv::ArgvGrammar;
use crate::convert::{ParserRegistry, PropType, TypeConverter};
use crate::expand::{ProcessProperties, VarResolution};
use crate::PropsError;

#[fixture]
fn process() -> ProcessProperties {
    let mut process = ProcessProperties::empty();
    process.insert("user.home", "/home/fred");
    process
}

fn store_with(options: StoreOptions, process: ProcessProperties) -> PropsStore {
    PropsStore::with_process(options, process)
}

#[rstest]
fn later_sources_win_but_keep_position(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs([("a", "1"), ("b", "2")], &PropsSource::InitialMap);
    store
        .merge_text("a=3\nc=4\n", &PropsSource::Text)
        .expect("valid text");

    assert_eq!(store.get("a"), Some("3"));
    let keys: Vec<&str> = store.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert_eq!(
        store.provenance("a"),
        Some([PropsSource::InitialMap, PropsSource::Text].as_slice())
    );
    assert_eq!(store.provenance("b"), Some([PropsSource::InitialMap].as_slice()));
    assert!(store.provenance("missing").is_none());
}

#[rstest]
fn references_see_only_earlier_keys(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store
        .merge_text(
            "early=${late}\nlate=here\nafter=${late}\nescaped=\\\\${late}\n",
            &PropsSource::Text,
        )
        .expect("valid text");

    assert_eq!(store.get("early"), Some("${late}"));
    assert_eq!(store.get("after"), Some("here"));
    assert_eq!(store.get("escaped"), Some("${late}"));
}

#[rstest]
fn later_values_refer_to_earlier_sources(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs([("root", "/srv")], &PropsSource::bundled("defaults"));
    store
        .merge_text("logs=${root}/logs\n", &PropsSource::file(Utf8Path::new("app.properties")))
        .expect("valid text");
    assert_eq!(store.get("logs"), Some("/srv/logs"));
}

#[rstest]
#[case(VarResolution::StoreAndProcess, "/home/fred/.app")]
#[case(VarResolution::StoreOnly, "${user.home}/.app")]
fn process_properties_follow_resolution(
    process: ProcessProperties,
    #[case] resolution: VarResolution,
    #[case] expected: &str,
) {
    let mut store = store_with(StoreOptions::default().with_resolution(resolution), process);
    store.merge_pairs([("dir", "${user.home}/.app")], &PropsSource::InitialMap);
    assert_eq!(store.get("dir"), Some(expected));
}

#[rstest]
fn store_values_shadow_process_properties(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs(
        [("user.home", "/elsewhere"), ("dir", "${user.home}")],
        &PropsSource::InitialMap,
    );
    assert_eq!(store.get("dir"), Some("/elsewhere"));
}

#[rstest]
fn malformed_text_merges_nothing(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    let err = store
        .merge_text("ok=1\nbad=\\u12\n", &PropsSource::Text)
        .expect_err("bad escape");
    assert!(matches!(err, PropsError::PropertiesSyntax { line: 2, .. }), "{err:?}");
    assert!(store.is_empty());
}

#[rstest]
fn arguments_are_joined_and_not_expanded(process: ProcessProperties) {
    let grammar = ArgvGrammar::parse("flag? name* list* empty*").expect("grammar");
    let args = grammar
        .tokenize(&[
            "-flag",
            "--name=${user.home}",
            "--list=a",
            "--list=b,c",
            "--empty=",
            "rest",
        ])
        .expect("argv");

    let mut store = store_with(StoreOptions::default(), process);
    assert_eq!(store.merge_args(&args), 5);
    assert_eq!(store.get("flag"), Some("true"));
    assert_eq!(store.get("name"), Some("${user.home}"));
    assert_eq!(store.get("list"), Some("a,\"b,c\""));
    assert_eq!(store.get("empty"), Some(""));
    assert_eq!(store.get("_args"), Some("rest"));
    assert_eq!(store.provenance("list"), Some([PropsSource::Argv].as_slice()));
}

#[rstest]
fn report_groups_keys_by_source(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs([("a", "1"), ("b", "2")], &PropsSource::InitialMap);
    store.merge_text("a=3\n", &PropsSource::Text).expect("valid text");

    assert_eq!(
        store.to_string(),
        "PropsStore[\n  locations\n    initmap [a, b]\n    string [a]\n  values\n    {a=3, b=2}\n]"
    );
    assert!(store.freeze().to_string().starts_with("FrozenProps[\n"));
}

#[rstest]
#[case("dbUserName")]
#[case("db_user_name")]
#[case("DB_USER_NAME")]
#[case("db.user.name")]
fn lookup_tries_every_candidate(process: ProcessProperties, #[case] identifier: &str) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs([("db.user.name", "fred")], &PropsSource::InitialMap);
    let props = store.freeze();
    assert_eq!(props.lookup(identifier).expect("legal"), Some("fred"));
}

#[rstest]
fn lookup_prefers_the_unsplit_key(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs(
        [("db.user", "split"), ("dbUser", "whole")],
        &PropsSource::InitialMap,
    );
    assert_eq!(store.freeze().lookup("dbUser").expect("legal"), Some("whole"));
}

#[rstest]
fn lookup_applies_the_prefix(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default().with_prefix("app"), process);
    store.merge_pairs(
        [("app.port", "8080"), ("port", "1")],
        &PropsSource::InitialMap,
    );
    let props = store.freeze();
    assert_eq!(props.lookup("port").expect("legal"), Some("8080"));
    assert_eq!(props.lookup("app.port").expect("legal"), None);
}

#[rstest]
fn exact_case_lookup(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default().with_ignore_case(false), process);
    store.merge_pairs([("Host.Name", "h")], &PropsSource::InitialMap);
    let props = store.freeze();
    assert_eq!(props.lookup("host.name").expect("legal"), None);
    assert_eq!(props.lookup("Host.Name").expect("legal"), Some("h"));
}

#[rstest]
fn case_folding_covers_non_ascii_keys(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs([("Ärger.Öl", "x"), ("Host.Name", "h")], &PropsSource::InitialMap);
    let props = store.freeze();
    assert_eq!(props.lookup("ärger.öl").expect("legal"), Some("x"));
    assert_eq!(props.lookup("ÄRGER.ÖL").expect("legal"), Some("x"));
    assert_eq!(props.lookup("host.name").expect("legal"), Some("h"));
}

#[rstest]
fn illegal_identifiers_fail_lookup(process: ProcessProperties) {
    let props = store_with(StoreOptions::default(), process).freeze();
    let err = props.lookup("bad-name").expect_err("hyphen is illegal");
    assert!(matches!(err, PropsError::IllegalIdentifierChar { ch: '-', .. }), "{err:?}");
}

#[rstest]
fn typed_lookups_convert_values(process: ProcessProperties) {
    let registry = ParserRegistry::new();
    let converter = TypeConverter::new(&registry);
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs(
        [("num.lines", "10"), ("names", "a,b"), ("bad", "x")],
        &PropsSource::InitialMap,
    );
    let props = store.freeze();

    assert_eq!(props.get::<u32>("numLines", &converter).expect("u32"), Some(10));
    assert_eq!(
        props.get::<Vec<String>>("names", &converter).expect("list"),
        Some(vec!["a".to_owned(), "b".to_owned()])
    );
    assert_eq!(props.get::<u32>("missing", &converter).expect("absent"), None);
    assert!(props.get::<u32>("bad", &converter).is_err());

    let array = <Box<[u8]>>::descriptor();
    let value = props
        .get_as("names", &<Box<[String]>>::descriptor(), &converter)
        .expect("array")
        .expect("present");
    assert_eq!(
        &**value.downcast::<Box<[String]>>().expect("boxed slice"),
        ["a", "b"]
    );
    assert!(props.get_as("names", &array, &converter).is_err());
    assert!(
        props
            .get_as("names", &<Vec<String>>::descriptor(), &converter)
            .is_err()
    );
}

#[rstest]
fn thawed_props_can_be_extended(process: ProcessProperties) {
    let mut store = store_with(StoreOptions::default(), process);
    store.merge_pairs([("a", "1")], &PropsSource::InitialMap);
    let mut thawed = store.freeze().thaw();
    thawed.merge_pairs([("b", "${a}2")], &PropsSource::Named("late".into()));
    let props = thawed.freeze();
    assert_eq!(props.lookup("b").expect("legal"), Some("12"));
    assert_eq!(props.len(), 2);
    assert_eq!(props.provenance("b"), Some([PropsSource::Named("late".into())].as_slice()));
}

#[test]
fn sources_render_as_labels() {
    assert_eq!(PropsSource::InitialMap.to_string(), "initmap");
    assert_eq!(PropsSource::bundled("app.properties").to_string(), "bundled:app.properties");
    assert_eq!(
        PropsSource::file(Utf8Path::new("/etc/app.properties")).to_string(),
        "file:/etc/app.properties"
    );
    assert_eq!(PropsSource::Text.to_string(), "string");
    assert_eq!(PropsSource::Argv.to_string(), "argv");
    assert_eq!(PropsSource::Named("custom".into()).to_string(), "custom");
}
