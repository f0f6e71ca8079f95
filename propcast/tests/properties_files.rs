//! Loading bundled and on-disk properties files.
//!
//! Covers the precedence between `-default` and primary resources, the
//! switches disabling either search, directory search with a prefix and
//! typed reads of primitive values.

use anyhow::{Result, ensure};
use propcast::{FrozenProps, PropsLoader, PropsLoaderBuilder, PropsSource, TypeConverter};
use rstest::rstest;
use test_helpers::PropsDir;

const TEST_DEFAULT: &str = include_str!("fixtures/test-default.properties");
const TEST: &str = include_str!("fixtures/test.properties");

fn bundled() -> PropsLoaderBuilder {
    PropsLoader::builder()
        .base_name("test")
        .bundle("test-default.properties", TEST_DEFAULT)
        .bundle("test.properties", TEST)
}

fn lookup<'p>(props: &'p FrozenProps, identifier: &str) -> Result<Option<&'p str>> {
    Ok(props.lookup(identifier)?)
}

#[rstest]
fn text_overrides_primary_which_overrides_default() -> Result<()> {
    let props = bundled().add_props("foo.3=string-3").build().load()?;
    ensure!(lookup(&props, "foo_1")? == Some("default-one"));
    ensure!(lookup(&props, "foo_2")? == Some("two"));
    ensure!(lookup(&props, "foo_3")? == Some("string-3"));
    Ok(())
}

#[rstest]
fn disabling_bundled_search_loads_nothing() -> Result<()> {
    let props = bundled().search_bundled(false).build().load()?;
    ensure!(lookup(&props, "foo_1")?.is_none());
    ensure!(lookup(&props, "foo_2")?.is_none());
    Ok(())
}

#[rstest]
fn disabling_default_search_skips_defaults() -> Result<()> {
    let props = bundled().search_default(false).build().load()?;
    ensure!(lookup(&props, "foo_1")?.is_none());
    ensure!(lookup(&props, "foo_2")? == Some("two"));
    Ok(())
}

#[rstest]
fn search_directories_with_prefix() -> Result<()> {
    let dir = PropsDir::new()?;
    let defaults = dir.write("searchDir-default.properties", "f.val1 = fred\nf.val2 = wilma\n")?;
    let primary = dir.write("searchDir.properties", "f.val2 = barney\nf.val3 = betty\n")?;

    let props = PropsLoader::builder()
        .base_name("searchDir")
        .prefix("f")
        .add_search_dir(dir.path())
        .build()
        .load()?;

    ensure!(lookup(&props, "val1")? == Some("fred"));
    ensure!(lookup(&props, "val2")? == Some("barney"));
    ensure!(lookup(&props, "val3")? == Some("betty"));
    let expected = [PropsSource::file(&defaults), PropsSource::file(&primary)];
    ensure!(
        props.provenance("f.val2") == Some(expected.as_slice()),
        "unexpected provenance {:?}",
        props.provenance("f.val2")
    );
    Ok(())
}

#[rstest]
fn primitives_read_from_bundled_resources() -> Result<()> {
    let props = bundled().build().load()?;
    let converter = TypeConverter::global();

    ensure!(props.get::<String>("stringVal", &converter)?.as_deref() == Some("to be or not to be"));
    ensure!(props.get::<String>("stringVal2", &converter)?.as_deref() == Some("that is the question"));
    ensure!(props.get::<i8>("byteVal", &converter)? == Some(8));
    ensure!(props.get::<i16>("shortVal", &converter)? == Some(42));
    ensure!(props.get::<i32>("intVal", &converter)? == Some(54_321));
    ensure!(props.get::<i64>("longVal", &converter)? == Some(67_890));
    ensure!(
        props.get::<f32>("floatVal", &converter)?.map(f32::to_bits) == Some(3.14159_f32.to_bits())
    );
    ensure!(
        props.get::<f64>("doubleVal", &converter)?.map(f64::to_bits)
            == Some(2.997_924_58E10_f64.to_bits())
    );
    ensure!(props.get::<bool>("booleanVal", &converter)? == Some(true));
    Ok(())
}

#[rstest]
fn report_lists_every_source() -> Result<()> {
    let props = bundled().add_props("extra=1").build().load()?;
    let report = props.to_string();
    ensure!(report.starts_with("FrozenProps[\n  locations\n"), "{report}");
    ensure!(report.contains("    bundled:test-default.properties [foo.1, foo.2, foo.3, "), "{report}");
    ensure!(report.contains("    bundled:test.properties [foo.2, foo.3, int.val]"), "{report}");
    ensure!(report.contains("    string [extra]"), "{report}");
    Ok(())
}
