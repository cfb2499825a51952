mod common;

use arbor::{Engine, Error, PathError, QueryError, Scalar, Value, results};
use common::fixtures::{orders, scored_items};
use common::{TestResult, init_logging, result_json};
use serde_json::json;

#[test]
fn test_paths_round_trip_through_pval() -> TestResult {
    init_logging();
    let engine = orders();
    let paths = engine.evaluate_str("paths orders[*]..sku")?;
    let values = engine.evaluate_str("values orders[*]..sku")?;
    let (paths, values) = (results(&paths), results(&values));
    assert_eq!(paths.len(), 3);
    assert_eq!(paths.len(), values.len());

    for (path, value) in paths.iter().zip(values.iter()) {
        assert!(path.scalar().is_path());
        let link = engine.pval_str(&path.scalar().to_string())?;
        let resolved = link.get().expect("path from a paths query resolves");
        assert!(resolved.deep_eq(value), "mismatch at {}", path.scalar());
    }
    Ok(())
}

#[test]
fn test_pval_expression_with_suffix() -> TestResult {
    init_logging();
    let engine = scored_items();
    let found = engine.evaluate_str("paths items[*]")?;
    engine.root().add_child("r", found);

    let score = engine.evaluate_str("pval(r.results[1]).score")?;
    assert_eq!(score.scalar(), Scalar::Int(9));

    let engine = orders();
    engine
        .root()
        .first_child("p")
        .set_scalar(Scalar::Path("orders[1].customer".to_string()));
    assert_eq!(
        engine.evaluate_str("pval(p).name")?.scalar(),
        Scalar::Str("Brian".to_string())
    );
    Ok(())
}

#[test]
fn test_pval_is_a_live_alias() -> TestResult {
    let engine = scored_items();
    let link = engine.pval_str("items[1].score")?;
    link.assign(&Value::with_scalar(42));
    assert_eq!(
        result_json(&engine, "values items[*].score")?,
        vec![json!(3), json!(42), json!(1)]
    );

    let node = engine.evaluate_str("pval(r)");
    assert!(matches!(node, Err(Error::Query(QueryError::TypeError(_)))));
    Ok(())
}

#[test]
fn test_pval_of_missing_location_is_undefined() -> TestResult {
    let engine = scored_items();
    assert!(engine.pval_str("items[9]")?.get().is_none());

    engine
        .root()
        .first_child("p")
        .set_scalar(Scalar::Path("items[9].score".to_string()));
    assert!(!engine.evaluate_str("pval(p)")?.is_defined());
    assert!(engine.root().child("items", 9).is_none());
    Ok(())
}

#[test]
fn test_field_names_with_separators_round_trip() -> TestResult {
    let engine = Engine::from_json(&json!({ "weird": { "a.b": 5, "c[0]": 6 } }));
    let found = engine.evaluate_str("paths weird.*")?;
    let paths: Vec<String> = results(&found).iter().map(|v| v.scalar().to_string()).collect();
    assert_eq!(paths.len(), 2);
    assert!(paths.contains(&r"weird.a\.b".to_string()));

    for path in &paths {
        assert!(engine.pval_str(path)?.get().is_some(), "{} should resolve", path);
    }
    assert_eq!(
        engine.pval_str(r"weird.a\.b")?.get().map(|v| v.scalar()),
        Some(Scalar::Int(5))
    );
    Ok(())
}

#[test]
fn test_pval_errors() {
    let engine = scored_items();
    assert!(matches!(
        engine.evaluate_str(r#"pval("items[1]")"#),
        Err(Error::Query(QueryError::TypeError(_)))
    ));
    assert!(matches!(
        engine.pval_str("items[x]"),
        Err(Error::Query(QueryError::Path(PathError::Parse(_, _))))
    ));
    assert!(matches!(
        engine.evaluate_str("pval(items[0].score)"),
        Err(Error::Query(QueryError::TypeError(_)))
    ));
}
