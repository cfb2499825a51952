pub mod fixtures;

use arbor::{Engine, Value, results};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Evaluates `text` and returns the JSON form of each result entry.
pub fn result_json(engine: &Engine, text: &str) -> Result<Vec<serde_json::Value>, arbor::Error> {
    let result = engine.evaluate_str(text)?;
    Ok(results(&result).iter().map(Value::to_json).collect())
}

/// Evaluates a `paths` query and returns the path strings.
pub fn result_paths(engine: &Engine, text: &str) -> Result<Vec<String>, arbor::Error> {
    let result = engine.evaluate_str(text)?;
    Ok(results(&result)
        .iter()
        .map(|v| v.scalar().to_string())
        .collect())
}
