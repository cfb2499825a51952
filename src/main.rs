use arbor::{Engine, QueryConfig};
use std::env;
use std::fs;
use std::process;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Evaluates one query expression against a JSON document.
fn main() -> Result<(), arbor::Error> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Evaluates a query expression against a JSON document.");
        eprintln!();
        eprintln!(
            "Usage: {} <path/to/data.json> <expression> [path/to/config.json]",
            args[0]
        );
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} data.json 'values items[*] where $.score > 5'", args[0]);
        process::exit(1);
    }

    let config = match args.get(3) {
        Some(config_path) => serde_json::from_str::<QueryConfig>(&fs::read_to_string(config_path)?)?,
        None => QueryConfig::default(),
    };
    let engine = Engine::from_json_file(&args[1])?.with_config(config);

    let result = engine.evaluate_str(&args[2])?;
    println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    Ok(())
}
