use arbor::Engine;
use serde_json::json;

/// Three scored items, the running example for filters.
pub fn scored_items() -> Engine {
    Engine::from_json(&json!({
        "items": [ { "score": 3 }, { "score": 9 }, { "score": 1 } ]
    }))
}

/// An order book with nested, heterogeneous records.
pub fn orders() -> Engine {
    Engine::from_json(&json!({
        "orders": [
            {
                "id": "o-1",
                "customer": { "name": "Ada", "tier": "gold" },
                "lines": [ { "sku": "A", "qty": 2 }, { "sku": "B", "qty": 1 } ],
                "tags": ["rush", "gift"]
            },
            {
                "id": "o-2",
                "customer": { "name": "Brian" },
                "lines": [ { "sku": "C", "qty": 10 } ],
                "tags": ["bulk"]
            },
            {
                "id": "o-3",
                "note": "no lines yet"
            }
        ]
    }))
}

/// Fields named `id` at depth 1 and depth 3, under different parents.
pub fn nested_ids() -> Engine {
    Engine::from_json(&json!({
        "doc": {
            "a": { "b": { "id": 3 } },
            "id": 1,
            "c": { "id": 2 }
        }
    }))
}
