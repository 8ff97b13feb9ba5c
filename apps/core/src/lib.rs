pub mod config;
pub mod demo;
pub mod favourites;
pub mod feedback;
pub mod icons;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod search;
pub mod update;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
