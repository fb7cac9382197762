//! Parameter File Demo
//!
//! Run with: `cargo run --example par_file [PATH.par]`
//!
//! Loads a TEMPO parameter file (a built-in Crab pulsar sample when no path
//! is given), prints every parameter with its uncertainty, then edits the
//! store and writes it back out. Set `RUST_LOG=debug` to see parser logs.

use std::path::PathBuf;

use anyhow::Context;
use pulsar_params::{ParameterStore, ParameterValue, TempoParser};
use tracing_subscriber::EnvFilter;

const CRAB: &str = "\
PSRJ            J0534+2200
RAJ             05:34:31.973
DECJ            +22:00:52.06
F0              29.946923         1  1.2D-10
F1              -3.77535D-10      1  2.0D-18
F2              1.1147D-20
PEPOCH          40000.0
DM              56.77118          1  0.00024
EPHEM           DE200
EPHVER          5
";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== pulsar-params Parameter File Demo ===\n");

    let path: PathBuf = match std::env::args().nth(1) {
        Some(path) => path.into(),
        None => {
            let path = std::env::temp_dir().join("pulsar_params_demo_crab.par");
            std::fs::write(&path, CRAB).context("writing sample parameter file")?;
            path
        }
    };

    let parser = TempoParser::builder().vector_prefix("F").build();
    let mut store = ParameterStore::new();
    store
        .load_with(&parser, &path)
        .with_context(|| format!("loading {}", path.display()))?;

    println!("1. Parameters in {}", path.display());
    println!("   ---------------");
    for entry in store.iter() {
        match entry.error() {
            Some(error) => println!("   {:<10} {:?} +/- {:?}", entry.name(), entry.main(), error),
            None => println!("   {:<10} {:?}", entry.name(), entry.main()),
        }
    }
    println!();

    println!("2. Dictionary Access");
    println!("   -----------------");
    println!("   get(\"F\")      = {:?}", store.get("F")?);
    println!("   get(\"F_ERR\")  = {:?}", store.get("F_ERR")?);
    println!("   get(\"GLEP\")   = {:?}", store.get("GLEP")?);
    match store.get("PSRJ_ERR") {
        Ok(value) => println!("   get(\"PSRJ_ERR\") = {value:?}"),
        Err(e) => println!("   get(\"PSRJ_ERR\") failed: {e}"),
    }
    println!();

    println!("3. Editing");
    println!("   -------");
    store.set("PSRJ", "J0534+2200");
    store.set_with_error("DM", 56.7957, 0.0001)?;
    store.set_dynamic("NITS", &serde_json::json!(3))?;
    println!("   keys = {:?}", store.keys());
    println!(
        "   DM is now {:?}",
        store.get("DM")?.as_ref().and_then(ParameterValue::as_f64)
    );
    println!();

    let out = std::env::temp_dir().join("pulsar_params_demo_out.par");
    store.write_par_file(&out)?;
    println!("4. Wrote {}:\n", out.display());
    print!("{}", store.to_par_string());

    Ok(())
}
