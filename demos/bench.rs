use std::time::Instant;

use vsird::model::scenario::Scenario;

fn main() -> anyhow::Result<()> {
    let mut scenario = Scenario::default();
    println!("dt,points,compare_ms");
    for dt in [0.1, 0.01, 0.001, 0.0001] {
        scenario.dt = dt;
        let start = Instant::now();
        let cmp = scenario.compare(0.5)?;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        println!("{},{},{:.3}", dt, cmp.baseline.len(), ms);
    }
    Ok(())
}
