use vsird::calibration::beta_from_r0;
use vsird::io::trajectory_csv::write_trajectory_csv;
use vsird::model::scenario::Scenario;
use vsird::{InitialConditions, ModelParameters};

fn main() -> anyhow::Result<()> {
    // Flu-like toy: R0 of 2.5, 5 days infectious, low mortality.
    let gamma = 1.0 / 5.0;
    let mu = 0.002;
    let beta = beta_from_r0(2.5, gamma, mu);

    let scenario = Scenario {
        params: ModelParameters::new(beta, gamma, mu),
        initial: InitialConditions::new(0.999, 0.001, 0.0, 0.0),
        dt: 0.25,
        t_end: 180.0,
    };

    for reduction in [0.0, 0.2, 0.4, 0.6] {
        let cmp = scenario.compare(reduction)?;
        let (t_peak, i_peak) = cmp.intervention.peak_infected().unwrap_or((0.0, 0.0));
        println!(
            "reduction={:.1} peak_I={:.4} at day {:.1} final_D={:.5} | {}",
            reduction,
            i_peak,
            t_peak,
            cmp.intervention.d().last().copied().unwrap_or(0.0),
            cmp.stats.summary_lines().join("; ")
        );
    }

    // Daily baseline series (every 4 steps)
    let daily = scenario.baseline()?.every(4)?;
    write_trajectory_csv(std::io::stdout(), &daily)?;

    Ok(())
}
