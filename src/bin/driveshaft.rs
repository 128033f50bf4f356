//! CLT Solver Example - Composite Driveshaft Design
//!
//! Designs a thin-walled carbon/epoxy driveshaft tube under pure torsion:
//! the torque becomes a shear flow Nxy = T / (2 * pi * R^2), and the genetic
//! optimizer searches for the lightest symmetric stack meeting the required
//! Tsai-Wu safety factor.

use std::f64::consts::PI;
use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;

use clt_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== CLT Solver Example: Driveshaft Design ===\n");

    let material = Arc::new(Material::carbon_epoxy());

    // 50 mm radius tube carrying 2000 Nm of torque
    let radius = 0.05;
    let torque = 2000.0;
    let nxy = torque / (2.0 * PI * radius * radius);
    println!("Applied shear load Nxy: {nxy:.2} N/m");

    let load = InPlaneLoad::new(0.0, 0.0, nxy);
    let limits = StrengthLimits::new(1500e6, 1200e6, 50e6, 250e6, Some(70e6))?;
    let constraints = DesignConstraints {
        strength: Some(StrengthConstraint {
            safety_factor: 2.0,
            limits,
        }),
        buckling: None,
    };

    println!("Running genetic algorithm...");
    let ga = GeneticAlgorithm::new(Arc::clone(&material), load, constraints)
        .with_population_size(20)
        .with_generations(10);

    let mut rng = StdRng::from_entropy();
    let stack = ga
        .optimize(&mut rng, 4, 16)
        .context("no feasible stacking sequence within 16 plies")?;

    println!("Optimal stacking sequence: {stack:?}");

    let laminate = Laminate::with_default_thickness(material, &stack, false)?;
    println!(
        "Total thickness: {:.3} mm",
        laminate.total_thickness() * 1000.0
    );
    println!(
        "Safety factor: {:.2}",
        safety_factor(&laminate, &load, &limits)
    );
    println!(
        "Engineering constants: {}",
        serde_json::to_string_pretty(&laminate.properties())?
    );

    Ok(())
}
