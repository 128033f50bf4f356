//! Genetic stacking-sequence optimization

use std::cmp::Ordering;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::buckling::{self, DEFAULT_MODE_COUNT};
use crate::failure::{safety_factor, InPlaneLoad, StrengthLimits};
use crate::laminate::{Laminate, DEFAULT_PLY_THICKNESS};
use crate::material::Material;

/// Discrete gene set of ply angles the optimizer draws from
pub const GENE_ANGLES: [f64; 4] = [0.0, 45.0, -45.0, 90.0];

const MUTATION_PROBABILITY: f64 = 0.2;
const DEFAULT_POPULATION_SIZE: usize = 20;
const DEFAULT_GENERATIONS: usize = 10;

/// Minimum required strength margin under the design load
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrengthConstraint {
    /// Required Tsai-Wu safety factor
    pub safety_factor: f64,
    /// Ply strength limits used to evaluate it
    pub limits: StrengthLimits,
}

/// Minimum required plate buckling load
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BucklingConstraint {
    /// Required critical load N_cr (N/m)
    pub load: f64,
    /// Plate length in the loaded direction (m)
    pub a: f64,
    /// Plate width (m)
    pub b: f64,
}

/// Hard constraints a candidate design must satisfy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DesignConstraints {
    pub strength: Option<StrengthConstraint>,
    pub buckling: Option<BucklingConstraint>,
}

/// Genetic search for a minimum-ply-count symmetric laminate.
///
/// Ply counts are tried in increasing order; for each count one GA trial
/// evolves half-stacks (the full design is the half-stack mirrored), so the
/// first feasible count is also the lightest. The random source is injected
/// so runs can be made reproducible by seeding.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    material: Arc<Material>,
    load: InPlaneLoad,
    constraints: DesignConstraints,
    population_size: usize,
    generations: usize,
    ply_thickness: f64,
}

impl GeneticAlgorithm {
    pub fn new(material: Arc<Material>, load: InPlaneLoad, constraints: DesignConstraints) -> Self {
        Self {
            material,
            load,
            constraints,
            population_size: DEFAULT_POPULATION_SIZE,
            generations: DEFAULT_GENERATIONS,
            ply_thickness: DEFAULT_PLY_THICKNESS,
        }
    }

    /// Set the population size per generation
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size.max(2);
        self
    }

    /// Set the number of generations per ply-count trial
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations.max(1);
        self
    }

    /// Set the ply thickness used for candidate laminates (m)
    pub fn with_ply_thickness(mut self, ply_thickness: f64) -> Self {
        self.ply_thickness = ply_thickness;
        self
    }

    /// Search for the lightest feasible symmetric stack.
    ///
    /// Tries even ply counts from `min_plies` to `max_plies` and returns the
    /// full mirrored stack of the first feasible count, or `None` when every
    /// count is exhausted without a feasible design.
    pub fn optimize(
        &self,
        rng: &mut impl Rng,
        min_plies: usize,
        max_plies: usize,
    ) -> Option<Vec<f64>> {
        // Symmetric designs need an even ply count of at least two.
        let mut n_plies = min_plies.max(2);
        n_plies += n_plies % 2;
        while n_plies <= max_plies {
            log::debug!("GA trial with {n_plies} plies");
            if let Some(stack) = self.run_trial(rng, n_plies / 2) {
                return Some(stack);
            }
            n_plies += 2;
        }

        None
    }

    /// One GA trial at a fixed half-stack size. Keeps the best individual
    /// seen across all generations, not just the last one.
    fn run_trial(&self, rng: &mut impl Rng, half_plies: usize) -> Option<Vec<f64>> {
        let mut population: Vec<Vec<f64>> = (0..self.population_size)
            .map(|_| self.random_stack(rng, half_plies))
            .collect();

        let mut best_score = f64::NEG_INFINITY;
        let mut best_stack: Option<Vec<f64>> = None;

        for generation in 0..self.generations {
            let mut scored: Vec<(f64, Vec<f64>)> = population
                .into_iter()
                .map(|stack| (self.evaluate(&stack), stack))
                .collect();

            scored.sort_by(|x, y| y.0.partial_cmp(&x.0).unwrap_or(Ordering::Equal));

            if scored[0].0 > best_score {
                best_score = scored[0].0;
                best_stack = Some(scored[0].1.clone());
            }
            log::debug!(
                "generation {generation}: best score {:.4} (best ever {best_score:.4})",
                scored[0].0
            );

            // Top half become parents and survive unchanged
            let parent_count = (self.population_size / 2).max(2);
            let parents = &scored[..parent_count.min(scored.len())];

            let mut next_gen: Vec<Vec<f64>> =
                parents.iter().map(|(_, stack)| stack.clone()).collect();

            while next_gen.len() < self.population_size {
                let p1 = &parents[rng.gen_range(0..parents.len())].1;
                let p2 = &parents[rng.gen_range(0..parents.len())].1;
                let mut child = crossover(rng, p1, p2);
                mutate(rng, &mut child);
                next_gen.push(child);
            }

            population = next_gen;
        }

        if best_score > 0.0 {
            best_stack.map(|half| mirror(&half))
        } else {
            None
        }
    }

    fn random_stack(&self, rng: &mut impl Rng, n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| GENE_ANGLES[rng.gen_range(0..GENE_ANGLES.len())])
            .collect()
    }

    /// Fitness of a half-stack: 1.0 plus margin bonuses when all configured
    /// constraints hold, -1.0 on any hard violation.
    fn evaluate(&self, half_stack: &[f64]) -> f64 {
        let full = mirror(half_stack);
        let laminate = match Laminate::new(
            Arc::clone(&self.material),
            &full,
            self.ply_thickness,
            false,
        ) {
            Ok(laminate) => laminate,
            Err(_) => return -1.0,
        };

        let mut score = 1.0;

        if let Some(buckling) = &self.constraints.buckling {
            let critical =
                buckling::critical_load(&laminate, buckling.a, buckling.b, DEFAULT_MODE_COUNT);
            if critical.load < buckling.load {
                return -1.0;
            }
            score += (critical.load / buckling.load) * 0.1;
        }

        if let Some(strength) = &self.constraints.strength {
            let sf = safety_factor(&laminate, &self.load, &strength.limits);
            if sf < strength.safety_factor {
                return -1.0;
            }
            score += sf;
        }

        score
    }
}

fn mirror(half_stack: &[f64]) -> Vec<f64> {
    let mut full = half_stack.to_vec();
    full.extend(half_stack.iter().rev());
    full
}

/// Single-point crossover between two parents
fn crossover(rng: &mut impl Rng, p1: &[f64], p2: &[f64]) -> Vec<f64> {
    if p1.len() < 2 {
        return p1.to_vec();
    }
    let point = rng.gen_range(1..p1.len());
    let mut child = p1[..point].to_vec();
    child.extend_from_slice(&p2[point..]);
    child
}

/// With fixed probability, replace one random gene with a random angle
fn mutate(rng: &mut impl Rng, stack: &mut [f64]) {
    if stack.is_empty() {
        return;
    }
    if rng.gen::<f64>() < MUTATION_PROBABILITY {
        let idx = rng.gen_range(0..stack.len());
        stack[idx] = GENE_ANGLES[rng.gen_range(0..GENE_ANGLES.len())];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn limits() -> StrengthLimits {
        StrengthLimits::new(1500e6, 1200e6, 50e6, 250e6, Some(70e6)).unwrap()
    }

    #[test]
    fn mirror_produces_symmetric_stack() {
        assert_eq!(
            mirror(&[0.0, 45.0, 90.0]),
            vec![0.0, 45.0, 90.0, 90.0, 45.0, 0.0]
        );
    }

    #[test]
    fn crossover_preserves_length_and_genes() {
        let mut rng = StdRng::seed_from_u64(7);
        let p1 = vec![0.0, 0.0, 0.0, 0.0];
        let p2 = vec![90.0, 90.0, 90.0, 90.0];

        for _ in 0..20 {
            let child = crossover(&mut rng, &p1, &p2);
            assert_eq!(child.len(), 4);
            assert!(child.iter().all(|g| *g == 0.0 || *g == 90.0));
            // Single-point: once genes come from p2 they keep coming from p2
            let first_p2 = child.iter().position(|g| *g == 90.0);
            if let Some(i) = first_p2 {
                assert!(child[i..].iter().all(|g| *g == 90.0));
            }
        }
    }

    #[test]
    fn finds_feasible_design_for_easy_constraints() {
        let constraints = DesignConstraints {
            strength: Some(StrengthConstraint {
                safety_factor: 1.5,
                limits: limits(),
            }),
            buckling: None,
        };
        let ga = GeneticAlgorithm::new(
            Arc::new(Material::carbon_epoxy()),
            InPlaneLoad::new(1000.0, 0.0, 0.0),
            constraints,
        );

        let mut rng = StdRng::seed_from_u64(42);
        let stack = ga.optimize(&mut rng, 4, 16).expect("feasible design");

        // Lightest count wins and the result is symmetric and feasible.
        assert_eq!(stack.len(), 4);
        let half = stack.len() / 2;
        for k in 0..half {
            assert_eq!(stack[k], stack[stack.len() - 1 - k]);
        }

        let laminate = Laminate::with_default_thickness(
            Arc::new(Material::carbon_epoxy()),
            &stack,
            false,
        )
        .unwrap();
        let sf = safety_factor(&laminate, &InPlaneLoad::new(1000.0, 0.0, 0.0), &limits());
        assert!(sf >= 1.5);
    }

    #[test]
    fn reports_no_solution_when_infeasible() {
        // Required margin is unreachable at any allowed ply count.
        let constraints = DesignConstraints {
            strength: Some(StrengthConstraint {
                safety_factor: 1000.0,
                limits: limits(),
            }),
            buckling: None,
        };
        let ga = GeneticAlgorithm::new(
            Arc::new(Material::carbon_epoxy()),
            InPlaneLoad::new(1e6, 2e5, 1e5),
            constraints,
        );

        let mut rng = StdRng::seed_from_u64(42);
        assert!(ga.optimize(&mut rng, 4, 8).is_none());
    }

    #[test]
    fn buckling_constraint_is_enforced() {
        let constraints = DesignConstraints {
            strength: None,
            buckling: Some(BucklingConstraint {
                load: 1.0,
                a: 0.5,
                b: 0.5,
            }),
        };
        let ga = GeneticAlgorithm::new(
            Arc::new(Material::carbon_epoxy()),
            InPlaneLoad::default(),
            constraints,
        );

        let mut rng = StdRng::seed_from_u64(1);
        let stack = ga.optimize(&mut rng, 4, 8).expect("feasible design");

        let laminate = Laminate::with_default_thickness(
            Arc::new(Material::carbon_epoxy()),
            &stack,
            false,
        )
        .unwrap();
        let critical = buckling::critical_load(&laminate, 0.5, 0.5, DEFAULT_MODE_COUNT);
        assert!(critical.load >= 1.0);
    }
}
