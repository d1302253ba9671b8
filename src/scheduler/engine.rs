//! Genetic-algorithm placement scheduler.
//!
//! # Algorithm
//!
//! 1. Calibrate the fitness strategy on the request.
//! 2. Seed `population_size` individuals with the initializer.
//! 3. Select once to establish generation zero in the history.
//! 4. Per generation: crossover, mutation, selection. Stop once the best
//!    has not improved for more than `stagnation_limit` generations, or
//!    after `iteration_count` generations.
//! 5. Post-process the best solution ever recorded and return it.
//!
//! # Run states
//!
//! `Uninitialized → Seeded → Evolving → Converged | Exhausted →
//! (Repaired) → Done`. `Repaired` is only entered when a post-processor
//! other than [`NoRepair`] is installed.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, error, info, instrument};

use crate::config::GaConfig;
use crate::error::{Result, ScheduleError};
use crate::ga::operators::GeneticOperators;
use crate::ga::{
    CloudPicker, CoverageFitness, Crossover, EnergyFitness, EvolutionHistory, FairnessRepair,
    FeasibilityOracle, FitnessStrategy, Initializer, NoRepair, PostProcessor, Problem,
    ScheduleRequest, tournament_select,
};
use crate::models::Solution;
use crate::placement::{CapacityOracle, RandomAcceptMost, TwoPointCrossover, UniformCloudPicker};

/// Lifecycle of a scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run started.
    #[default]
    Uninitialized,
    /// Generation zero created.
    Seeded,
    /// Generations being produced.
    Evolving,
    /// Stopped because the best stopped improving.
    Converged,
    /// Stopped at the iteration cap.
    Exhausted,
    /// Best solution post-processed.
    Repaired,
    /// Result returned.
    Done,
}

/// Collaborators the engine delegates to.
///
/// The oracle is the only feasibility authority of a run: the engine
/// hands it to the initializer, the crossover, mutation, and the
/// post-processor alike.
#[derive(Clone)]
pub struct Collaborators {
    /// Generation-zero seeding.
    pub initializer: Arc<dyn Initializer>,
    /// Two-parent recombination.
    pub crossover: Arc<dyn Crossover>,
    /// Capacity validation and repair.
    pub oracle: Arc<dyn FeasibilityOracle>,
    /// Cloud choice for mutated genes.
    pub picker: Arc<dyn CloudPicker>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            initializer: Arc::new(RandomAcceptMost),
            crossover: Arc::new(TwoPointCrossover),
            oracle: Arc::new(CapacityOracle::new()),
            picker: Arc::new(UniformCloudPicker),
        }
    }
}

impl Collaborators {
    /// Replaces the initializer.
    pub fn with_initializer(mut self, initializer: impl Initializer + 'static) -> Self {
        self.initializer = Arc::new(initializer);
        self
    }

    /// Replaces the crossover operator.
    pub fn with_crossover(mut self, crossover: impl Crossover + 'static) -> Self {
        self.crossover = Arc::new(crossover);
        self
    }

    /// Replaces the feasibility oracle.
    pub fn with_oracle(mut self, oracle: impl FeasibilityOracle + 'static) -> Self {
        self.oracle = Arc::new(oracle);
        self
    }

    /// Replaces the cloud picker.
    pub fn with_picker(mut self, picker: impl CloudPicker + 'static) -> Self {
        self.picker = Arc::new(picker);
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Genetic-algorithm placement scheduler.
///
/// Generic over the fitness strategy and the post-processor applied to
/// the final solution.
///
/// # Example
///
/// ```
/// use u_cloud_schedule::config::GaConfig;
/// use u_cloud_schedule::ga::ScheduleRequest;
/// use u_cloud_schedule::models::{Application, Cloud, Resources};
/// use u_cloud_schedule::scheduler::GaScheduler;
///
/// let clouds = vec![Cloud::new("C1").with_capacity(Resources::cpu(4.0))];
/// let apps = vec![
///     Application::new("A1").with_priority(3).with_demand(Resources::cpu(1.0)),
///     Application::new("A2").with_priority(8).with_demand(Resources::cpu(1.0)),
/// ];
///
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_iteration_count(20)
///     .with_seed(42);
/// let mut scheduler = GaScheduler::energy_aware(config);
/// let solution = scheduler
///     .schedule_request(ScheduleRequest::new(clouds, apps))
///     .unwrap();
/// assert_eq!(solution.accepted_count(), 2);
/// ```
#[derive(Debug)]
pub struct GaScheduler<F, P = NoRepair> {
    config: GaConfig,
    fitness: F,
    post_processor: P,
    collaborators: Collaborators,
    history: EvolutionHistory,
    state: RunState,
}

impl<F: FitnessStrategy> GaScheduler<F, NoRepair> {
    /// Creates a scheduler with the reference collaborators and no
    /// post-processing.
    pub fn new(config: GaConfig, fitness: F) -> Self {
        Self {
            config,
            fitness,
            post_processor: NoRepair,
            collaborators: Collaborators::default(),
            history: EvolutionHistory::new(),
            state: RunState::Uninitialized,
        }
    }
}

impl GaScheduler<EnergyFitness, FairnessRepair> {
    /// Energy/diversity fitness followed by fairness repair.
    pub fn energy_aware(config: GaConfig) -> Self {
        GaScheduler::new(config, EnergyFitness::default())
            .with_post_processor(FairnessRepair::default())
    }
}

impl GaScheduler<CoverageFitness, NoRepair> {
    /// Coverage/violation fitness, no post-processing.
    pub fn priority_aware(config: GaConfig, expected_compute_time: f64) -> Self {
        GaScheduler::new(
            config,
            CoverageFitness::with_expected_compute_time(expected_compute_time),
        )
    }
}

impl<F: FitnessStrategy, P: PostProcessor> GaScheduler<F, P> {
    /// Installs a post-processor for the final solution.
    pub fn with_post_processor<Q: PostProcessor>(self, post_processor: Q) -> GaScheduler<F, Q> {
        GaScheduler {
            config: self.config,
            fitness: self.fitness,
            post_processor,
            collaborators: self.collaborators,
            history: self.history,
            state: self.state,
        }
    }

    /// Replaces the collaborators.
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// State of the latest run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Evolution time series of the latest run.
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Validates a raw request and schedules it.
    pub fn schedule_request(&mut self, request: ScheduleRequest) -> Result<Solution> {
        let problem = Problem::new(request)?;
        self.schedule(&problem)
    }

    /// Runs the genetic algorithm on `problem`.
    ///
    /// Returns the best solution found, post-processed. The evolution
    /// history of the run stays available through [`Self::history`].
    #[instrument(
        skip_all,
        fields(apps = problem.apps().len(), clouds = problem.clouds().len())
    )]
    pub fn schedule(&mut self, problem: &Problem) -> Result<Solution> {
        self.config.validate()?;
        self.history = EvolutionHistory::new();
        self.state = RunState::Uninitialized;

        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.fitness.calibrate(problem);
        info!(
            population = self.config.population_size,
            iterations = self.config.iteration_count,
            "starting placement run"
        );

        let initializer = self.collaborators.initializer.as_ref();
        let oracle = self.collaborators.oracle.as_ref();
        let seeds: Vec<u64> = (0..self.config.population_size)
            .map(|_| rng.random())
            .collect();
        let mut population: Vec<Solution> = seeds
            .into_par_iter()
            .map(|seed| {
                initializer.initialize(problem, oracle, &mut SmallRng::seed_from_u64(seed))
            })
            .collect();
        self.state = RunState::Seeded;
        debug!(size = population.len(), "population seeded");

        self.state = RunState::Evolving;
        let size = self.config.population_size;
        population = tournament_select(
            &self.fitness,
            problem,
            &population,
            size,
            &mut self.history,
            &mut rng,
        )?;

        let ops = GeneticOperators::from_config(&self.config);
        let crossover = self.collaborators.crossover.as_ref();
        let picker = self.collaborators.picker.as_ref();
        for generation in 1..=self.config.iteration_count {
            population = ops.crossover(problem, &population, crossover, oracle, &mut rng);
            population = ops.mutate(problem, &population, picker, oracle, &mut rng);
            population = tournament_select(
                &self.fitness,
                problem,
                &population,
                size,
                &mut self.history,
                &mut rng,
            )?;
            debug!(
                generation,
                best_this_generation = ?self.history.best_each_generation().last(),
                best = ?self.history.best().map(|(f, _)| f),
                stagnation = self.history.stagnation(),
                "generation complete"
            );
            if self.history.stagnation() > self.config.stagnation_limit {
                self.state = RunState::Converged;
                break;
            }
        }
        if self.state == RunState::Evolving {
            self.state = RunState::Exhausted;
        }

        let Some((fitness, best)) = self.history.best().map(|(f, s)| (f, s.clone())) else {
            error!("no solution recorded");
            return Err(ScheduleError::NoSolution);
        };
        info!(
            state = ?self.state,
            generations = self.history.generations(),
            fitness,
            accepted = best.accepted_count(),
            "evolution finished"
        );

        let solution = self.post_processor.process(problem, oracle, best, &mut rng);
        if !self.post_processor.is_noop() {
            self.state = RunState::Repaired;
            debug!(accepted = solution.accepted_count(), "post-processing applied");
        }

        self.state = RunState::Done;
        Ok(solution)
    }
}
