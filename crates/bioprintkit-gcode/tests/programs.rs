#[path = "programs/determinism.rs"]
mod determinism;
#[path = "programs/droplet_scenarios.rs"]
mod droplet_scenarios;
#[path = "programs/scaffold_scenarios.rs"]
mod scaffold_scenarios;
#[path = "programs/sweeps.rs"]
mod sweeps;
