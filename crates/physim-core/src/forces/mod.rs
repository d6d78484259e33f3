/// Spring forces and local energy gradients between lattice neighbors.
pub mod spring;
