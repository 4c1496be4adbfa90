pub mod convergence;
pub mod efficiency;
pub mod signals;
