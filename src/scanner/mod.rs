pub mod walk;

pub use walk::PathWalker;
