pub mod constraint;
pub mod eval;
pub mod grammar;
pub mod ops;
pub mod oracle;
pub mod screen;
pub mod search;
pub mod substitute;
pub mod symbol;
pub mod synth;
pub mod tree;
