//! Model-Mediated Chains
//!
//! Single-purpose prompt chains the tools delegate to: expression
//! translation for the calculator and a step-by-step solution template.

mod math;
mod reasoning;

pub use math::MathChain;
pub use reasoning::ReasoningChain;
