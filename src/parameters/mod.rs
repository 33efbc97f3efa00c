// Parameter Discovery & Mutation Module
//
// - extractor: finds every leaf field of a request body (static, once per request)
// - substitution: rewrites one leaf with a payload (runtime, once per payload)
//
// Architecture:
//   extractor.rs (leaf, produces ParameterPath)
//       ↓
//   substitution.rs (consumes ParameterPath)
//       ↓
//   engine.rs (drives both during a fuzzing pass)

pub mod extractor;
pub mod substitution;

pub use extractor::*;
pub use substitution::*;
