//! Stage prompt templates
//!
//! One template per stage. Agents prepend persona/request context sections
//! and each template pins down the strict-JSON output shape its parser
//! expects.

mod creative;
mod persona;
mod qa;
mod strategy;

pub use creative::CREATIVE_PROMPT;
pub use persona::PERSONA_PROMPT;
pub use qa::QA_PROMPT;
pub use strategy::STRATEGY_PROMPT;
