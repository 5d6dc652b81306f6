//! Analyzer passes over a normalized document.
//!
//! Each pass is a total function: it reads the document and appends findings,
//! and never fails. Passes are independent of each other and are gated by the
//! processor flags:
//!
//! | flag                   | passes                                   |
//! |------------------------|------------------------------------------|
//! | `dead_rule_check`      | [`rule_findings`], [`interface_findings`]  |
//! | `security_analysis`    | [`security_findings`]                    |
//! | `performance_analysis` | [`performance_findings`]                 |
//! | `compliance_check`     | [`consistency_findings`]                 |

pub mod consistency;
pub mod interfaces;
pub mod performance;
pub mod rules;
pub mod security;

pub use consistency::consistency_findings;
pub use interfaces::interface_findings;
pub use performance::performance_findings;
pub use rules::{rule_findings, rules_equivalent};
pub use security::security_findings;
