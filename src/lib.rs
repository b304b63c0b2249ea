//! compound-agent: compound growth calculations exposed to a hosted AI agent.
//!
//! The crate has two halves. [`finance`] is a pure, synchronous calculator
//! for the future value of an amount under discrete compounding. The rest
//! wires that calculator into a managed agent service as a function tool:
//! [`tools`] registers it by name, [`service`] speaks the service's REST
//! contract, and [`agent`] drives a conversation end to end.
//!
//! # Quick Start
//!
//! ```
//! use compound_agent::finance::calculate_future_value;
//!
//! # fn example() -> compound_agent::error::Result<()> {
//! let result = calculate_future_value(100.0, 0.03, 5)?;
//! assert!((result.future_value - 115.92740743).abs() < 1e-6);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! Running a conversation against the service:
//!
//! ```no_run
//! use compound_agent::prelude::*;
//!
//! # async fn example() -> compound_agent::error::Result<()> {
//! let config = AgentConfig::load(None)?;
//! let client = AgentsClient::new(&config)?;
//! let tools = compound_agent::agent::default_tool_set()?;
//! let report = run_conversation(
//!     &client,
//!     &AgentSpec::product_support(config.model.clone()),
//!     &tools,
//!     RunPolicy::from(&config),
//!     "What is 100 worth after 5 months at 3% per month?",
//!     &config.output_dir,
//! )
//! .await?;
//! println!("{}", report.status);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod finance;
pub mod prelude;
pub mod service;
pub mod tools;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
